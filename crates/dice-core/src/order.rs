//! Order statistics: keep/drop extremes, advantage and disadvantage

use crate::distribution::Distribution;
use crate::face::Face;
use std::cmp::Ordering;

/// Default number of replicas rolled for advantage/disadvantage
pub const DEFAULT_ADVANTAGE_DICE: usize = 2;

type KeyFn<'a> = Box<dyn Fn(&Face) -> i64 + 'a>;
type CompareFn<'a> = Box<dyn Fn(&Face, &Face) -> Ordering + 'a>;

/// How faces are ranked for keep/drop selection
///
/// `compare` must order the "best" face first; ties keep whatever order
/// the stable sort leaves them in. `key` buckets and sorts the result.
pub struct Ranking<'a> {
    key: KeyFn<'a>,
    compare: CompareFn<'a>,
}

impl<'a> Ranking<'a> {
    /// Rank with an explicit key and comparator
    pub fn new<K, C>(key: K, compare: C) -> Self
    where
        K: Fn(&Face) -> i64 + 'a,
        C: Fn(&Face, &Face) -> Ordering + 'a,
    {
        Self {
            key: Box::new(key),
            compare: Box::new(compare),
        }
    }

    /// Rank by descending `key`
    pub fn by_key<K>(key: K) -> Self
    where
        K: Fn(&Face) -> i64 + Clone + 'a,
    {
        let cmp_key = key.clone();
        Self::new(key, move |a, b| cmp_key(b).cmp(&cmp_key(a)))
    }

    /// The key of a face under this ranking
    pub fn key(&self, face: &Face) -> i64 {
        (self.key)(face)
    }

    /// Compare two faces under this ranking
    pub fn compare(&self, a: &Face, b: &Face) -> Ordering {
        (self.compare)(a, b)
    }
}

impl Default for Ranking<'_> {
    fn default() -> Self {
        Self::by_key(Face::total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Best,
    Worst,
}

impl Distribution<Face> {
    /// Keep the `n` highest faces of each outcome
    pub fn keep_highest(&self, n: usize) -> Distribution<Face> {
        self.keep_highest_by(n, &Ranking::default())
    }

    /// Keep the `n` lowest faces of each outcome
    pub fn keep_lowest(&self, n: usize) -> Distribution<Face> {
        self.keep_lowest_by(n, &Ranking::default())
    }

    /// Drop the `n` highest faces of each outcome
    pub fn drop_highest(&self, n: usize) -> Distribution<Face> {
        self.drop_highest_by(n, &Ranking::default())
    }

    /// Drop the `n` lowest faces of each outcome
    pub fn drop_lowest(&self, n: usize) -> Distribution<Face> {
        self.drop_lowest_by(n, &Ranking::default())
    }

    /// [`keep_highest`](Self::keep_highest) under a custom ranking
    pub fn keep_highest_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.select(n, End::Best, true, ranking)
    }

    /// [`keep_lowest`](Self::keep_lowest) under a custom ranking
    pub fn keep_lowest_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.select(n, End::Worst, true, ranking)
    }

    /// [`drop_highest`](Self::drop_highest) under a custom ranking
    pub fn drop_highest_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.select(n, End::Best, false, ranking)
    }

    /// [`drop_lowest`](Self::drop_lowest) under a custom ranking
    pub fn drop_lowest_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.select(n, End::Worst, false, ranking)
    }

    /// Best of `n` independent replicas
    pub fn advantage(&self, n: usize) -> Distribution<Face> {
        self.advantage_by(n, &Ranking::default())
    }

    /// Worst of `n` independent replicas
    pub fn disadvantage(&self, n: usize) -> Distribution<Face> {
        self.disadvantage_by(n, &Ranking::default())
    }

    /// [`advantage`](Self::advantage) under a custom ranking
    pub fn advantage_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.repeat(n).keep_highest_by(1, ranking)
    }

    /// [`disadvantage`](Self::disadvantage) under a custom ranking
    pub fn disadvantage_by(&self, n: usize, ranking: &Ranking<'_>) -> Distribution<Face> {
        self.repeat(n).keep_lowest_by(1, ranking)
    }

    fn select(&self, n: usize, end: End, keep: bool, ranking: &Ranking<'_>) -> Distribution<Face> {
        let selected = self.map(|value| {
            let mut faces = value.faces().to_vec();
            faces.sort_by(|a, b| ranking.compare(a, b));

            let len = faces.len();
            let n = n.min(len);
            let range = match (end, keep) {
                (End::Best, true) => 0..n,
                (End::Worst, true) => len - n..len,
                (End::Best, false) => n..len,
                (End::Worst, false) => 0..len - n,
            };
            Face::Seq(faces[range].to_vec())
        });

        let mut out = selected.bucket_by_key(|face| ranking.key(face));
        out.sort_by_key(|face| ranking.key(face));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::dice;
    use crate::face::die;
    use approx::assert_relative_eq;

    fn weight_of_total(d: &Distribution<Face>, total: i64) -> f64 {
        d.probability(|face| face.total() == total)
    }

    #[test]
    fn test_keep_highest_three_of_four() {
        let kept = dice(4, 6).unwrap().keep_highest(3);
        assert_eq!(kept.len(), 16);
        assert_eq!(kept.outcomes()[0].value.total(), 3);
        assert_relative_eq!(weight_of_total(&kept, 3), 1.0 / 1296.0, epsilon = 1e-12);
        assert_relative_eq!(weight_of_total(&kept, 18), 21.0 / 1296.0, epsilon = 1e-12);
        assert_relative_eq!(kept.average(), 15869.0 / 1296.0, epsilon = 1e-9);
    }

    #[test]
    fn test_keep_and_drop_are_complements() {
        let pool = dice(3, 4).unwrap();
        let kept = pool.keep_lowest(1);
        let dropped = pool.drop_highest(2);
        assert_eq!(kept, dropped);
    }

    #[test]
    fn test_drop_lowest_more_than_available() {
        let pool = dice(2, 6).unwrap();
        let empty = pool.drop_lowest(5);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.outcomes()[0].value, Face::Seq(vec![]));
        assert_relative_eq!(empty.total_weight(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_advantage_d20() {
        let adv = die(20).unwrap().advantage(2);
        assert_eq!(adv.len(), 20);
        assert_relative_eq!(weight_of_total(&adv, 1), 1.0 / 400.0, epsilon = 1e-12);
        assert_relative_eq!(weight_of_total(&adv, 20), 39.0 / 400.0, epsilon = 1e-12);
        assert_relative_eq!(adv.total_weight(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_disadvantage_d20() {
        let dis = die(20).unwrap().disadvantage(2);
        assert_relative_eq!(weight_of_total(&dis, 1), 39.0 / 400.0, epsilon = 1e-12);
        assert_relative_eq!(weight_of_total(&dis, 20), 1.0 / 400.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_ranking_prefers_low_faces() {
        let lowest_first = Ranking::by_key(|face: &Face| -face.total());
        let kept = dice(2, 6).unwrap().keep_highest_by(1, &lowest_first);
        // under a negated key "highest" means the smallest die
        assert_relative_eq!(
            kept.probability(|face| face.total() == 1),
            11.0 / 36.0,
            epsilon = 1e-12
        );
        assert_eq!(kept.outcomes()[0].value.total(), 6);
    }
}
