//! End-to-end expression tests against directly-built distributions

use approx::assert_relative_eq;
use dice_core::{combine, dice, die, Distribution, Face, Operand};
use dice_notation::{parse, Error};
use proptest::prelude::*;

fn assert_same_sums(actual: &Distribution<Face>, expected: &Distribution<Face>) {
    let a = actual.sum();
    let e = expected.sum();
    assert_eq!(a.len(), e.len());
    for (x, y) in a.iter().zip(e.iter()) {
        assert_eq!(x.value, y.value);
        assert_relative_eq!(x.weight, y.weight, epsilon = 1e-12);
    }
}

#[test]
fn test_expression_matches_direct_construction() {
    let parsed = parse("2d6+1d4-5").unwrap();
    let direct = combine(&[
        Operand::Dist(combine(&[
            Operand::Dist(die(6).unwrap()),
            Operand::Dist(die(6).unwrap()),
        ])),
        Operand::Dist(die(4).unwrap()),
        Operand::Const(Face::Scalar(-5)),
    ]);
    assert_same_sums(&parsed, &direct);
}

#[test]
fn test_whitespace_is_ignored() {
    assert_same_sums(&parse(" 2 d 6 + 3 ").unwrap(), &parse("2d6+3").unwrap());
}

#[test]
fn test_subtracting_dice() {
    let d = parse("1d6-1d6").unwrap().sum();
    assert_eq!(d.len(), 11);
    assert_relative_eq!(d.weight_of(&Face::Scalar(0)), 6.0 / 36.0, epsilon = 1e-12);
    assert_relative_eq!(d.average(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_drop_lowest_matches_keep_highest() {
    assert_same_sums(&parse("4d6d1").unwrap(), &parse("4d6kh3").unwrap());
}

#[test]
fn test_disadvantage_with_repeats() {
    let d = parse("1d20dis3").unwrap().sum();
    let direct = die(20).unwrap().disadvantage(3).sum();
    assert_same_sums(&d, &direct);
    assert_relative_eq!(d.weight_of(&Face::Scalar(20)), 1.0 / 8000.0, epsilon = 1e-12);
}

#[test]
fn test_error_names_the_offending_term() {
    match parse("1d20+2x") {
        Err(Error::InvalidTerm { term }) => assert_eq!(term, "+2x"),
        other => panic!("expected an invalid term, got {other:?}"),
    }
    assert!(parse("1d20+2x").unwrap_err().to_string().contains("+2x"));
}

#[test]
fn test_large_constants_never_overflow_the_sum() {
    let err = parse("9223372036854775807+1").unwrap_err();
    assert_eq!(err, Error::OutOfRange { term: "+1".to_string() });

    let edge = parse("9223372036854775800+1d6").unwrap().sum();
    assert_eq!(edge.len(), 6);
    assert_eq!(edge.outcomes()[5].value, Face::Scalar(i64::MAX - 1));
}

proptest! {
    #[test]
    fn prop_pool_matches_dice(count in 1usize..4, sides in 1i64..9, modifier in -20i64..20) {
        let text = format!("{count}d{sides}{modifier:+}");
        let parsed = parse(&text).unwrap().sum();
        let direct = combine(&[
            Operand::Dist(dice(count, sides).unwrap()),
            Operand::Const(Face::Scalar(modifier)),
        ])
        .sum();

        prop_assert_eq!(parsed.len(), direct.len());
        for (p, d) in parsed.iter().zip(direct.iter()) {
            prop_assert_eq!(&p.value, &d.value);
            prop_assert!((p.weight - d.weight).abs() < 1e-12, "weight mismatch at {}", p.value);
        }
    }
}
