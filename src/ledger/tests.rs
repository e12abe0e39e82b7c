#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

#[test]
fn test_empty_siblings_total_zero() {
    let check = check_total(&[], None, None);
    assert_eq!(check.current_total, Decimal::ZERO);
    assert_eq!(check.would_be_total, Decimal::ZERO);
    assert!(check.ok);
}

#[test]
fn test_candidate_on_empty_set() {
    let check = check_total(&[], None, Some(dec!(40)));
    assert_eq!(check.current_total, Decimal::ZERO);
    assert_eq!(check.would_be_total, dec!(40));
    assert!(check.ok);
}

#[test]
fn test_candidate_exceeding_100_rejected() {
    let siblings = vec![(1, dec!(60))];
    let check = check_total(&siblings, None, Some(dec!(50)));
    assert_eq!(check.current_total, dec!(60));
    assert_eq!(check.would_be_total, dec!(110));
    assert!(!check.ok);
}

#[test]
fn test_exactly_100_is_admissible() {
    let siblings = vec![(1, dec!(60))];
    let check = check_total(&siblings, None, Some(dec!(40)));
    assert_eq!(check.would_be_total, dec!(100));
    assert!(check.ok);
}

#[test]
fn test_update_excludes_own_old_value() {
    // Member 2 currently holds 30; raising it to 50 must not double count.
    let siblings = vec![(1, dec!(60)), (2, dec!(30))];
    let check = check_total(&siblings, Some(2), Some(dec!(50)));
    assert_eq!(check.current_total, dec!(60));
    assert_eq!(check.would_be_total, dec!(110));
    assert!(!check.ok);

    let check = check_total(&siblings, Some(2), Some(dec!(40)));
    assert_eq!(check.would_be_total, dec!(100));
    assert!(check.ok);
}

#[test]
fn test_no_candidate_reports_current_total() {
    let siblings = vec![(1, dec!(25.50)), (2, dec!(74.50))];
    let check = check_total(&siblings, None, None);
    assert_eq!(check.current_total, dec!(100));
    assert_eq!(check.would_be_total, dec!(100));
    assert!(check.ok);
}

#[test]
fn test_exact_decimal_accumulation() {
    // 0.01 steps must stay exact; no float rounding anywhere.
    let siblings: Vec<(i64, Decimal)> = (0..9999).map(|i| (i, dec!(0.01))).collect();
    let check = check_total(&siblings, None, Some(dec!(0.01)));
    assert_eq!(check.would_be_total, dec!(100.00));
    assert!(check.ok);

    let check = check_total(&siblings, None, Some(dec!(0.02)));
    assert!(!check.ok);
}

#[test]
fn test_is_exact() {
    assert!(is_exact(dec!(100)));
    assert!(is_exact(dec!(100.00)));
    assert!(!is_exact(dec!(99.99)));
    assert!(!is_exact(dec!(100.01)));
    assert!(!is_exact(Decimal::ZERO));
}
