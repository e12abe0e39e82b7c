#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Names ─────────────────────────────────────────────────────

#[test]
fn test_name_rejects_empty() {
    assert!(validate_name("").is_err());
}

#[test]
fn test_name_rejects_whitespace_only() {
    assert!(validate_name("  ").is_err());
    assert!(validate_name("   \t ").is_err());
}

#[test]
fn test_name_rejects_leading_digit() {
    assert!(validate_name("1abc").is_err());
}

#[test]
fn test_name_rejects_too_short() {
    assert!(validate_name("ab").is_err());
}

#[test]
fn test_name_rejects_too_long() {
    let long = "a".repeat(51);
    assert!(validate_name(&long).is_err());
}

#[test]
fn test_name_accepts_max_length() {
    let max = "a".repeat(50);
    assert!(validate_name(&max).is_ok());
}

#[test]
fn test_name_rejects_punctuation() {
    assert!(validate_name("Food & Dining").is_err());
    assert!(validate_name("Rent/Mortgage").is_err());
    assert!(validate_name("Save!").is_err());
}

#[test]
fn test_name_accepts_plain_words() {
    assert!(validate_name("Groceries").is_ok());
    assert!(validate_name("Fund 2024").is_ok());
    assert!(validate_name("Rainy Day Savings").is_ok());
}

// ── Percentages ───────────────────────────────────────────────

#[test]
fn test_percentage_rejects_zero() {
    assert!(validate_percentage(Decimal::ZERO).is_err());
}

#[test]
fn test_percentage_rejects_negative() {
    assert!(validate_percentage(dec!(-5)).is_err());
}

#[test]
fn test_percentage_rejects_over_100() {
    assert!(validate_percentage(dec!(100.001)).is_err());
    assert!(validate_percentage(dec!(150)).is_err());
}

#[test]
fn test_percentage_rejects_three_decimals() {
    assert!(validate_percentage(dec!(33.333)).is_err());
    assert!(validate_percentage(dec!(0.005)).is_err());
}

#[test]
fn test_percentage_accepts_two_decimals() {
    assert!(validate_percentage(dec!(33.33)).is_ok());
    assert!(validate_percentage(dec!(0.01)).is_ok());
    assert!(validate_percentage(dec!(100.00)).is_ok());
}

#[test]
fn test_percentage_trailing_zeros_do_not_count() {
    // 33.300 carries scale 3 but only 1 significant fractional digit
    assert!(validate_percentage(dec!(33.300)).is_ok());
    assert!(validate_percentage(dec!(100.000)).is_ok());
}
