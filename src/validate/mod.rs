use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

pub(crate) const NAME_MIN_LEN: usize = 3;
pub(crate) const NAME_MAX_LEN: usize = 50;

fn name_shape_ok(name: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[A-Za-z][A-Za-z0-9 ]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Check the shape of a plan/category/subcategory name.
///
/// Names are 3-50 characters, start with a letter, and contain only letters,
/// digits, and spaces. Returns the first violated rule as the reason.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name cannot be empty");
    }
    let len = name.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err("name must be between 3 and 50 characters");
    }
    if !name_shape_ok(name) {
        return Err("name must start with a letter and contain only letters, digits, and spaces");
    }
    Ok(())
}

/// Check the shape of a single percentage value.
///
/// Percentages are strictly positive, at most 100, and carry at most two
/// fractional digits. Totals are checked elsewhere; this never looks at
/// siblings.
pub fn validate_percentage(percentage: Decimal) -> Result<(), &'static str> {
    if percentage <= Decimal::ZERO {
        return Err("percentage must be greater than zero");
    }
    if percentage > Decimal::ONE_HUNDRED {
        return Err("percentage cannot exceed 100");
    }
    // normalize() drops trailing zeros, so 33.30 passes and 33.333 fails
    if percentage.normalize().scale() > 2 {
        return Err("percentage can have at most 2 decimal places");
    }
    Ok(())
}

#[cfg(test)]
mod tests;
