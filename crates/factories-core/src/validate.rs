//! Pure input validation. Every service operation calls these before the
//! first store mutation — a request that fails validation changes nothing.

use crate::error::{FactoryError, Result};
use crate::types::{MAX_BOUND, MAX_CHILDREN, MIN_BOUND};

/// Trim and length-check a factory name. Returns the trimmed form.
pub fn validate_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < 1 || len > 100 {
        return Err(FactoryError::InvalidName(format!(
            "name must be 1-100 characters after trimming, got {len}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Check a bounds pair: ordered, and both within `[MIN_BOUND, MAX_BOUND]`.
pub fn validate_bounds(lower: i64, upper: i64) -> Result<(i64, i64)> {
    if lower > upper {
        return Err(FactoryError::InvalidBounds(format!(
            "lower_bound {lower} exceeds upper_bound {upper}"
        )));
    }
    if lower < MIN_BOUND || upper > MAX_BOUND {
        return Err(FactoryError::InvalidBounds(format!(
            "bounds must lie within [{MIN_BOUND}, {MAX_BOUND}]"
        )));
    }
    Ok((lower, upper))
}

/// Check a requested child cardinality against `[0, MAX_CHILDREN]`.
pub fn validate_children_count(n: i64) -> Result<i32> {
    if n < 0 || n > MAX_CHILDREN as i64 {
        return Err(FactoryError::InvalidChildrenCount(format!(
            "children_count must be in [0, {MAX_CHILDREN}], got {n}"
        )));
    }
    Ok(n as i32)
}
