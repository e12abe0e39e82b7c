use rust_decimal::Decimal;

/// Outcome of an allocation check for one parent's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalCheck {
    /// Sum of sibling percentages, excluding the member being updated.
    pub current_total: Decimal,
    /// `current_total` plus the candidate percentage, if any.
    pub would_be_total: Decimal,
    /// Whether the would-be total stays within 100%.
    pub ok: bool,
}

/// Compute the would-be sibling total and decide admissibility.
///
/// `siblings` are `(id, percentage)` pairs for all current children of one
/// parent, re-read from storage on every check rather than cached. Pass
/// `exclude_id` on update so the member's old value is not double counted,
/// and `candidate` for create/update. Delete and finalize checks pass
/// neither. Exactly 100 is admissible; only finalization demands it.
pub fn check_total(
    siblings: &[(i64, Decimal)],
    exclude_id: Option<i64>,
    candidate: Option<Decimal>,
) -> TotalCheck {
    let current_total: Decimal = siblings
        .iter()
        .filter(|(id, _)| Some(*id) != exclude_id)
        .map(|(_, p)| *p)
        .sum();
    let would_be_total = current_total + candidate.unwrap_or(Decimal::ZERO);
    TotalCheck {
        current_total,
        would_be_total,
        ok: would_be_total <= Decimal::ONE_HUNDRED,
    }
}

/// Finalization needs every populated level to close at exactly 100.
pub(crate) fn is_exact(total: Decimal) -> bool {
    total == Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests;
