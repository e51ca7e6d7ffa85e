use thiserror::Error;

use super::entities::Declaration;

/// Structural precondition violations. Zero bases, zero quantities and
/// unknown packaging are not errors.
#[derive(Debug, Error, PartialEq)]
pub enum CostError {
    #[error("declaration has no additions")]
    NoAdditions,
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidAmount { field: String, value: f64 },
    #[error("addition {addition} has not been allocated")]
    NotAllocated { addition: String },
}

fn check_amount(field: impl FnOnce() -> String, value: f64) -> Result<(), CostError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CostError::InvalidAmount {
            field: field(),
            value,
        })
    }
}

/// Rejects empty declarations and negative or non-finite amounts.
pub fn check_declaration(declaration: &Declaration) -> Result<(), CostError> {
    if declaration.additions.is_empty() {
        return Err(CostError::NoAdditions);
    }

    let totals = &declaration.totals;
    for (name, value) in [
        ("totals.fob", totals.fob),
        ("totals.freight", totals.freight),
        ("totals.insurance", totals.insurance),
        ("totals.afrmm", totals.afrmm),
        ("totals.customs_fee", totals.customs_fee),
        ("totals.customs_value", totals.customs_value),
    ] {
        check_amount(|| name.to_string(), value)?;
    }

    for addition in &declaration.additions {
        check_amount(
            || format!("addition {} merchandise_value", addition.number),
            addition.merchandise_value,
        )?;
        check_amount(
            || format!("addition {} import_duty", addition.number),
            addition.duties.import_duty,
        )?;
        for item in &addition.items {
            check_amount(
                || format!("addition {} item {} quantity", addition.number, item.sequence),
                item.quantity,
            )?;
        }
    }

    Ok(())
}
