//! Reconciliation of allocated costs against the declared shipment totals.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::allocation::allocate;
use super::entities::{Declaration, EmbeddingMode};
use super::error::CostError;

/// Divergence below this percentage counts as rounding noise.
pub const DIVERGENCE_TOLERANCE_PCT: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Ok,
    Divergent,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Divergent => "DIVERGENT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub computed_total: f64,
    pub expected_total: f64,
    pub difference: f64,
    pub percent_difference: f64,
    pub status: ValidationStatus,
    pub configuration: String,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.status == ValidationStatus::Ok
    }
}

/// Compares the allocated addition totals with a total rebuilt from the
/// raw shipment figures.
pub fn validate(declaration: &Declaration, mode: EmbeddingMode) -> Result<ValidationResult, CostError> {
    if declaration.additions.is_empty() {
        return Err(CostError::NoAdditions);
    }

    let mut computed_total = 0.0;
    for addition in &declaration.additions {
        let Some(costs) = addition.costs.as_ref() else {
            return Err(CostError::NotAllocated {
                addition: addition.number.clone(),
            });
        };
        computed_total += costs.total;
    }

    let expected_total = expected_total(declaration, mode);
    let difference = (computed_total - expected_total).abs();
    let percent_difference = if expected_total > 0.0 {
        difference / expected_total * 100.0
    } else {
        0.0
    };
    let status = if percent_difference < DIVERGENCE_TOLERANCE_PCT {
        ValidationStatus::Ok
    } else {
        ValidationStatus::Divergent
    };

    let result = ValidationResult {
        computed_total,
        expected_total,
        difference,
        percent_difference,
        status,
        configuration: mode.describe(),
    };

    match status {
        ValidationStatus::Ok => info!(
            computed = computed_total,
            expected = expected_total,
            "allocation reconciles with declared totals"
        ),
        ValidationStatus::Divergent => warn!(
            computed = computed_total,
            expected = expected_total,
            percent = percent_difference,
            "allocation diverges from declared totals"
        ),
    }

    Ok(result)
}

/// Shipment total the allocation should reproduce, built without looking at
/// any addition-level cost.
pub fn expected_total(declaration: &Declaration, mode: EmbeddingMode) -> f64 {
    let totals = &declaration.totals;
    let logistics = if mode.freight_embedded() || mode.insurance_embedded() {
        let mut value = totals.customs_value;
        if !mode.freight_embedded() {
            value += totals.freight;
        }
        if !mode.insurance_embedded() {
            value += totals.insurance;
        }
        value
    } else {
        totals.fob + totals.freight + totals.insurance
    };

    logistics + totals.afrmm + totals.customs_fee + declaration.duty_totals.import_duty
}

/// Allocates, validates and stores the result on the declaration.
pub fn process(declaration: &mut Declaration, mode: EmbeddingMode) -> Result<ValidationResult, CostError> {
    allocate(declaration, mode)?;
    let result = validate(declaration, mode)?;
    declaration.validation = Some(result.clone());
    Ok(result)
}
