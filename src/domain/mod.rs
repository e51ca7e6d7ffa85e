//! Landed-cost allocation and reconciliation live here.

pub mod allocation;
pub mod entities;
pub mod error;
pub mod incoterm;
pub mod validation;

#[cfg(test)]
mod fixtures;

#[allow(unused_imports)]
pub use allocation::{addition_share, allocate, distribute_to_items, resolve_configuration};
#[allow(unused_imports)]
pub use entities::{
    Addition, AdditionCosts, AdditionDuties, CostBase, CostConfiguration, Declaration,
    DeclarationHeader, DutyTotals, EmbeddingMode, Item, ItemCosts, PackageCost, ShipmentTotals,
};
#[allow(unused_imports)]
pub use error::CostError;
#[allow(unused_imports)]
pub use incoterm::{suggest_mode, Incoterm, UnknownIncoterm};
#[allow(unused_imports)]
pub use validation::{
    expected_total, process, validate, ValidationResult, ValidationStatus,
    DIVERGENCE_TOLERANCE_PCT,
};
