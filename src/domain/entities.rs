#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationResult;

/// Informational header of a customs declaration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationHeader {
    pub number: Option<String>,
    /// ISO `YYYY-MM-DD` when the source date could be parsed.
    pub registration_date: Option<String>,
    pub customs_unit: Option<String>,
    pub importer_name: Option<String>,
    pub importer_tax_id: Option<String>,
}

/// Shipment-level monetary totals, all in the calculation currency.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentTotals {
    pub fob: f64,
    pub freight: f64,
    pub insurance: f64,
    pub afrmm: f64,
    pub customs_fee: f64,
    /// Duty-assessment value, normally FOB + freight + insurance.
    pub customs_value: f64,
}

/// Duty amounts of a single addition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionDuties {
    pub import_duty: f64,
    pub excise_duty: f64,
    pub pis: f64,
    pub cofins: f64,
}

/// Shipment-wide duty sums. Always derived from the additions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DutyTotals {
    pub import_duty: f64,
    pub excise_duty: f64,
    pub pis: f64,
    pub cofins: f64,
}

impl DutyTotals {
    pub fn from_additions(additions: &[Addition]) -> Self {
        additions.iter().fold(Self::default(), |mut acc, addition| {
            acc.import_duty += addition.duties.import_duty;
            acc.excise_duty += addition.duties.excise_duty;
            acc.pis += addition.duties.pis;
            acc.cofins += addition.duties.cofins;
            acc
        })
    }
}

/// Root aggregate: one shipment, subdivided into additions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub header: DeclarationHeader,
    #[serde(default)]
    pub totals: ShipmentTotals,
    #[serde(default)]
    pub duty_totals: DutyTotals,
    #[serde(default)]
    pub additions: Vec<Addition>,
    #[serde(default)]
    pub cost_configuration: Option<CostConfiguration>,
    #[serde(default)]
    pub validation: Option<ValidationResult>,
}

impl Declaration {
    pub fn new(header: DeclarationHeader, totals: ShipmentTotals, additions: Vec<Addition>) -> Self {
        let duty_totals = DutyTotals::from_additions(&additions);
        Self {
            header,
            totals,
            duty_totals,
            additions,
            cost_configuration: None,
            validation: None,
        }
    }

    /// Recomputes `duty_totals` from the current additions.
    pub fn refresh_duty_totals(&mut self) {
        self.duty_totals = DutyTotals::from_additions(&self.additions);
    }

    pub fn item_count(&self) -> usize {
        self.additions.iter().map(|a| a.items.len()).sum()
    }

    /// Sale condition of the first addition; `None` when it is blank.
    pub fn first_incoterm(&self) -> Option<&str> {
        self.additions
            .first()?
            .incoterm
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// A tariff-classified lot within the declaration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub ncm: Option<String>,
    #[serde(default)]
    pub incoterm: Option<String>,
    /// VCMV: value of this addition's goods in the calculation currency.
    #[serde(default)]
    pub merchandise_value: f64,
    #[serde(default)]
    pub duties: AdditionDuties,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub costs: Option<AdditionCosts>,
}

impl Addition {
    pub fn quantity_total(&self) -> f64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Merchandise line within an addition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub sequence: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    /// Foreign-currency unit value; informational only.
    #[serde(default)]
    pub unit_value: f64,
    #[serde(default)]
    pub units_per_package: Option<u32>,
    #[serde(default)]
    pub costs: Option<ItemCosts>,
}

/// The two embedding flags folded into one of four named states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMode {
    /// Freight and insurance are charged apart from the merchandise value (FOB, EXW).
    #[default]
    Separate,
    /// Freight is already inside the merchandise value (CFR).
    FreightEmbedded,
    /// Insurance only. No common trade term does this; accepted as-is.
    InsuranceEmbedded,
    /// Freight and insurance both inside the merchandise value (CIF).
    BothEmbedded,
}

impl EmbeddingMode {
    pub fn from_flags(freight_embedded: bool, insurance_embedded: bool) -> Self {
        match (freight_embedded, insurance_embedded) {
            (false, false) => Self::Separate,
            (true, false) => Self::FreightEmbedded,
            (false, true) => Self::InsuranceEmbedded,
            (true, true) => Self::BothEmbedded,
        }
    }

    pub fn freight_embedded(&self) -> bool {
        matches!(self, Self::FreightEmbedded | Self::BothEmbedded)
    }

    pub fn insurance_embedded(&self) -> bool {
        matches!(self, Self::InsuranceEmbedded | Self::BothEmbedded)
    }

    pub fn base(&self) -> CostBase {
        match self {
            Self::Separate => CostBase::Fob,
            Self::FreightEmbedded | Self::InsuranceEmbedded | Self::BothEmbedded => {
                CostBase::CustomsValue
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::FreightEmbedded => "freight-embedded",
            Self::InsuranceEmbedded => "insurance-embedded",
            Self::BothEmbedded => "both-embedded",
        }
    }

    /// Human-readable echo, e.g. "Freight: embedded, Insurance: separate".
    pub fn describe(&self) -> String {
        fn label(embedded: bool) -> &'static str {
            if embedded {
                "embedded"
            } else {
                "separate"
            }
        }
        format!(
            "Freight: {}, Insurance: {}",
            label(self.freight_embedded()),
            label(self.insurance_embedded())
        )
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value basis that shipment costs are prorated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBase {
    Fob,
    CustomsValue,
}

impl CostBase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fob => "FOB",
            Self::CustomsValue => "Customs value",
        }
    }

    pub fn value_of(&self, totals: &ShipmentTotals) -> f64 {
        match self {
            Self::Fob => totals.fob,
            Self::CustomsValue => totals.customs_value,
        }
    }
}

/// Audit trail of how an allocation run was configured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostConfiguration {
    pub mode: EmbeddingMode,
    pub freight_embedded: bool,
    pub insurance_embedded: bool,
    pub base: CostBase,
    pub base_value: f64,
    /// Shipment amounts actually prorated; embedded components are zero.
    pub freight: f64,
    pub insurance: f64,
    pub afrmm: f64,
    pub customs_fee: f64,
}

/// Cost breakdown of one addition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdditionCosts {
    pub base: CostBase,
    pub merchandise_value: f64,
    pub freight: f64,
    pub insurance: f64,
    pub afrmm: f64,
    pub customs_fee: f64,
    pub import_duty: f64,
    pub total: f64,
    /// Share of the calculation base, as a percentage.
    pub share_pct: f64,
}

impl AdditionCosts {
    pub fn share(&self) -> f64 {
        self.share_pct / 100.0
    }
}

/// Per-package cost; `Unknown` when packaging cannot be determined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PackageCost {
    Known(f64),
    Unknown,
}

impl PackageCost {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemCosts {
    pub item_total_cost: f64,
    pub unit_cost: f64,
    pub per_package_cost: PackageCost,
}
