//! Proration of shipment-level costs across additions and their items.

use tracing::{debug, info};

use super::entities::{
    Addition, AdditionCosts, CostConfiguration, Declaration, EmbeddingMode, Item, ItemCosts,
    PackageCost, ShipmentTotals,
};
use super::error::{check_declaration, CostError};

/// Annotates every addition and item of `declaration` with its landed cost.
///
/// Only the output fields (`cost_configuration`, `Addition::costs`,
/// `Item::costs`) are written, so running it again with the same mode
/// reproduces the same annotations.
pub fn allocate(declaration: &mut Declaration, mode: EmbeddingMode) -> Result<(), CostError> {
    check_declaration(declaration)?;

    let configuration = resolve_configuration(&declaration.totals, mode);
    info!(
        mode = %mode,
        base = configuration.base.label(),
        base_value = configuration.base_value,
        additions = declaration.additions.len(),
        "allocating shipment costs"
    );

    for addition in &mut declaration.additions {
        let costs = addition_costs(addition, &configuration);
        distribute_to_items(&mut addition.items, costs.total);
        debug!(
            addition = %addition.number,
            share_pct = costs.share_pct,
            total = costs.total,
            "addition allocated"
        );
        addition.costs = Some(costs);
    }

    declaration.cost_configuration = Some(configuration);
    Ok(())
}

/// Picks the calculation base and zeroes embedded components.
pub fn resolve_configuration(totals: &ShipmentTotals, mode: EmbeddingMode) -> CostConfiguration {
    let base = mode.base();
    CostConfiguration {
        mode,
        freight_embedded: mode.freight_embedded(),
        insurance_embedded: mode.insurance_embedded(),
        base,
        base_value: base.value_of(totals),
        freight: if mode.freight_embedded() {
            0.0
        } else {
            totals.freight
        },
        insurance: if mode.insurance_embedded() {
            0.0
        } else {
            totals.insurance
        },
        afrmm: totals.afrmm,
        customs_fee: totals.customs_fee,
    }
}

/// Fraction of the calculation base carried by one addition.
pub fn addition_share(merchandise_value: f64, base_value: f64) -> f64 {
    if base_value > 0.0 {
        merchandise_value / base_value
    } else {
        0.0
    }
}

fn addition_costs(addition: &Addition, configuration: &CostConfiguration) -> AdditionCosts {
    let share = addition_share(addition.merchandise_value, configuration.base_value);
    let freight = configuration.freight * share;
    let insurance = configuration.insurance * share;
    let afrmm = configuration.afrmm * share;
    let customs_fee = configuration.customs_fee * share;
    // Import duty is assessed per tariff line, never shared.
    let import_duty = addition.duties.import_duty;

    AdditionCosts {
        base: configuration.base,
        merchandise_value: addition.merchandise_value,
        freight,
        insurance,
        afrmm,
        customs_fee,
        import_duty,
        total: addition.merchandise_value + freight + insurance + afrmm + customs_fee + import_duty,
        share_pct: share * 100.0,
    }
}

/// Splits an addition's total across its items by quantity.
pub fn distribute_to_items(items: &mut [Item], addition_total: f64) {
    let quantity_total: f64 = items.iter().map(|item| item.quantity).sum();

    for item in items.iter_mut() {
        let item_total_cost = if quantity_total > 0.0 {
            addition_total * (item.quantity / quantity_total)
        } else {
            0.0
        };
        let unit_cost = if item.quantity > 0.0 {
            item_total_cost / item.quantity
        } else {
            0.0
        };

        item.costs = Some(ItemCosts {
            item_total_cost,
            unit_cost,
            per_package_cost: package_cost(item_total_cost, item.quantity, item.units_per_package),
        });
    }
}

fn package_cost(item_total_cost: f64, quantity: f64, units_per_package: Option<u32>) -> PackageCost {
    match units_per_package.filter(|units| *units > 0) {
        Some(units) if quantity > 0.0 => {
            PackageCost::Known(item_total_cost / (quantity * units as f64))
        }
        _ => PackageCost::Unknown,
    }
}
