//! Declarations shared by the domain tests.

use super::entities::{
    Addition, AdditionDuties, Declaration, DeclarationHeader, Item, ShipmentTotals,
};

pub fn item(sequence: &str, quantity: f64, units_per_package: Option<u32>) -> Item {
    Item {
        sequence: sequence.to_string(),
        description: format!("item {sequence}"),
        quantity,
        units_per_package,
        ..Default::default()
    }
}

pub fn addition(number: &str, merchandise_value: f64, import_duty: f64, items: Vec<Item>) -> Addition {
    Addition {
        number: number.to_string(),
        merchandise_value,
        duties: AdditionDuties {
            import_duty,
            ..Default::default()
        },
        items,
        ..Default::default()
    }
}

/// FOB 1000, freight 100, AFRMM 20, fee 10; additions of 600 and 400 with
/// import duties of 60 and 40.
pub fn two_addition_shipment() -> Declaration {
    Declaration::new(
        DeclarationHeader {
            number: Some("24/0000001-0".into()),
            ..Default::default()
        },
        ShipmentTotals {
            fob: 1000.0,
            freight: 100.0,
            insurance: 0.0,
            afrmm: 20.0,
            customs_fee: 10.0,
            customs_value: 1100.0,
        },
        vec![
            addition(
                "001",
                600.0,
                60.0,
                vec![item("1", 10.0, Some(12)), item("2", 20.0, None)],
            ),
            addition("002", 400.0, 40.0, vec![item("1", 4.0, Some(1))]),
        ],
    )
}

/// CIF-style shipment: merchandise values already carry freight and
/// insurance, so they add up to the customs value.
pub fn cif_shipment() -> Declaration {
    Declaration::new(
        DeclarationHeader::default(),
        ShipmentTotals {
            fob: 900.0,
            freight: 80.0,
            insurance: 20.0,
            afrmm: 16.0,
            customs_fee: 50.0,
            customs_value: 1000.0,
        },
        vec![
            addition("001", 750.0, 75.0, vec![item("1", 30.0, Some(6))]),
            addition("002", 250.0, 20.0, vec![item("1", 5.0, None)]),
        ],
    )
}
