//! Console and JSON rendering of an allocated declaration.

use std::fmt::{self, Write as _};
use std::path::Path;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Declaration, EmbeddingMode, Incoterm, PackageCost};
use crate::util::persistence::{settings_file, Settings};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct RunReport<'a> {
    pub generated_at: String,
    pub source: String,
    pub mode: EmbeddingMode,
    pub detected_incoterm: Option<Incoterm>,
    pub declaration: &'a Declaration,
}

impl<'a> RunReport<'a> {
    pub fn new(
        source: String,
        mode: EmbeddingMode,
        detected_incoterm: Option<Incoterm>,
        declaration: &'a Declaration,
    ) -> Self {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            generated_at,
            source,
            mode,
            detected_incoterm,
            declaration,
        }
    }
}

pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

#[derive(Serialize)]
struct IncotermOut<'a> {
    declared: Option<&'a str>,
    incoterm: Option<Incoterm>,
    mode: Option<EmbeddingMode>,
}

pub fn print_incoterm(
    json: bool,
    declared: Option<&str>,
    suggestion: Option<(Incoterm, EmbeddingMode)>,
) -> anyhow::Result<()> {
    if json {
        return print_json(IncotermOut {
            declared,
            incoterm: suggestion.map(|(incoterm, _)| incoterm),
            mode: suggestion.map(|(_, mode)| mode),
        });
    }

    match (declared, suggestion) {
        (_, Some((incoterm, mode))) => {
            println!("{}\t{}\t{}", incoterm.code(), mode, mode.describe())
        }
        (Some(raw), None) => println!("{raw}\tunrecognised"),
        (None, None) => println!("no trade term declared"),
    }
    Ok(())
}

pub fn print_settings(json: bool, settings: &Settings) -> anyhow::Result<()> {
    if json {
        return print_json(settings);
    }
    println!("default_mode\t{}", settings.default_mode);
    println!("detect_incoterm\t{}", settings.detect_incoterm);
    println!("strict\t{}", settings.strict);
    if let Some(path) = settings_file().as_deref().map(Path::display) {
        println!("file\t{path}");
    }
    Ok(())
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Plain-text summary; amounts rounded to two decimals.
pub fn render_text(declaration: &Declaration) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let header = &declaration.header;

    writeln!(
        out,
        "Declaration {}",
        header.number.as_deref().unwrap_or("N/A")
    )?;
    if let Some(date) = &header.registration_date {
        writeln!(out, "Registered  {date}")?;
    }
    if let Some(importer) = &header.importer_name {
        writeln!(out, "Importer    {importer}")?;
    }

    if let Some(configuration) = &declaration.cost_configuration {
        writeln!(
            out,
            "Base        {} {} ({})",
            configuration.base.label(),
            money(configuration.base_value),
            configuration.mode.describe()
        )?;
        writeln!(
            out,
            "Prorated    freight {} | insurance {} | AFRMM {} | fee {}",
            money(configuration.freight),
            money(configuration.insurance),
            money(configuration.afrmm),
            money(configuration.customs_fee)
        )?;
    }

    for addition in &declaration.additions {
        writeln!(out)?;
        write!(out, "Addition {}", addition.number)?;
        if let Some(ncm) = &addition.ncm {
            write!(out, " NCM {ncm}")?;
        }
        writeln!(out)?;

        if let Some(costs) = &addition.costs {
            writeln!(
                out,
                "  value {} + freight {} + insurance {} + AFRMM {} + fee {} + II {} = {} ({:.2}%)",
                money(costs.merchandise_value),
                money(costs.freight),
                money(costs.insurance),
                money(costs.afrmm),
                money(costs.customs_fee),
                money(costs.import_duty),
                money(costs.total),
                costs.share_pct
            )?;
        }

        for item in &addition.items {
            let Some(costs) = &item.costs else {
                continue;
            };
            let per_package = match costs.per_package_cost {
                PackageCost::Known(value) => money(value),
                PackageCost::Unknown => "N/A".to_string(),
            };
            writeln!(
                out,
                "  {:>4}  {:<12} qty {:>10}  total {:>12}  unit {:>10}  package {:>10}",
                item.sequence,
                item.product_code.as_deref().unwrap_or("-"),
                item.quantity,
                money(costs.item_total_cost),
                money(costs.unit_cost),
                per_package
            )?;
        }
    }

    if let Some(validation) = &declaration.validation {
        writeln!(out)?;
        writeln!(
            out,
            "Validation  {}: computed {} vs expected {} (diff {}, {:.4}%)",
            validation.status.label(),
            money(validation.computed_total),
            money(validation.expected_total),
            money(validation.difference),
            validation.percent_difference
        )?;
        writeln!(out, "            {}", validation.configuration)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{process, Addition, DeclarationHeader, Item, ShipmentTotals};

    #[test]
    fn text_summary_shows_costs_and_status() {
        let mut declaration = Declaration::new(
            DeclarationHeader {
                number: Some("123".into()),
                ..Default::default()
            },
            ShipmentTotals {
                fob: 100.0,
                freight: 10.0,
                customs_value: 110.0,
                ..Default::default()
            },
            vec![Addition {
                number: "001".into(),
                merchandise_value: 100.0,
                items: vec![Item {
                    sequence: "1".into(),
                    quantity: 4.0,
                    ..Default::default()
                }],
                ..Default::default()
            }],
        );
        process(&mut declaration, EmbeddingMode::Separate).unwrap();

        let text = render_text(&declaration).unwrap();
        assert!(text.contains("Declaration 123"));
        assert!(text.contains("= 110.00 (100.00%)"));
        assert!(text.contains("unit      27.50"));
        assert!(text.contains("package        N/A"));
        assert!(text.contains("Validation  OK"));
    }
}
