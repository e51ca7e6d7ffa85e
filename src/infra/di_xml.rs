//! Reader for the Siscomex import-declaration (DI) XML export.
//!
//! - Numeric fields are zero-padded fixed-point digit strings; each field
//!   has its own implied number of decimals.
//! - Blank or malformed numbers read as zero so the engine always gets a
//!   complete record.

use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;
use time::{format_description, Date};
use tracing::{info, warn};

use crate::domain::{
    Addition, AdditionDuties, Declaration, DeclarationHeader, Item, ShipmentTotals,
};

/// Money fields carry two implied decimals.
const MONEY_SCALE: f64 = 100.0;
const QUANTITY_SCALE: f64 = 100_000.0;
const UNIT_VALUE_SCALE: f64 = 10_000_000.0;

#[derive(Debug, Error)]
pub enum DiXmlError {
    #[error("malformed DI XML: {0}")]
    Malformed(#[from] quick_xml::DeError),
    #[error("declaracaoImportacao element not found")]
    MissingDeclaration,
    #[error("declaration {0} has no adicao elements")]
    NoAdditions(String),
}

#[derive(Debug, Deserialize)]
struct DeclarationList {
    #[serde(rename = "declaracaoImportacao", default)]
    declarations: Vec<RawDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeclaration {
    #[serde(rename = "numeroDI")]
    numero_di: Option<String>,
    data_registro: Option<String>,
    urf_despacho_nome: Option<String>,
    importador_nome: Option<String>,
    importador_numero: Option<String>,
    local_embarque_total_reais: Option<String>,
    frete_total_reais: Option<String>,
    seguro_total_reais: Option<String>,
    afrmm: Option<String>,
    taxa_siscomex: Option<String>,
    local_descarga_total_reais: Option<String>,
    #[serde(default)]
    adicao: Vec<RawAddition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddition {
    numero_adicao: Option<String>,
    dados_mercadoria_codigo_ncm: Option<String>,
    condicao_venda_incoterm: Option<String>,
    condicao_venda_valor_reais: Option<String>,
    ii_aliquota_valor_recolher: Option<String>,
    ipi_aliquota_valor_recolher: Option<String>,
    pis_pasep_aliquota_valor_recolher: Option<String>,
    cofins_aliquota_valor_recolher: Option<String>,
    #[serde(default)]
    mercadoria: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    numero_sequencial_item: Option<String>,
    descricao_mercadoria: Option<String>,
    quantidade: Option<String>,
    unidade_medida: Option<String>,
    valor_unitario: Option<String>,
}

/// Parses a DI XML document into a declaration ready for allocation.
pub fn parse_declaration(xml: &str) -> Result<Declaration, DiXmlError> {
    info!("parsing DI XML ({} bytes)", xml.len());

    let list: DeclarationList = from_str(xml)?;
    let Some(raw) = list.declarations.into_iter().next() else {
        return Err(DiXmlError::MissingDeclaration);
    };

    let number = non_blank(raw.numero_di.as_deref());
    if raw.adicao.is_empty() {
        return Err(DiXmlError::NoAdditions(
            number.clone().unwrap_or_else(|| "N/A".to_string()),
        ));
    }

    let header = DeclarationHeader {
        number,
        registration_date: raw.data_registro.as_deref().and_then(registration_date),
        customs_unit: non_blank(raw.urf_despacho_nome.as_deref()),
        importer_name: non_blank(raw.importador_nome.as_deref()),
        importer_tax_id: non_blank(raw.importador_numero.as_deref()),
    };

    let totals = ShipmentTotals {
        fob: money(&raw.local_embarque_total_reais),
        freight: money(&raw.frete_total_reais),
        insurance: money(&raw.seguro_total_reais),
        afrmm: money(&raw.afrmm),
        customs_fee: money(&raw.taxa_siscomex),
        customs_value: money(&raw.local_descarga_total_reais),
    };

    let additions: Vec<Addition> = raw.adicao.into_iter().map(convert_addition).collect();
    let declaration = Declaration::new(header, totals, additions);

    info!(
        additions = declaration.additions.len(),
        items = declaration.item_count(),
        "parsed DI {}",
        declaration.header.number.as_deref().unwrap_or("N/A")
    );

    Ok(declaration)
}

fn convert_addition(raw: RawAddition) -> Addition {
    let number = non_blank(raw.numero_adicao.as_deref()).unwrap_or_else(|| "N/A".to_string());
    let items: Vec<Item> = raw.mercadoria.into_iter().map(convert_item).collect();
    if items.is_empty() {
        warn!(addition = %number, "addition has no merchandise lines");
    }

    Addition {
        number,
        ncm: non_blank(raw.dados_mercadoria_codigo_ncm.as_deref()),
        incoterm: non_blank(raw.condicao_venda_incoterm.as_deref()),
        merchandise_value: money(&raw.condicao_venda_valor_reais),
        duties: AdditionDuties {
            import_duty: money(&raw.ii_aliquota_valor_recolher),
            excise_duty: money(&raw.ipi_aliquota_valor_recolher),
            pis: money(&raw.pis_pasep_aliquota_valor_recolher),
            cofins: money(&raw.cofins_aliquota_valor_recolher),
        },
        items,
        costs: None,
    }
}

fn convert_item(raw: RawItem) -> Item {
    let description = raw
        .descricao_mercadoria
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Item {
        sequence: non_blank(raw.numero_sequencial_item.as_deref()).unwrap_or_else(|| "N/A".to_string()),
        product_code: product_code(&description),
        units_per_package: units_per_package(&description),
        description,
        unit: non_blank(raw.unidade_medida.as_deref()),
        quantity: parse_fixed_point(raw.quantidade.as_deref(), QUANTITY_SCALE),
        unit_value: parse_fixed_point(raw.valor_unitario.as_deref(), UNIT_VALUE_SCALE),
        costs: None,
    }
}

fn money(value: &Option<String>) -> f64 {
    parse_fixed_point(value.as_deref(), MONEY_SCALE)
}

/// Converts a zero-padded digit string with `scale` implied decimals.
///
/// Blank fields read as zero. Signs are kept so negative amounts reach the
/// allocation checks.
pub fn parse_fixed_point(value: Option<&str>, scale: f64) -> f64 {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return 0.0;
    };

    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed / scale,
        _ => {
            warn!("unparseable numeric field {raw:?}; using 0");
            0.0
        }
    }
}

/// Leading code of descriptions shaped like `"ABC-123 - Widget ..."`.
pub fn product_code(description: &str) -> Option<String> {
    let (code, _) = description.split_once(" - ")?;
    non_blank(Some(code))
}

/// Package multiplier from descriptions containing `"EM CX COM 12 UNIDADES"`.
pub fn units_per_package(description: &str) -> Option<u32> {
    let (_, rest) = description.split_once("EM CX COM")?;
    let (count, _) = rest.split_once("UNIDADES")?;
    count.trim().parse::<u32>().ok().filter(|units| *units > 0)
}

fn registration_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let input = format_description::parse("[year][month][day]").ok()?;
    let output = format_description::parse("[year]-[month]-[day]").ok()?;
    match Date::parse(raw, &input) {
        Ok(date) => date.format(&output).ok(),
        Err(_) => non_blank(Some(raw)),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "N/A")
        .map(str::to_string)
}
