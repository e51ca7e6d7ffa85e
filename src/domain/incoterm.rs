//! Trade-term hints for picking an embedding mode.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entities::{Declaration, EmbeddingMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    Exw,
    Fca,
    Fas,
    Fob,
    Cfr,
    Cif,
    Cpt,
    Cip,
    Dap,
    Dpu,
    Ddp,
}

impl Incoterm {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exw => "EXW",
            Self::Fca => "FCA",
            Self::Fas => "FAS",
            Self::Fob => "FOB",
            Self::Cfr => "CFR",
            Self::Cif => "CIF",
            Self::Cpt => "CPT",
            Self::Cip => "CIP",
            Self::Dap => "DAP",
            Self::Dpu => "DPU",
            Self::Ddp => "DDP",
        }
    }

    /// CFR/CPT carry freight in the invoiced value, CIF/CIP carry freight
    /// and insurance. Every other term keeps both separate.
    pub fn embedding_mode(&self) -> EmbeddingMode {
        match self {
            Self::Cfr | Self::Cpt => EmbeddingMode::FreightEmbedded,
            Self::Cif | Self::Cip => EmbeddingMode::BothEmbedded,
            Self::Exw
            | Self::Fca
            | Self::Fas
            | Self::Fob
            | Self::Dap
            | Self::Dpu
            | Self::Ddp => EmbeddingMode::Separate,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unrecognised trade term: {0}")]
pub struct UnknownIncoterm(pub String);

impl FromStr for Incoterm {
    type Err = UnknownIncoterm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXW" => Ok(Self::Exw),
            "FCA" => Ok(Self::Fca),
            "FAS" => Ok(Self::Fas),
            "FOB" => Ok(Self::Fob),
            "CFR" | "C&F" | "CNF" => Ok(Self::Cfr),
            "CIF" => Ok(Self::Cif),
            "CPT" => Ok(Self::Cpt),
            "CIP" => Ok(Self::Cip),
            "DAP" => Ok(Self::Dap),
            "DPU" | "DAT" => Ok(Self::Dpu),
            "DDP" => Ok(Self::Ddp),
            _ => Err(UnknownIncoterm(s.trim().to_string())),
        }
    }
}

/// Suggested mode from the trade term of the first addition.
pub fn suggest_mode(declaration: &Declaration) -> Option<(Incoterm, EmbeddingMode)> {
    let incoterm: Incoterm = declaration.first_incoterm()?.parse().ok()?;
    Some((incoterm, incoterm.embedding_mode()))
}
