//! Loading declarations from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use crate::domain::Declaration;
use crate::infra::di_xml::{parse_declaration, DiXmlError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Xml(#[from] DiXmlError),
    #[error("invalid declaration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported declaration file {0} (expected .xml or .json)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    DiXml,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xml" => Some(Self::DiXml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Reads a DI XML export or a serialized declaration, picked by extension.
pub fn load_declaration(path: &Path) -> Result<Declaration, SourceError> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| SourceError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("loading declaration from {}", path.display());
    parse_source(&content, format)
}

pub fn parse_source(content: &str, format: SourceFormat) -> Result<Declaration, SourceError> {
    match format {
        SourceFormat::DiXml => Ok(parse_declaration(content)?),
        SourceFormat::Json => {
            let mut declaration: Declaration = serde_json::from_str(content)?;
            // Stale annotations from a previous run are never trusted.
            declaration.refresh_duty_totals();
            declaration.cost_configuration = None;
            declaration.validation = None;
            for addition in &mut declaration.additions {
                addition.costs = None;
                for item in &mut addition.items {
                    item.costs = None;
                }
            }
            Ok(declaration)
        }
    }
}
