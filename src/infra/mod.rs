//! Readers that turn source files into declarations.

pub mod di_xml;
pub mod source;
