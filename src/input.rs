//! Common routines for reading the simulator's XML output files.
use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;

pub mod battery;
pub mod tripinfo;

/// Read an XML file into a string ready for parsing.
///
/// Parsing happens at the call site because [`Document`] borrows the source text.
pub fn read_xml_source(file_path: &Path) -> Result<String> {
    fs::read_to_string(file_path)
        .with_context(|| format!("Could not read file {}", file_path.display()))
}

/// Parse an XML document, attaching the file path to any error.
pub fn parse_xml<'a>(source: &'a str, file_path: &Path) -> Result<Document<'a>> {
    Document::parse(source).with_context(|| format!("Invalid XML in {}", file_path.display()))
}

/// Read a numeric attribute, coercing absence and unparseable text to `None`.
///
/// The simulator's optional attributes come and go with its configuration, so neither
/// case is treated as corruption.
pub fn attr_f64(node: Node, name: &str) -> Option<f64> {
    node.attribute(name)?.parse().ok()
}

/// Read a numeric attribute, falling back to a neutral default when absent or
/// unparseable.
pub fn attr_f64_or(node: Node, name: &str, default: f64) -> f64 {
    attr_f64(node, name).unwrap_or(default)
}

/// Case-insensitive attribute lookup, for sources whose casing is not fixed.
pub fn attr_ignore_case<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name().eq_ignore_ascii_case(name))
        .map(|attr| attr.value())
}
