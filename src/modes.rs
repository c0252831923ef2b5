//src/modes.rs

//! How leaf and ancestor lines are turned into fields, selected once from the
//! header directive.

use crate::error::FieldError;
use crate::fields::{parse_description_line, parse_ec_line, parse_kegg_line, split_map_leaf};
use crate::header::HeaderDirective;

/// Turns one line's trimmed content into row fields.
pub type Extractor = fn(&str) -> Result<Vec<String>, FieldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafMode {
    /// One declared column: the whole content is one field.
    SingleColumn,
    /// `entity<TAB>classification`, expanded into seven fields.
    Map,
    /// Tab-separated fields copied as they are, however many there are.
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorMode {
    Plain,
    /// Ancestors are EC lines: `(ec, description)` each.
    EnzymeClassification,
}

impl LeafMode {
    pub fn from_directive(directive: &HeaderDirective) -> Self {
        if directive.columns.len() == 1 {
            LeafMode::SingleColumn
        } else if directive.is_map_mode {
            LeafMode::Map
        } else {
            LeafMode::Generic
        }
    }

    pub fn extractor(self) -> Extractor {
        match self {
            LeafMode::SingleColumn => extract_single,
            LeafMode::Map => extract_map,
            LeafMode::Generic => extract_tab_separated,
        }
    }
}

impl AncestorMode {
    pub fn from_directive(directive: &HeaderDirective) -> Self {
        if directive.is_enzyme_mode {
            AncestorMode::EnzymeClassification
        } else {
            AncestorMode::Plain
        }
    }

    pub fn extractor(self) -> Extractor {
        match self {
            AncestorMode::Plain => extract_single,
            AncestorMode::EnzymeClassification => extract_ec,
        }
    }

    /// Fields each open ancestor contributes to a row.
    pub fn fields_per_ancestor(self) -> usize {
        match self {
            AncestorMode::Plain => 1,
            AncestorMode::EnzymeClassification => 2,
        }
    }
}

fn extract_single(content: &str) -> Result<Vec<String>, FieldError> {
    Ok(vec![content.to_string()])
}

fn extract_tab_separated(content: &str) -> Result<Vec<String>, FieldError> {
    Ok(content.split('\t').map(str::to_string).collect())
}

fn extract_map(content: &str) -> Result<Vec<String>, FieldError> {
    let (entity, classification) = split_map_leaf(content)?;

    let mut fields = Vec::with_capacity(7);
    fields.extend(parse_description_line(entity)?.into_fields());
    fields.extend(parse_kegg_line(classification)?.into_fields());
    Ok(fields)
}

fn extract_ec(content: &str) -> Result<Vec<String>, FieldError> {
    Ok(parse_ec_line(content)?.into_fields().to_vec())
}
