//src/types.rs

use serde::Serialize;

/// One data line of an htext file together with its position and depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub line_number: usize, // 1-based, the header is line 1
    pub depth: usize,       // A=0, B=1, ...
    pub text: String,       // the line as read, depth letter included
}

impl RawLine {
    /// The payload after the depth letter, trimmed on both sides.
    /// Inner tabs survive; leaf grammars split on them.
    pub fn content(&self) -> &str {
        // the depth letter is always one ASCII byte
        self.text.get(1..).unwrap_or("").trim()
    }
}

/// A flattened record: leaf fields first, then ancestor fields nearest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub fields: Vec<String>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A leaf line that was dropped under [`crate::options::ErrorPolicy::SkipRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line_number: usize,
    pub content: String,
    pub message: String,
}

/// Headers plus the rows emitted in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// A KEGG orthology assignment taken from the classification half of a leaf,
/// e.g. `K00567 methylated-DNA-[protein]-cysteine S-methyltransferase [EC:2.1.1.63]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeggOrtholog {
    pub name: String,
    pub description: String,
    pub ec_numbers: Vec<String>,
}

/// A gene leaf under an enzyme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gene {
    pub name: String,
    pub alternative_names: String,
    pub description: String,
    pub ortholog: KeggOrtholog,
}

/// All genes listed under one EC number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnzymeEntry {
    pub ec: String,
    pub description: String,
    pub genes: Vec<Gene>,
}
