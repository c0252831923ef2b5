// src/lib.rs
pub mod types;
pub mod error;
pub mod header;
pub mod stack;
pub mod fields;
pub mod modes;
pub mod options;
pub mod hierarchy;
pub mod tree;
pub mod enzymes;
pub mod kegfile;
pub mod output;

use std::path::Path;

use crate::enzymes::{collect_enzyme_entries, EnzymeCatalog};
use crate::error::{KegError, Result};
use crate::hierarchy::build_table;
use crate::kegfile::read_keg_lines;
use crate::options::ConvertOptions;
use crate::output::OutputFormat;
use crate::tree::KegTree;
use crate::types::{Diagnostic, Table};

/// What one .keg file was converted into. Only the form the requested
/// output needs is built; the others stay `None`.
#[derive(Debug, Default)]
pub struct ConversionResults {
    /// One row per leaf line, ancestors flattened into each row
    pub table: Option<Table>,
    /// Every data line, nested by depth letter
    pub tree: Option<KegTree>,
    /// Genes grouped by EC number
    pub enzymes: Option<EnzymeCatalog>,
}

fn not_built(what: &str) -> KegError {
    KegError::Serialize(format!("no {what} was built for this conversion"))
}

impl ConversionResults {
    fn require_table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or_else(|| not_built("table"))
    }

    pub fn get_csv(&self) -> Result<String> {
        output::to_delimited(self.require_table()?, b',')
    }

    pub fn get_tsv(&self) -> Result<String> {
        output::to_delimited(self.require_table()?, b'\t')
    }

    pub fn get_json(&self) -> Result<String> {
        output::to_json(self.require_table()?)
    }

    pub fn get_yaml(&self) -> Result<String> {
        output::to_yaml(self.require_table()?)
    }

    pub fn get_html(&self) -> Result<String> {
        Ok(output::to_html(self.require_table()?))
    }

    pub fn get_xml(&self) -> Result<String> {
        self.tree
            .as_ref()
            .map(KegTree::to_xml)
            .ok_or_else(|| not_built("tree"))
    }

    pub fn get_enzymes_json(&self) -> Result<String> {
        let catalog = self.enzymes.as_ref().ok_or_else(|| not_built("enzyme catalog"))?;
        serde_json::to_string_pretty(catalog).map_err(KegError::from)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.get_csv(),
            OutputFormat::Tsv => self.get_tsv(),
            OutputFormat::Json => self.get_json(),
            OutputFormat::Yaml => self.get_yaml(),
            OutputFormat::Html => self.get_html(),
            OutputFormat::Xml => self.get_xml(),
            OutputFormat::Enzymes => self.get_enzymes_json(),
        }
    }

    /// Lines dropped under [`ErrorPolicy::SkipRow`](crate::options::ErrorPolicy::SkipRow).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match (&self.table, &self.enzymes) {
            (Some(table), _) => &table.diagnostics,
            (None, Some(catalog)) => &catalog.diagnostics,
            (None, None) => &[],
        }
    }

    /// Rows, genes or tree nodes, whichever was built.
    pub fn record_count(&self) -> usize {
        if let Some(table) = &self.table {
            table.rows.len()
        } else if let Some(catalog) = &self.enzymes {
            catalog.gene_count()
        } else {
            self.tree.as_ref().map_or(0, KegTree::node_count)
        }
    }
}

/// Converts already-read htext lines into what `format` needs. Table formats
/// and enzyme grouping need the header directive on the first line; XML does not.
pub fn convert_keg_lines(
    lines: &[String],
    format: OutputFormat,
    options: &ConvertOptions,
) -> Result<ConversionResults> {
    let mut results = ConversionResults::default();
    match format {
        OutputFormat::Xml => results.tree = Some(KegTree::from_lines(lines)),
        OutputFormat::Enzymes => results.enzymes = Some(collect_enzyme_entries(lines, options)?),
        OutputFormat::Csv
        | OutputFormat::Tsv
        | OutputFormat::Json
        | OutputFormat::Yaml
        | OutputFormat::Html => results.table = Some(build_table(lines, options)?),
    }
    Ok(results)
}

/// Reads a .keg (or .keg.gz) file and converts it.
pub fn convert_keg_file<P: AsRef<Path>>(
    path: P,
    format: OutputFormat,
    options: &ConvertOptions,
) -> Result<ConversionResults> {
    let lines = read_keg_lines(&path)?;
    log::info!(
        "Converting {} ({} lines)",
        path.as_ref().display(),
        lines.len()
    );
    convert_keg_lines(&lines, format, options)
}
