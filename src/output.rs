//src/output.rs

//! Serializers from a finished [`Table`] to the supported text formats.

use std::fmt::Write as FmtWrite;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{KegError, Result};
use crate::types::{Row, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
    Yaml,
    Html,
    /// Nested tree instead of a table.
    Xml,
    /// Genes grouped by EC number, as JSON.
    Enzymes,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Html => "html",
            OutputFormat::Xml => "xml",
            OutputFormat::Enzymes => "enzymes.json",
        }
    }
}

/// Header row followed by one record per row; ragged rows are written as they are.
pub fn to_delimited(table: &Table, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(&row.fields)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| KegError::Serialize(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| KegError::Serialize(e.to_string()))
}

/// A row viewed as an ordered map from header to value.
struct Record<'a> {
    headers: &'a [String],
    row: &'a Row,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (i, value) in self.row.fields.iter().enumerate() {
            match self.headers.get(i) {
                Some(header) => map.serialize_entry(header, value)?,
                None => map.serialize_entry(&format!("column_{}", i + 1), value)?,
            }
        }
        map.end()
    }
}

struct Records<'a>(&'a Table);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let table = self.0;
        let mut seq = serializer.serialize_seq(Some(table.rows.len()))?;
        for row in &table.rows {
            seq.serialize_element(&Record {
                headers: &table.headers,
                row,
            })?;
        }
        seq.end()
    }
}

/// A JSON array of objects keyed by header, in column order.
/// Fields past the last header are keyed `column_<n>`.
pub fn to_json(table: &Table) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Records(table))?)
}

/// Same shape as [`to_json`].
pub fn to_yaml(table: &Table) -> Result<String> {
    Ok(serde_yaml::to_string(&Records(table))?)
}

pub fn to_html(table: &Table) -> String {
    let mut output = String::new();
    output.push_str("<table>\n<thead>\n<tr>");
    for header in &table.headers {
        let _ = write!(output, "<th>{}</th>", html_escape::encode_text(header));
    }
    output.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        output.push_str("<tr>");
        for field in &row.fields {
            let _ = write!(output, "<td>{}</td>", html_escape::encode_text(field));
        }
        output.push_str("</tr>\n");
    }
    output.push_str("</tbody>\n</table>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table {
            headers: vec!["Name".into(), "A".into()],
            rows: vec![
                Row {
                    fields: vec!["leaf, one".into(), "root".into()],
                },
                Row {
                    fields: vec!["x".into(), "y".into(), "extra".into()],
                },
            ],
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn csv_quotes_and_allows_ragged_rows() {
        let csv = to_delimited(&sample(), b',').unwrap();
        assert_eq!(csv, "Name,A\n\"leaf, one\",root\nx,y,extra\n");
    }

    #[test]
    fn tsv_uses_tabs() {
        let tsv = to_delimited(&sample(), b'\t').unwrap();
        assert_eq!(tsv.lines().next(), Some("Name\tA"));
        assert_eq!(tsv.lines().nth(1), Some("leaf, one\troot"));
    }

    #[test]
    fn json_keys_follow_headers() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Name"], "leaf, one");
        assert_eq!(value[0]["A"], "root");
        assert_eq!(value[1]["column_3"], "extra");
        // header order is kept
        assert!(json.find("\"Name\"").unwrap() < json.find("\"A\"").unwrap());
    }

    #[test]
    fn yaml_lists_records() {
        let yaml = to_yaml(&sample()).unwrap();
        assert!(yaml.contains("Name:"));
        assert!(yaml.contains("leaf, one"));
        assert!(yaml.contains("column_3: extra"));
    }

    #[test]
    fn html_escapes_cells() {
        let mut table = sample();
        table.rows[0].fields[0] = "a <b> & c".into();
        let html = to_html(&table);
        assert!(html.contains("<th>Name</th><th>A</th>"));
        assert!(html.contains("<td>a &lt;b&gt; &amp; c</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn extensions() {
        assert_eq!(OutputFormat::Tsv.extension(), "tsv");
        assert_eq!(OutputFormat::Enzymes.extension(), "enzymes.json");
    }
}
