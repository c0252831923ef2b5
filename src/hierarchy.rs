//src/hierarchy.rs

use crate::error::{KegError, Result};
use crate::header::{depth_of, HeaderDirective};
use crate::modes::{AncestorMode, Extractor, LeafMode};
use crate::options::{ConvertOptions, ErrorPolicy};
use crate::stack::HierarchyStack;
use crate::types::{Diagnostic, RawLine, Row, Table};

/// Lines starting with one of these carry no data.
const COMMENT_MARKERS: [char; 2] = ['#', '%'];

/// Turns a line into a [`RawLine`] if it carries data.
/// Comments, blank payloads and lines without a depth letter give `None`.
pub fn classify_line(line_number: usize, text: &str) -> Option<RawLine> {
    let text = text.trim_end_matches(['\r', '\n']);
    if text.starts_with(COMMENT_MARKERS) {
        log::debug!("line {line_number}: skipping comment");
        return None;
    }
    let Some(depth) = depth_of(text) else {
        if !text.trim().is_empty() {
            log::debug!("line {line_number}: skipping non-data line {text:?}");
        }
        return None;
    };

    let line = RawLine {
        line_number,
        depth,
        text: text.to_string(),
    };
    if line.content().is_empty() {
        return None;
    }
    Some(line)
}

/// Single pass over the lines following the header: keeps the open
/// ancestors and hands back every line at the declared leaf depth.
#[derive(Debug)]
pub struct HierarchyParser {
    directive: HeaderDirective,
    stack: HierarchyStack,
}

impl HierarchyParser {
    pub fn new(directive: HeaderDirective) -> Self {
        Self {
            directive,
            stack: HierarchyStack::new(),
        }
    }

    pub fn from_header(line: &str) -> Result<Self> {
        Ok(Self::new(HeaderDirective::parse(line)?))
    }

    pub fn directive(&self) -> &HeaderDirective {
        &self.directive
    }

    /// The ancestors open right now, valid for the leaf last returned by [`feed`](Self::feed).
    pub fn ancestors(&self) -> &HierarchyStack {
        &self.stack
    }

    /// Processes one line. Returns the line when it is a leaf; any other data
    /// line becomes an open ancestor once its older siblings are closed.
    pub fn feed(&mut self, line_number: usize, text: &str) -> Result<Option<RawLine>> {
        let Some(line) = classify_line(line_number, text) else {
            return Ok(None);
        };

        self.stack.close_to(line.depth)?;

        if line.depth == self.directive.leaf_depth {
            return Ok(Some(line));
        }
        if line.depth > self.directive.leaf_depth {
            // deeper than any leaf; the next leaf or sibling closes it again
            log::debug!(
                "line {}: depth {} is below the leaf level {}",
                line.line_number,
                line.depth,
                self.directive.leaf_depth
            );
        }
        self.stack.push(line);
        Ok(None)
    }
}

/// Combines a leaf's own fields with the fields of its open ancestors.
#[derive(Debug, Clone, Copy)]
pub struct RowAssembler {
    leaf: Extractor,
    ancestor: Extractor,
    ancestor_width: usize,
    policy: ErrorPolicy,
}

impl RowAssembler {
    pub fn new(directive: &HeaderDirective, policy: ErrorPolicy) -> Self {
        let ancestor_mode = AncestorMode::from_directive(directive);
        Self {
            leaf: LeafMode::from_directive(directive).extractor(),
            ancestor: ancestor_mode.extractor(),
            ancestor_width: ancestor_mode.fields_per_ancestor(),
            policy,
        }
    }

    /// Leaf fields first, then each ancestor's fields, nearest ancestor first.
    pub fn assemble(&self, leaf: &RawLine, ancestors: &HierarchyStack) -> Result<Row> {
        let mut fields = extract(self.leaf, leaf)?;
        fields.reserve(ancestors.height() * self.ancestor_width);
        for ancestor in ancestors.iter_from_top() {
            fields.extend(extract(self.ancestor, ancestor)?);
        }
        Ok(Row { fields })
    }

    /// Assembles and appends one row, or records it as skipped when the
    /// policy allows it.
    pub fn append(&self, table: &mut Table, leaf: &RawLine, ancestors: &HierarchyStack) -> Result<()> {
        match self.assemble(leaf, ancestors) {
            Ok(row) => table.rows.push(row),
            Err(KegError::Field {
                line_number,
                content,
                source,
            }) if self.policy == ErrorPolicy::SkipRow => {
                log::warn!("Skipping line {line_number}: {source}");
                table.diagnostics.push(Diagnostic {
                    line_number,
                    content,
                    message: source.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn extract(extractor: Extractor, line: &RawLine) -> Result<Vec<String>> {
    extractor(line.content()).map_err(|source| KegError::Field {
        line_number: line.line_number,
        content: line.text.clone(),
        source,
    })
}

/// Flattens htext lines (header first) into a table with one row per leaf.
pub fn build_table<I>(lines: I, options: &ConvertOptions) -> Result<Table>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lines = lines.into_iter();
    let header = lines.next().ok_or(KegError::EmptyInput)?;
    let mut parser = HierarchyParser::from_header(header.as_ref())?;
    let assembler = RowAssembler::new(parser.directive(), options.error_policy);

    let mut table = Table {
        headers: parser.directive().table_headers(),
        ..Table::default()
    };

    for (index, line) in lines.enumerate() {
        // the header is line 1
        if let Some(leaf) = parser.feed(index + 2, line.as_ref())? {
            assembler.append(&mut table, &leaf, parser.ancestors())?;
        }
    }

    log::info!(
        "Built table with {} rows ({} skipped)",
        table.rows.len(),
        table.diagnostics.len()
    );
    Ok(table)
}
