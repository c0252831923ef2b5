//src/fields.rs

//! Per-line micro-grammars found in KEGG htext payloads.
//!
//! Every parser here is a pure function of one line's content. Positions are
//! byte offsets produced by `str::find`/`str::rfind`, so slicing always lands
//! on char boundaries.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldError;

/// Four dot-separated digit groups, any of which may be a `-` placeholder,
/// e.g. `2.1.1.63` or `1.14.-.-`.
static EC_SEARCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\d+|-)\.(?:\d+|-)\.(?:\d+|-)\.(?:\d+|-)").expect("valid EC pattern")
});

// -----------------------
// substring combinators
// -----------------------

/// Span strictly between the FIRST `open` and the first `close` that follows it.
pub fn span_between(s: &str, open: &str, close: &str) -> Option<Range<usize>> {
    let start = s.find(open)? + open.len();
    let end = start + s[start..].find(close)?;
    Some(start..end)
}

/// Span strictly between the LAST `open` and the LAST `close`.
/// `None` unless the last `close` comes after the last `open`.
pub fn rspan_between(s: &str, open: char, close: char) -> Option<Range<usize>> {
    let start = s.rfind(open)? + open.len_utf8();
    let end = s.rfind(close)?;
    if end < start {
        return None;
    }
    Some(start..end)
}

/// Drops one leading and two trailing characters, yielding "" when fewer than
/// four characters remain. Applied to the text between a KEGG id and its
/// accessor list: the leading separator and the trailing ` [` go.
fn trim_accessor_boundary(segment: &str) -> &str {
    let start = segment.chars().next().map_or(0, char::len_utf8);
    let end = segment
        .char_indices()
        .rev()
        .take(2)
        .last()
        .map_or(segment.len(), |(i, _)| i);
    if start >= end {
        ""
    } else {
        &segment[start..end]
    }
}

// -----------------------
// line grammars
// -----------------------

/// `64144 Mllt1, AA407901, ENL; myeloid/lymphoid ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionLine {
    pub name: String,
    pub alternative_names: String,
    pub description: String,
}

impl DescriptionLine {
    pub fn into_fields(self) -> [String; 3] {
        [self.name, self.alternative_names, self.description]
    }
}

/// `K00567 methyltransferase [EC:2.1.1.63]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeggLine {
    pub name: String,
    pub description: String,
    pub accessor_key: String,
    pub accessor_items: String,
}

impl KeggLine {
    pub fn into_fields(self) -> [String; 4] {
        [
            self.name,
            self.description,
            self.accessor_key,
            self.accessor_items,
        ]
    }
}

/// `1.1.1.1  alcohol dehydrogenase`, possibly wrapped in one markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcLine {
    pub ec: String,
    pub description: String,
}

impl EcLine {
    pub fn into_fields(self) -> [String; 2] {
        [self.ec, self.description]
    }
}

/// Splits a map-mode leaf into `(entity, classification)`. Exactly one tab
/// is allowed; none or several give [`FieldError::MissingTabSeparator`].
pub fn split_map_leaf(content: &str) -> Result<(&str, &str), FieldError> {
    match content.split_once('\t') {
        Some((entity, classification)) if !classification.contains('\t') => {
            Ok((entity, classification))
        }
        _ => Err(FieldError::MissingTabSeparator),
    }
}

/// First token is an id, the rest of the line is its description.
pub fn parse_id_line(content: &str) -> Result<(String, String), FieldError> {
    let mut tokens = content.split_whitespace();
    let id = tokens.next().ok_or(FieldError::EmptyContent)?;
    Ok((id.to_string(), tokens.collect::<Vec<_>>().join(" ")))
}

/// Id, then an optional comma separated list of alternative names closed by a
/// semicolon, then a free-text description.
///
/// The list only counts when it is closed: `17355 AF4/FMR2 family, member 1`
/// has no alternative names and the description starts right after the id.
pub fn parse_description_line(content: &str) -> Result<DescriptionLine, FieldError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let name = tokens.first().ok_or(FieldError::EmptyContent)?;

    let mut alternatives = Vec::new();
    let mut list_end = 1;
    for token in &tokens[1..] {
        if let Some(alt) = token.strip_suffix(',') {
            alternatives.push(alt);
        } else if let Some(alt) = token.strip_suffix(';') {
            alternatives.push(alt);
            list_end += alternatives.len();
            break;
        } else {
            break;
        }
    }
    if list_end == 1 {
        alternatives.clear();
    }

    Ok(DescriptionLine {
        name: name.to_string(),
        alternative_names: alternatives.join(" "),
        description: tokens[list_end..].join(" "),
    })
}

/// Id, description and a trailing `[KEY: items]` clause.
///
/// The clause is located by the rightmost `[` and `]`, so brackets inside the
/// description (`methylated-DNA-[protein]-cysteine`) are left alone. Without a
/// `:` the key is empty and the whole clause becomes the items.
pub fn parse_kegg_line(content: &str) -> Result<KeggLine, FieldError> {
    let name = content
        .split_whitespace()
        .next()
        .ok_or(FieldError::EmptyContent)?;
    let list = rspan_between(content, '[', ']').ok_or(FieldError::MissingAccessorClause)?;
    let list_content = &content[list.clone()];

    let (accessor_key, accessor_items) = match list_content.split_once(':') {
        Some((key, items)) => (key, items),
        None => ("", list_content),
    };

    let name_end = content.len() - content.trim_start().len() + name.len();
    let description = if name_end < list.start {
        trim_accessor_boundary(&content[name_end..list.start])
    } else {
        ""
    };

    Ok(KeggLine {
        name: name.to_string(),
        description: description.to_string(),
        accessor_key: accessor_key.to_string(),
        accessor_items: accessor_items.to_string(),
    })
}

/// Returns the inside of the outermost element when `content` carries both
/// `<` and `>`; otherwise `content` unchanged.
pub fn strip_tags(content: &str) -> Result<&str, FieldError> {
    if !(content.contains('<') && content.contains('>')) {
        return Ok(content);
    }
    let tag = span_between(content, "<", ">")
        .map(|span| &content[span])
        .ok_or_else(|| FieldError::MissingMarkupTag(String::new()))?;
    // attributes only appear on the opening tag
    let tag_name = tag.split_whitespace().next().unwrap_or(tag);

    let open = format!("<{tag}>");
    let close = format!("</{tag_name}>");
    span_between(content, &open, &close)
        .map(|span| &content[span])
        .ok_or_else(|| FieldError::MissingMarkupTag(tag_name.to_string()))
}

/// EC number followed by its description.
pub fn parse_ec_line(content: &str) -> Result<EcLine, FieldError> {
    let (ec, description) = parse_id_line(strip_tags(content)?)?;
    Ok(EcLine { ec, description })
}

/// All EC numbers (placeholders allowed) in order of appearance.
pub fn find_ec_numbers(text: &str) -> Vec<String> {
    EC_SEARCH
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
