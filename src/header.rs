//src/header.rs

use crate::error::{KegError, Result};

/// Leaf columns used when a two-column header switches on map mode.
pub const MAP_HEADER: [&str; 7] = [
    "Gene name",
    "Common names",
    "Gene description",
    "KO number",
    "KO description",
    "Map",
    "KO mapping",
];

/// Ancestor columns of the four-level enzyme classification (leaf at `E`).
pub const ENZYME_HEADER: [&str; 8] = [
    "4EC",
    "4EC description",
    "3EC",
    "3EC description",
    "2EC",
    "2EC description",
    "Enzyme type",
    "Enzyme type description",
];

/// Depth at which [`ENZYME_HEADER`] lines up with the ancestor chain.
const ENZYME_LEAF_DEPTH: usize = 4;

/// htext stores the hierarchy level as a capital letter, starting at `A`.
/// Returns `None` for anything that is not `A`..=`Z`.
pub fn depth_of_letter(letter: char) -> Option<usize> {
    if letter.is_ascii_uppercase() {
        Some(letter as usize - 'A' as usize)
    } else {
        None
    }
}

/// Depth of a data line, taken from its first character.
pub fn depth_of(line: &str) -> Option<usize> {
    line.chars().next().and_then(depth_of_letter)
}

/// Inverse of [`depth_of_letter`]. Depths past `Z` have no letter.
pub fn level_char(depth: usize) -> Option<char> {
    u8::try_from(depth)
        .ok()
        .filter(|d| *d < 26)
        .map(|d| (b'A' + d) as char)
}

/// What line 1 (`+<Letter> <col1> <col2> ...`) declares about the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDirective {
    pub leaf_depth: usize,
    pub columns: Vec<String>,
    pub is_map_mode: bool,
    pub is_enzyme_mode: bool,
}

impl HeaderDirective {
    /// Parses the directive line. Anything without the `+` prefix, a single
    /// depth letter and at least one column is rejected.
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = |reason: &'static str| KegError::MalformedHeader {
            content: line.to_string(),
            reason,
        };

        let body = line
            .trim_end()
            .strip_prefix('+')
            .ok_or_else(|| malformed("missing '+' prefix"))?;
        let mut tokens = body.split_whitespace();

        let level = tokens
            .next()
            .ok_or_else(|| malformed("missing leaf level letter"))?;
        let mut letters = level.chars();
        let leaf_depth = match (letters.next(), letters.next()) {
            (Some(letter), None) => depth_of_letter(letter),
            _ => None,
        }
        .ok_or_else(|| malformed("leaf level must be a single letter A-Z"))?;

        let columns: Vec<String> = tokens.map(str::to_string).collect();
        if columns.is_empty() {
            return Err(malformed("no data columns declared"));
        }

        let is_enzyme_mode = columns.get(1).is_some_and(|c| c == "Enzyme");
        let is_map_mode = columns.len() == 2 && !is_enzyme_mode;

        log::info!(
            "Header declares leaf level {} with columns {:?} (map mode: {}, enzyme mode: {})",
            level,
            columns,
            is_map_mode,
            is_enzyme_mode
        );

        Ok(Self {
            leaf_depth,
            columns,
            is_map_mode,
            is_enzyme_mode,
        })
    }

    /// Column names for the flattened table: leaf columns, then one column
    /// (two under enzyme mode) per ancestor level, nearest level first.
    pub fn table_headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = if self.is_map_mode {
            MAP_HEADER.iter().map(|c| c.to_string()).collect()
        } else {
            self.columns.clone()
        };

        if self.is_enzyme_mode && self.leaf_depth == ENZYME_LEAF_DEPTH {
            headers.extend(ENZYME_HEADER.iter().map(|c| c.to_string()));
            return headers;
        }

        for depth in (0..self.leaf_depth).rev() {
            let letter = level_char(depth).unwrap_or('?');
            if self.is_enzyme_mode {
                headers.push(format!("{letter} EC"));
                headers.push(format!("{letter} description"));
            } else {
                headers.push(letter.to_string());
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_depths() {
        assert_eq!(depth_of_letter('A'), Some(0));
        assert_eq!(depth_of_letter('D'), Some(3));
        assert_eq!(depth_of_letter('Z'), Some(25));
        assert_eq!(depth_of_letter('a'), None);
        assert_eq!(depth_of_letter('+'), None);
        assert_eq!(depth_of("C    00010 Glycolysis"), Some(2));
        assert_eq!(depth_of(""), None);
        assert_eq!(level_char(2), Some('C'));
        assert_eq!(level_char(26), None);
    }

    #[test]
    fn single_column_header() {
        let header = HeaderDirective::parse("+D\tKO\n").unwrap();
        assert_eq!(header.leaf_depth, 3);
        assert_eq!(header.columns, vec!["KO"]);
        assert!(!header.is_map_mode);
        assert!(!header.is_enzyme_mode);
        assert_eq!(header.table_headers(), vec!["KO", "C", "B", "A"]);
    }

    #[test]
    fn map_mode_header() {
        let header = HeaderDirective::parse("+D Gene KO").unwrap();
        assert!(header.is_map_mode);
        assert!(!header.is_enzyme_mode);
        let headers = header.table_headers();
        assert_eq!(&headers[..7], &MAP_HEADER.map(String::from)[..]);
        assert_eq!(&headers[7..], &["C", "B", "A"]);
    }

    #[test]
    fn enzyme_mode_header() {
        let header = HeaderDirective::parse("+E Gene Enzyme").unwrap();
        assert!(header.is_enzyme_mode);
        assert!(!header.is_map_mode);
        let headers = header.table_headers();
        assert_eq!(&headers[..2], &["Gene", "Enzyme"]);
        assert_eq!(&headers[2..], &ENZYME_HEADER.map(String::from)[..]);
    }

    #[test]
    fn enzyme_mode_at_other_depth_synthesizes_columns() {
        let header = HeaderDirective::parse("+C Gene Enzyme").unwrap();
        assert_eq!(
            header.table_headers(),
            vec!["Gene", "Enzyme", "B EC", "B description", "A EC", "A description"]
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        for line in ["D KO", "+", "+DD KO", "+d KO", "+D", ""] {
            assert!(
                matches!(
                    HeaderDirective::parse(line),
                    Err(KegError::MalformedHeader { .. })
                ),
                "accepted {line:?}"
            );
        }
    }
}
