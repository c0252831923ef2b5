//src/enzymes.rs

use ahash::AHashMap;
use serde::Serialize;

use crate::error::{FieldError, KegError, Result};
use crate::fields::{
    find_ec_numbers, parse_description_line, parse_ec_line, parse_kegg_line, split_map_leaf,
};
use crate::hierarchy::HierarchyParser;
use crate::options::{ConvertOptions, ErrorPolicy};
use crate::types::{Diagnostic, EnzymeEntry, Gene, KeggOrtholog, RawLine};

/// Genes grouped under the EC number of their nearest ancestor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnzymeCatalog {
    pub entries: Vec<EnzymeEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl EnzymeCatalog {
    pub fn gene_count(&self) -> usize {
        self.entries.iter().map(|e| e.genes.len()).sum()
    }
}

/// Parses a `gene<TAB>ortholog` leaf, e.g.
/// `HSA:124 ADH1A; alcohol dehydrogenase 1A\tK13951 ADH1_7 [EC:1.1.1.1]`.
fn gene_from_leaf(content: &str) -> std::result::Result<Gene, FieldError> {
    let (entity, classification) = split_map_leaf(content)?;
    let gene = parse_description_line(entity)?;
    let ortholog = parse_kegg_line(classification)?;
    Ok(Gene {
        name: gene.name,
        alternative_names: gene.alternative_names,
        description: gene.description,
        ortholog: KeggOrtholog {
            ec_numbers: find_ec_numbers(&ortholog.accessor_items),
            name: ortholog.name,
            description: ortholog.description,
        },
    })
}

fn field_error(line: &RawLine, source: FieldError) -> KegError {
    KegError::Field {
        line_number: line.line_number,
        content: line.text.clone(),
        source,
    }
}

/// Groups every leaf under its nearest open ancestor, read as an EC line.
/// Entries keep first-seen order; an EC number met again extends its entry.
/// Leaves without any ancestor land in an entry with an empty EC number.
pub fn collect_enzyme_entries<I>(lines: I, options: &ConvertOptions) -> Result<EnzymeCatalog>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lines = lines.into_iter();
    let header = lines.next().ok_or(KegError::EmptyInput)?;
    let mut parser = HierarchyParser::from_header(header.as_ref())?;

    let mut catalog = EnzymeCatalog::default();
    let mut by_ec: AHashMap<String, usize> = AHashMap::new();

    for (index, text) in lines.enumerate() {
        let Some(leaf) = parser.feed(index + 2, text.as_ref())? else {
            continue;
        };

        let parsed = parser
            .ancestors()
            .iter_from_top()
            .next()
            .map_or(Ok((String::new(), String::new())), |enzyme| {
                parse_ec_line(enzyme.content())
                    .map(|ec| (ec.ec, ec.description))
                    .map_err(|e| field_error(enzyme, e))
            })
            .and_then(|ec| {
                gene_from_leaf(leaf.content())
                    .map(|gene| (ec, gene))
                    .map_err(|e| field_error(&leaf, e))
            });

        let ((ec, description), gene) = match parsed {
            Ok(parsed) => parsed,
            Err(KegError::Field {
                line_number,
                content,
                source,
            }) if options.error_policy == ErrorPolicy::SkipRow => {
                log::warn!("Skipping gene on line {}: {source}", leaf.line_number);
                catalog.diagnostics.push(Diagnostic {
                    line_number,
                    content,
                    message: source.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let slot = *by_ec.entry(ec.clone()).or_insert_with(|| {
            catalog.entries.push(EnzymeEntry {
                ec,
                description,
                genes: Vec::new(),
            });
            catalog.entries.len() - 1
        });
        catalog.entries[slot].genes.push(gene);
    }

    log::info!(
        "Grouped {} genes under {} enzymes",
        catalog.gene_count(),
        catalog.entries.len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENZYMES: &str = "+E Gene KO
A<b>1. Oxidoreductases</b>
B  1.1  Acting on the CH-OH group of donors
C    1.1.1  With NAD+ or NADP+ as acceptor
D      1.1.1.1  alcohol dehydrogenase
E        HSA:124 ADH1A; alcohol dehydrogenase 1A\tK13951 ADH1_7; alcohol dehydrogenase 1/7 [EC:1.1.1.1]
E        HSA:125 alcohol dehydrogenase 1B\tK13951 ADH1_7; alcohol dehydrogenase 1/7 [EC:1.1.1.1 1.1.1.-]
D      1.1.1.2  alcohol dehydrogenase (NADP+)
E        HSA:10327 AKR1A1; aldo-keto reductase\tK00002 AKR1A1; alcohol dehydrogenase (NADP+) [EC:1.1.1.2]
D      1.1.1.1  alcohol dehydrogenase
E        MMU:11522 Adh1; alcohol dehydrogenase 1\tK13951 ADH1_7; alcohol dehydrogenase 1/7 [EC:1.1.1.1]
";

    #[test]
    fn groups_genes_by_enzyme() {
        let catalog = collect_enzyme_entries(ENZYMES.lines(), &ConvertOptions::default()).unwrap();
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.gene_count(), 4);

        let adh = &catalog.entries[0];
        assert_eq!(adh.ec, "1.1.1.1");
        assert_eq!(adh.description, "alcohol dehydrogenase");
        let names: Vec<&str> = adh.genes.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["HSA:124", "HSA:125", "MMU:11522"]);

        let first = &adh.genes[0];
        assert_eq!(first.alternative_names, "ADH1A");
        assert_eq!(first.description, "alcohol dehydrogenase 1A");
        assert_eq!(first.ortholog.name, "K13951");
        assert_eq!(first.ortholog.description, "ADH1_7; alcohol dehydrogenase 1/7");
        assert_eq!(first.ortholog.ec_numbers, vec!["1.1.1.1"]);
        assert_eq!(adh.genes[1].ortholog.ec_numbers, vec!["1.1.1.1", "1.1.1.-"]);

        assert_eq!(catalog.entries[1].ec, "1.1.1.2");
    }

    #[test]
    fn leaves_without_ancestor_share_an_anonymous_entry() {
        let input = "+A Gene KO\nA 1 gene\tK1 thing [EC:1.2.3.4]\nA 2 gene\tK2 other [EC:1.2.3.5]\n";
        let catalog = collect_enzyme_entries(input.lines(), &ConvertOptions::default()).unwrap();
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(catalog.entries[0].ec, "");
        assert_eq!(catalog.entries[0].genes.len(), 2);
    }

    #[test]
    fn malformed_gene_respects_policy() {
        let input = "+B Gene KO\nA 1.1.1.1 adh\nB no tab here\nB 1 gene\tK1 x [EC:1.1.1.1]\n";
        assert!(matches!(
            collect_enzyme_entries(input.lines(), &ConvertOptions::default()),
            Err(KegError::Field { line_number: 3, .. })
        ));

        let options = ConvertOptions::new().with_error_policy(ErrorPolicy::SkipRow);
        let catalog = collect_enzyme_entries(input.lines(), &options).unwrap();
        assert_eq!(catalog.gene_count(), 1);
        assert_eq!(catalog.diagnostics.len(), 1);
        assert_eq!(catalog.diagnostics[0].line_number, 3);
    }

    #[test]
    fn extra_tab_in_gene_is_rejected_like_table_rows() {
        let input = "+B Gene KO\nA 1.1.1.1 adh\nB a\tK1 x [EC:1.1.1.1]\tc\nB 1 gene\tK1 x [EC:1.1.1.1]\n";
        match collect_enzyme_entries(input.lines(), &ConvertOptions::default()) {
            Err(KegError::Field {
                line_number,
                source,
                ..
            }) => {
                assert_eq!(line_number, 3);
                assert_eq!(source, FieldError::MissingTabSeparator);
            }
            other => panic!("expected a field error, got {other:?}"),
        }

        let options = ConvertOptions::new().with_error_policy(ErrorPolicy::SkipRow);
        let catalog = collect_enzyme_entries(input.lines(), &options).unwrap();
        let table = crate::hierarchy::build_table(input.lines(), &options).unwrap();
        assert_eq!(catalog.gene_count(), table.rows.len());
        assert_eq!(catalog.diagnostics, table.diagnostics);
        assert_eq!(catalog.entries[0].genes[0].ortholog.ec_numbers, vec!["1.1.1.1"]);
    }
}
