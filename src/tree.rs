//src/tree.rs

use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::hierarchy::classify_line;

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const XML_ROOT: &str = "KEGG";

/// One htext line and everything nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KegNode {
    pub level: char,
    pub depth: usize,
    pub content: String,
    pub children: Vec<KegNode>,
}

/// The nested form of an htext file. Unlike the table, every data line is
/// kept, so no header directive is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KegTree {
    pub roots: Vec<KegNode>,
}

impl KegTree {
    /// Same close-before-push rule as the table pass: a line closes every open
    /// node at its own depth or deeper, then becomes the innermost open node.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut tree = KegTree::default();
        let mut open: Vec<KegNode> = Vec::new();

        for (index, text) in lines.into_iter().enumerate() {
            let Some(line) = classify_line(index + 1, text.as_ref()) else {
                continue;
            };
            while open.last().is_some_and(|top| top.depth >= line.depth) {
                tree.close(&mut open);
            }
            open.push(KegNode {
                level: line.text.chars().next().unwrap_or('A'),
                depth: line.depth,
                content: line.content().to_string(),
                children: Vec::new(),
            });
        }
        while !open.is_empty() {
            tree.close(&mut open);
        }
        tree
    }

    /// Moves the innermost open node under its parent, or to the roots.
    fn close(&mut self, open: &mut Vec<KegNode>) {
        if let Some(node) = open.pop() {
            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
    }

    pub fn node_count(&self) -> usize {
        fn count(node: &KegNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Each node becomes `<LETTER>`, its escaped content and `</LETTER>`,
    /// one per line, inside a `<KEGG>` root element.
    pub fn to_xml(&self) -> String {
        let mut output = String::new();
        output.push_str(XML_PROLOG);
        output.push('\n');
        let _ = writeln!(output, "<{XML_ROOT}>");
        for node in &self.roots {
            write_node(&mut output, node);
        }
        let _ = writeln!(output, "</{XML_ROOT}>");
        output
    }
}

fn write_node(output: &mut String, node: &KegNode) {
    let _ = writeln!(output, "<{}>", node.level);
    let _ = writeln!(output, "{}", html_escape::encode_text(&node.content));
    for child in &node.children {
        write_node(output, child);
    }
    let _ = writeln!(output, "</{}>", node.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "+C\tKO
#comment
A root & co
B <branch>
C leaf
B second
A other
";

    #[test]
    fn nests_by_depth_letter() {
        let tree = KegTree::from_lines(INPUT.lines());
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.node_count(), 5);

        let root = &tree.roots[0];
        assert_eq!(root.content, "root & co");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].content, "<branch>");
        assert_eq!(root.children[0].children[0].content, "leaf");
        assert_eq!(root.children[1].content, "second");
        assert!(root.children[1].children.is_empty());
        assert_eq!(tree.roots[1].level, 'A');
    }

    #[test]
    fn skipped_levels_still_nest() {
        let tree = KegTree::from_lines(["A root", "C deep", "B mid"]);
        assert_eq!(tree.roots[0].children.len(), 2);
        assert_eq!(tree.roots[0].children[0].depth, 2);
        assert_eq!(tree.roots[0].children[1].depth, 1);
    }

    #[test]
    fn renders_escaped_xml() {
        let tree = KegTree::from_lines(INPUT.lines());
        let xml = tree.to_xml();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<KEGG>
<A>
root &amp; co
<B>
&lt;branch&gt;
<C>
leaf
</C>
</B>
<B>
second
</B>
</A>
<A>
other
</A>
</KEGG>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let tree = KegTree::from_lines(Vec::<String>::new());
        assert_eq!(tree.to_xml(), "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<KEGG>\n</KEGG>\n");
    }
}
