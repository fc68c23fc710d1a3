//! Whitespace-normalized rendering of expression nodes.
//!
//! Tokens are re-joined with a single space wherever the source had
//! whitespace between them. Literal nodes (strings, templates, heredocs,
//! regexes) are copied as one atom so their contents stay intact.
//! Comments are dropped.

use tree_sitter::Node;

/// Render an expression node as normalized single-line text.
pub fn pretty(node: Node, source: &str) -> String {
    let mut atoms = Vec::new();
    collect_atoms(node, &mut atoms);

    let mut out = String::new();
    let mut prev: Option<(Node, &str)> = None;
    for atom in atoms {
        let text = atom.utf8_text(source.as_bytes()).unwrap_or("");
        if let Some((prev_node, prev_text)) = prev {
            let separated = atom.start_byte() > prev_node.end_byte();
            if separated && !opens_group(prev_text) && !closes_group(text) {
                out.push(' ');
            }
        }
        out.push_str(text);
        prev = Some((atom, text));
    }
    out
}

fn collect_atoms<'a>(node: Node<'a>, atoms: &mut Vec<Node<'a>>) {
    if node.kind() == "comment" {
        return;
    }
    if node.child_count() == 0 || is_literal(node.kind()) {
        atoms.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_atoms(child, atoms);
    }
}

fn is_literal(kind: &str) -> bool {
    kind.contains("string")
        || kind.starts_with("template")
        || matches!(kind, "heredoc" | "nowdoc" | "regex" | "jsx_text")
}

fn opens_group(text: &str) -> bool {
    matches!(text, "(" | "[")
}

fn closes_group(text: &str) -> bool {
    matches!(text, ")" | "]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, FileKind};

    /// Render the initializer of the first variable declarator.
    fn render_ts(source: &str) -> String {
        let parsed = parse(source, FileKind::TypeScript).unwrap();
        let root = parsed.root();
        let decl = root.named_child(0).unwrap();
        let declarator = decl.named_child(0).unwrap();
        let value = declarator.child_by_field_name("value").unwrap();
        pretty(value, &parsed.source)
    }

    #[test]
    fn test_collapses_multiline_array() {
        assert_eq!(render_ts("const a = [\n  1,\n  2\n];"), "[1, 2]");
    }

    #[test]
    fn test_keeps_string_contents() {
        assert_eq!(render_ts("const a = 'two  spaces';"), "'two  spaces'");
        assert_eq!(render_ts("const a = `x  ${y}  z`;"), "`x  ${y}  z`");
    }

    #[test]
    fn test_keeps_adjacent_tokens_adjacent() {
        assert_eq!(render_ts("const a = foo(1,2);"), "foo(1,2)");
        assert_eq!(render_ts("const a = { b: 1 };"), "{ b: 1 }");
    }

    #[test]
    fn test_drops_comments() {
        assert_eq!(render_ts("const a = 1 /* one */ + 2;"), "1 + 2");
    }

    #[test]
    fn test_php_array() {
        let parsed = parse(
            "<?php\nclass A {\n  private $m = [\n    'a' => 1,\n  ];\n}\n",
            FileKind::Php,
        )
        .unwrap();
        let root = parsed.root();
        let mut stack = vec![root];
        let mut found = None;
        while let Some(node) = stack.pop() {
            if node.kind() == "array_creation_expression" {
                found = Some(node);
                break;
            }
            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }
        let array = found.expect("array literal in tree");
        assert_eq!(pretty(array, &parsed.source), "['a' => 1,]");
    }
}
