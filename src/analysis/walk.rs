//! Single-pass pre-order traversal with per-node failure isolation.

use tracing::{debug, warn};
use tree_sitter::Node;

use super::{LanguageExtractor, NodeKind, SourceUnit, TypeKind};
use crate::parser::ParsedFile;

/// A handler failure that was isolated during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub kind: NodeKind,
    /// Line of the failing node (1-indexed).
    pub line: usize,
    pub message: String,
}

/// Result of walking one file.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub unit: SourceUnit,
    /// Handler failures, in traversal order. Never part of the document.
    pub failures: Vec<NodeFailure>,
}

/// Visit every node of the tree once, in pre-order, and dispatch it to the
/// extractor.
///
/// A failing handler is logged and recorded; the walk continues with the
/// next node and keeps everything collected so far.
pub fn walk(parsed: &ParsedFile, extractor: &dyn LanguageExtractor) -> WalkOutcome {
    let mut unit = SourceUnit::default();
    let mut failures = Vec::new();
    let mut cursor = parsed.tree.walk();

    loop {
        let node = cursor.node();
        let kind = extractor.classify(node);
        if kind != NodeKind::Other {
            if let Err(error) = dispatch(extractor, kind, parsed, node, &mut unit) {
                let line = node.start_position().row + 1;
                let message = format!("{:#}", error);
                warn!(kind = kind.as_str(), line, error = %message, "node extraction failed, skipping");
                failures.push(NodeFailure { kind, line, message });
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                debug!(
                    grammar = %parsed.kind,
                    records = unit.record_count(),
                    failures = failures.len(),
                    "walk complete"
                );
                return WalkOutcome { unit, failures };
            }
        }
    }
}

fn dispatch(
    extractor: &dyn LanguageExtractor,
    kind: NodeKind,
    parsed: &ParsedFile,
    node: Node,
    unit: &mut SourceUnit,
) -> anyhow::Result<()> {
    match kind {
        NodeKind::Import => extractor.import(parsed, node, unit),
        NodeKind::Namespace => extractor.namespace(parsed, node, unit),
        NodeKind::Function => extractor.function(parsed, node, unit),
        NodeKind::FunctionExpression | NodeKind::ArrowFunction => {
            extractor.function_expression(parsed, node, unit)
        }
        NodeKind::Class => extractor.class(parsed, node, unit),
        NodeKind::Interface => extractor.type_declaration(parsed, node, TypeKind::Interface, unit),
        NodeKind::TypeAlias => extractor.type_declaration(parsed, node, TypeKind::Type, unit),
        NodeKind::Export => extractor.export(parsed, node, unit),
        NodeKind::Other => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Function;
    use crate::parser::{parse, FileKind};

    /// Records every function declaration, failing on the ones named
    /// `broken`.
    struct FlakyExtractor;

    impl LanguageExtractor for FlakyExtractor {
        fn file_kind(&self) -> FileKind {
            FileKind::TypeScript
        }

        fn classify(&self, node: Node) -> NodeKind {
            match node.kind() {
                "function_declaration" => NodeKind::Function,
                _ => NodeKind::Other,
            }
        }

        fn function(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
            let name_node = node
                .child_by_field_name("name")
                .ok_or_else(|| anyhow::anyhow!("function without name"))?;
            let name = parsed.node_text(name_node);
            if name == "broken" {
                anyhow::bail!("cannot extract {}", name);
            }
            unit.functions.push(Function {
                name: name.to_string(),
                source_text: parsed.node_text(node).to_string(),
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
            });
            Ok(())
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let source = "function first() {}\nfunction broken() {}\nfunction last() {}\n";
        let parsed = parse(source, FileKind::TypeScript).unwrap();
        let outcome = walk(&parsed, &FlakyExtractor);

        let names: Vec<&str> = outcome.unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["first", "last"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].kind, NodeKind::Function);
        assert_eq!(outcome.failures[0].line, 2);
        assert!(outcome.failures[0].message.contains("broken"));
    }

    #[test]
    fn test_visits_nested_nodes_in_preorder() {
        let source = "function outer() {\n  function inner() {}\n}\nfunction after() {}\n";
        let parsed = parse(source, FileKind::TypeScript).unwrap();
        let outcome = walk(&parsed, &FlakyExtractor);

        let names: Vec<&str> = outcome.unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner", "after"]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_empty_source_yields_empty_unit() {
        let parsed = parse("", FileKind::TypeScript).unwrap();
        let outcome = walk(&parsed, &FlakyExtractor);
        assert_eq!(outcome.unit, SourceUnit::default());
    }
}
