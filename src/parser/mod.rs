//! Parser adapter over tree-sitter.
//!
//! This module provides:
//! - `FileKind`: grammar selection from a file extension
//! - `parse`: source text to `ParsedFile`, or a structured `ParseFailure`
//! - The early-error check that rejects `const` declarations without an
//!   initializer, which the tree-sitter grammar accepts
//!
//! A failed first parse whose diagnostic is recoverable is repaired once
//! with [`repair::declare_uninitialized`] and parsed again. There is no
//! second repair.

pub mod repair;

use std::fmt;
use std::path::Path;

use phf::phf_set;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser as TsParser, Tree};

/// Extensions handled by the PHP grammar.
static PHP_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "php", "php3", "php4", "php5", "php7", "php8", "phtml", "inc",
};

/// Longest token snippet quoted in a syntax diagnostic.
const SNIPPET_LIMIT: usize = 32;

/// Grammar variant selected for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Php,
    /// TypeScript without markup.
    TypeScript,
    /// TypeScript with JSX markup; the only UI-bearing kind.
    Tsx,
}

impl FileKind {
    /// Select the grammar for a path. Unknown extensions use the base
    /// TypeScript grammar.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    /// Select the grammar for an extension given without the dot.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if PHP_EXTENSIONS.contains(ext.as_str()) {
            FileKind::Php
        } else if ext == "tsx" {
            FileKind::Tsx
        } else {
            FileKind::TypeScript
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Php => "php",
            FileKind::TypeScript => "typescript",
            FileKind::Tsx => "tsx",
        }
    }

    /// Whether markup syntax (and component detection) is enabled.
    pub fn is_ui_bearing(&self) -> bool {
        matches!(self, FileKind::Tsx)
    }

    pub fn language(&self) -> Language {
        match self {
            FileKind::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            FileKind::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            FileKind::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A successfully parsed source file.
///
/// `source` is the text the tree was built from. After a repair it is the
/// rewritten text, not the file contents.
pub struct ParsedFile {
    pub tree: Tree,
    pub source: String,
    pub kind: FileKind,
    /// True when the tree comes from the repaired source.
    pub repaired: bool,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Category of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// ERROR or MISSING node in the tree.
    Syntax,
    /// `const` declarator without an initializer.
    MissingInitializer,
}

/// Why a parse was rejected, with a 1-indexed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    fn at(kind: DiagnosticKind, message: impl Into<String>, node: Node) -> Self {
        let pos = node.start_position();
        Self {
            kind,
            message: message.into(),
            line: pos.row + 1,
            column: pos.column + 1,
        }
    }

    /// Whether the repair pass knows how to fix this diagnostic.
    pub fn is_recoverable(&self) -> bool {
        self.kind == DiagnosticKind::MissingInitializer
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.line, self.column)
    }
}

/// Unrecoverable parse failure.
///
/// When `repair_attempted` is set, `diagnostic` describes the repaired
/// source, not the original.
#[derive(Debug, Clone, Error)]
#[error("{diagnostic}")]
pub struct ParseFailure {
    pub diagnostic: Diagnostic,
    pub repair_attempted: bool,
}

/// Parse source text with the grammar for `kind`.
///
/// Applies at most one repair-and-retry cycle.
pub fn parse(source: &str, kind: FileKind) -> Result<ParsedFile, ParseFailure> {
    let diagnostic = match parse_once(source, kind) {
        Ok(tree) => {
            return Ok(ParsedFile {
                tree,
                source: source.to_string(),
                kind,
                repaired: false,
            })
        }
        Err(diagnostic) => diagnostic,
    };

    if !diagnostic.is_recoverable() {
        return Err(ParseFailure {
            diagnostic,
            repair_attempted: false,
        });
    }

    let Some(repaired) = repair::declare_uninitialized(source) else {
        return Err(ParseFailure {
            diagnostic,
            repair_attempted: false,
        });
    };

    tracing::info!(
        line = diagnostic.line,
        reason = %diagnostic.message,
        "rewrote uninitialized const declarations, reparsing"
    );

    match parse_once(&repaired, kind) {
        Ok(tree) => Ok(ParsedFile {
            tree,
            source: repaired,
            kind,
            repaired: true,
        }),
        Err(secondary) => Err(ParseFailure {
            diagnostic: secondary,
            repair_attempted: true,
        }),
    }
}

/// One parse attempt: tree-sitter parse plus the early-error checks.
fn parse_once(source: &str, kind: FileKind) -> Result<Tree, Diagnostic> {
    let mut parser = TsParser::new();
    parser.set_language(&kind.language()).map_err(|e| Diagnostic {
        kind: DiagnosticKind::Syntax,
        message: format!("grammar unavailable for {}: {}", kind, e),
        line: 1,
        column: 1,
    })?;

    let tree = parser.parse(source, None).ok_or_else(|| Diagnostic {
        kind: DiagnosticKind::Syntax,
        message: format!("failed to parse {} source", kind),
        line: 1,
        column: 1,
    })?;

    let root = tree.root_node();
    if let Some(diagnostic) = first_syntax_error(root, source) {
        return Err(diagnostic);
    }
    if kind != FileKind::Php {
        if let Some(diagnostic) = first_uninitialized_const(root) {
            return Err(diagnostic);
        }
    }

    Ok(tree)
}

/// Find the first ERROR or MISSING node in document order.
fn first_syntax_error(root: Node, source: &str) -> Option<Diagnostic> {
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return Some(Diagnostic::at(
                DiagnosticKind::Syntax,
                format!("Missing `{}`", node.kind()),
                node,
            ));
        }
        if node.is_error() {
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            return Some(Diagnostic::at(
                DiagnosticKind::Syntax,
                format!("Unexpected token `{}`", snippet(text)),
                node,
            ));
        }

        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Some(Diagnostic::at(DiagnosticKind::Syntax, "Syntax error", root));
            }
        }
    }
}

/// Find the first `const` declarator without an initializer outside an
/// ambient (`declare`) context.
fn first_uninitialized_const(root: Node) -> Option<Diagnostic> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "lexical_declaration" && is_const(node) && !is_ambient(node) {
            let mut decl_cursor = node.walk();
            let missing = node
                .named_children(&mut decl_cursor)
                .filter(|d| d.kind() == "variable_declarator")
                .find(|d| d.child_by_field_name("value").is_none());
            if let Some(declarator) = missing {
                return Some(Diagnostic::at(
                    DiagnosticKind::MissingInitializer,
                    "Missing initializer in const declaration",
                    declarator,
                ));
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
                return None;
            }
        }
    }
}

fn is_const(declaration: Node) -> bool {
    declaration.child(0).map(|k| k.kind() == "const").unwrap_or(false)
}

fn is_ambient(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "ambient_declaration" {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn snippet(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > SNIPPET_LIMIT {
        let cut: String = first_line.chars().take(SNIPPET_LIMIT).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_extension("php"), FileKind::Php);
        assert_eq!(FileKind::from_extension("PHTML"), FileKind::Php);
        assert_eq!(FileKind::from_extension("tsx"), FileKind::Tsx);
        assert_eq!(FileKind::from_extension("ts"), FileKind::TypeScript);
        assert_eq!(FileKind::from_extension("jsx"), FileKind::TypeScript);
        assert_eq!(FileKind::from_extension(""), FileKind::TypeScript);
        assert_eq!(
            FileKind::from_path(Path::new("src/App.tsx")),
            FileKind::Tsx
        );
        assert!(FileKind::Tsx.is_ui_bearing());
        assert!(!FileKind::TypeScript.is_ui_bearing());
    }

    #[test]
    fn test_parse_valid_typescript() {
        let parsed = parse("export const answer = 42;\n", FileKind::TypeScript).unwrap();
        assert!(!parsed.repaired);
        assert_eq!(parsed.root().kind(), "program");
    }

    #[test]
    fn test_parse_valid_php() {
        let parsed = parse("<?php\nfunction hello() { return 1; }\n", FileKind::Php).unwrap();
        assert!(!parsed.repaired);
        assert!(!parsed.root().has_error());
    }

    #[test]
    fn test_uninitialized_const_is_repaired() {
        let source = "import a from 'a';\nconst x;\nfunction f() { return 1; }\n";
        let parsed = parse(source, FileKind::TypeScript).unwrap();
        assert!(parsed.repaired);
        assert!(parsed.source.contains("let x;"));
        // Line count must survive the rewrite.
        assert_eq!(parsed.source.lines().count(), source.lines().count());
    }

    #[test]
    fn test_ambient_const_is_not_an_error() {
        let parsed = parse("declare const VERSION: string;\n", FileKind::TypeScript).unwrap();
        assert!(!parsed.repaired);
    }

    #[test]
    fn test_syntax_error_is_not_repaired() {
        let failure = match parse("function (\n", FileKind::TypeScript) {
            Err(f) => f,
            Ok(_) => panic!("expected a parse failure"),
        };
        assert_eq!(failure.diagnostic.kind, DiagnosticKind::Syntax);
        assert!(!failure.repair_attempted);
    }

    #[test]
    fn test_failed_retry_reports_secondary_diagnostic() {
        let source = "const x;\nconst a = 1, b;\n";
        let failure = match parse(source, FileKind::TypeScript) {
            Err(f) => f,
            Ok(_) => panic!("expected a parse failure"),
        };
        assert!(failure.repair_attempted);
        assert_eq!(failure.diagnostic.kind, DiagnosticKind::MissingInitializer);
        assert_eq!(failure.diagnostic.line, 2);
    }

    #[test]
    fn test_unrepairable_pattern_keeps_original_diagnostic() {
        let failure = match parse("const a = 1, b;\n", FileKind::TypeScript) {
            Err(f) => f,
            Ok(_) => panic!("expected a parse failure"),
        };
        assert!(!failure.repair_attempted);
        assert_eq!(failure.diagnostic.line, 1);
        assert!(failure.to_string().contains("Missing initializer"));
    }

    #[test]
    fn test_php_syntax_error() {
        let failure = match parse("<?php\nclass {\n", FileKind::Php) {
            Err(f) => f,
            Ok(_) => panic!("expected a parse failure"),
        };
        assert_eq!(failure.diagnostic.kind, DiagnosticKind::Syntax);
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(100);
        assert_eq!(snippet(&long).len(), SNIPPET_LIMIT + 3);
        assert_eq!(snippet("a\nb"), "a");
    }
}
