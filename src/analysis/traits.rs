//! Core traits for language extraction.

use tree_sitter::Node;

use super::{SourceUnit, TypeKind};
use crate::parser::{FileKind, ParsedFile};

/// Node kinds the traversal dispatches on.
///
/// Each front-end maps its grammar's node kinds onto this set. Anything
/// that maps to `Other` is skipped by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Import,
    Namespace,
    Function,
    FunctionExpression,
    ArrowFunction,
    Class,
    Interface,
    TypeAlias,
    Export,
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Import => "import",
            NodeKind::Namespace => "namespace",
            NodeKind::Function => "function",
            NodeKind::FunctionExpression => "function_expression",
            NodeKind::ArrowFunction => "arrow_function",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::TypeAlias => "type_alias",
            NodeKind::Export => "export",
            NodeKind::Other => "other",
        }
    }
}

/// Language-specific entity extractor.
///
/// The walk calls `classify` on every node and then the handler for the
/// returned kind. Handlers append finished records to the `SourceUnit`;
/// a handler that returns an error must not have appended anything for
/// that node. Kinds a language does not have keep the default no-op.
///
/// Implementations are stateless so one instance can serve every file.
pub trait LanguageExtractor: Send + Sync {
    /// Returns the grammar variant this extractor reads.
    fn file_kind(&self) -> FileKind;

    /// Map a tree-sitter node onto a dispatch kind.
    fn classify(&self, node: Node) -> NodeKind;

    fn import(&self, _parsed: &ParsedFile, _node: Node, _unit: &mut SourceUnit) -> anyhow::Result<()> {
        Ok(())
    }

    fn namespace(&self, _parsed: &ParsedFile, _node: Node, _unit: &mut SourceUnit) -> anyhow::Result<()> {
        Ok(())
    }

    fn function(&self, _parsed: &ParsedFile, _node: Node, _unit: &mut SourceUnit) -> anyhow::Result<()> {
        Ok(())
    }

    /// Function expressions and arrow functions. Only component detection
    /// uses these.
    fn function_expression(
        &self,
        _parsed: &ParsedFile,
        _node: Node,
        _unit: &mut SourceUnit,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn class(&self, _parsed: &ParsedFile, _node: Node, _unit: &mut SourceUnit) -> anyhow::Result<()> {
        Ok(())
    }

    fn type_declaration(
        &self,
        _parsed: &ParsedFile,
        _node: Node,
        _kind: TypeKind,
        _unit: &mut SourceUnit,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn export(&self, _parsed: &ParsedFile, _node: Node, _unit: &mut SourceUnit) -> anyhow::Result<()> {
        Ok(())
    }
}
