//! Records extracted from a source file.
//!
//! Field order in each struct is the key order of the emitted JSON.
//! Optional values serialize as `null` and lists always serialize, even
//! when empty.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-indexed start and end line of a node.
pub fn line_range(node: tree_sitter::Node) -> (usize, usize) {
    (node.start_position().row + 1, node.end_position().row + 1)
}

/// Declared qualifier on a class member.
///
/// Variant order is the order modifiers appear in a modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    /// Fixed check order.
    pub const ORDER: [Modifier; 6] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Static,
        Modifier::Final,
        Modifier::Abstract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Modifier booleans read off a member node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierFlags {
    pub public: bool,
    pub protected: bool,
    pub private: bool,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

impl ModifierFlags {
    pub fn is_set(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Public => self.public,
            Modifier::Protected => self.protected,
            Modifier::Private => self.private,
            Modifier::Static => self.is_static,
            Modifier::Final => self.is_final,
            Modifier::Abstract => self.is_abstract,
        }
    }

    /// Build the ordered modifier set: each set flag once, in check order.
    pub fn to_modifiers(self) -> Vec<Modifier> {
        Modifier::ORDER
            .into_iter()
            .filter(|m| self.is_set(*m))
            .collect()
    }
}

/// Kind of class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Constructor,
    Get,
    Set,
}

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    Type,
}

/// Kind of declaration wrapped by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Function,
    Class,
    Variable,
    Interface,
    Type,
    Enum,
    Namespace,
    Expression,
}

/// A named function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// A method declared directly in a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub kind: MethodKind,
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// One declared variable of a property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub declared_type: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub default_value_expression: Option<String>,
}

/// A class with its direct-body members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntity {
    /// `None` for anonymous classes.
    pub name: Option<String>,
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
}

/// An interface or type alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// An exported symbol.
///
/// Bare re-exported specifiers carry only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    pub name: Option<String>,
    pub declaration_kind: Option<DeclarationKind>,
    pub source_text: Option<String>,
}

/// A markup attribute used inside a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prop {
    pub name: String,
    pub value_expression: Option<String>,
}

/// A function or class classified as a UI component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: Option<String>,
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub props: Vec<Prop>,
}

/// Everything extracted from one file.
///
/// Created empty by the traversal, filled during the single pass and
/// serialized once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub namespace: Option<String>,
    pub dependencies: Vec<String>,
    pub functions: Vec<Function>,
    pub classes: Vec<ClassEntity>,
    pub types: Vec<TypeDeclaration>,
    pub exports: Vec<Export>,
    pub components: Vec<Component>,
}

impl SourceUnit {
    /// Find a class by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    /// Find a component by name.
    pub fn find_component(&self, name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    /// Total number of top-level records, for logging.
    pub fn record_count(&self) -> usize {
        self.dependencies.len()
            + self.functions.len()
            + self.classes.len()
            + self.types.len()
            + self.exports.len()
            + self.components.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_order_is_fixed() {
        let flags = ModifierFlags {
            is_abstract: true,
            is_static: true,
            public: true,
            ..Default::default()
        };
        assert_eq!(
            flags.to_modifiers(),
            vec![Modifier::Public, Modifier::Static, Modifier::Abstract]
        );
        assert!(ModifierFlags::default().to_modifiers().is_empty());
    }

    #[test]
    fn test_modifier_serializes_lowercase() {
        let json = serde_json::to_string(&vec![Modifier::Private, Modifier::Final]).unwrap();
        assert_eq!(json, r#"["private","final"]"#);
    }

    #[test]
    fn test_empty_unit_keeps_every_key() {
        let json = serde_json::to_value(SourceUnit::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 7);
        assert!(json["namespace"].is_null());
        assert_eq!(json["components"], serde_json::json!([]));
    }

    #[test]
    fn test_property_uses_camel_case_and_nulls() {
        let property = Property {
            name: "count".to_string(),
            declared_type: None,
            modifiers: vec![Modifier::Private],
            default_value_expression: Some("0".to_string()),
        };
        let json = serde_json::to_value(&property).unwrap();
        assert!(json["declaredType"].is_null());
        assert_eq!(json["defaultValueExpression"], "0");
    }

    #[test]
    fn test_record_count() {
        let mut unit = SourceUnit::default();
        unit.dependencies.push("a".to_string());
        unit.dependencies.push("a".to_string());
        assert_eq!(unit.record_count(), 2);
    }
}
