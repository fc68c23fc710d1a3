//! TypeScript and TSX extractor using tree-sitter.

use tree_sitter::Node;

use crate::analysis::components::{self, Verdict};
use crate::analysis::{
    line_range, printer, ClassEntity, DeclarationKind, Export, Function, LanguageExtractor,
    Method, MethodKind, ModifierFlags, NodeKind, Property, SourceUnit, TypeDeclaration, TypeKind,
};
use crate::parser::{FileKind, ParsedFile};

/// Extractor for both TypeScript grammars. Component detection runs only
/// for the markup-bearing one.
pub struct TypeScriptExtractor {
    kind: FileKind,
}

impl TypeScriptExtractor {
    pub const fn new(kind: FileKind) -> Self {
        Self { kind }
    }

    fn members(&self, parsed: &ParsedFile, body: Node) -> anyhow::Result<(Vec<Method>, Vec<Property>)> {
        let mut methods = Vec::new();
        let mut properties = Vec::new();

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_definition" | "abstract_method_signature" => {
                    methods.push(self.method(parsed, member)?)
                }
                "public_field_definition" | "field_definition" => {
                    properties.push(self.property(parsed, member)?)
                }
                _ => {}
            }
        }

        Ok((methods, properties))
    }

    fn method(&self, parsed: &ParsedFile, node: Node) -> anyhow::Result<Method> {
        let name_node = member_name(node)?;
        let name = parsed.node_text(name_node).to_string();

        let kind = match accessor_keyword(node, name_node) {
            Some("get") => MethodKind::Get,
            Some("set") => MethodKind::Set,
            _ if name == "constructor" => MethodKind::Constructor,
            _ => MethodKind::Method,
        };
        let (start_line, end_line) = line_range(node);

        Ok(Method {
            name,
            modifiers: modifier_flags(parsed, node, name_node).to_modifiers(),
            kind,
            source_text: parsed.node_text(node).to_string(),
            start_line,
            end_line,
        })
    }

    fn property(&self, parsed: &ParsedFile, node: Node) -> anyhow::Result<Property> {
        let name_node = member_name(node)?;
        let declared_type = node.child_by_field_name("type").map(|t| {
            parsed
                .node_text(t)
                .trim_start()
                .trim_start_matches(':')
                .trim()
                .to_string()
        });
        let default_value_expression = node
            .child_by_field_name("value")
            .map(|v| printer::pretty(v, &parsed.source));

        Ok(Property {
            name: parsed.node_text(name_node).to_string(),
            declared_type,
            modifiers: modifier_flags(parsed, node, name_node).to_modifiers(),
            default_value_expression,
        })
    }

    fn push_component(
        &self,
        parsed: &ParsedFile,
        node: Node,
        name: Option<String>,
        unit: &mut SourceUnit,
    ) -> anyhow::Result<()> {
        let component = components::build(parsed, node, name)?;
        unit.components.push(component);
        Ok(())
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn file_kind(&self) -> FileKind {
        self.kind
    }

    fn classify(&self, node: Node) -> NodeKind {
        if !node.is_named() {
            return NodeKind::Other;
        }
        match node.kind() {
            "import_statement" => NodeKind::Import,
            "internal_module" | "module" => NodeKind::Namespace,
            "function_declaration" | "generator_function_declaration" => NodeKind::Function,
            "function_expression" | "function" | "generator_function"
                if self.kind.is_ui_bearing() =>
            {
                NodeKind::FunctionExpression
            }
            "arrow_function" if self.kind.is_ui_bearing() => NodeKind::ArrowFunction,
            "class_declaration" | "abstract_class_declaration" => NodeKind::Class,
            // `export default class {}`
            "class" if node.parent().map(|p| p.kind()) == Some("export_statement") => {
                NodeKind::Class
            }
            "interface_declaration" => NodeKind::Interface,
            "type_alias_declaration" => NodeKind::TypeAlias,
            "export_statement" => NodeKind::Export,
            _ => NodeKind::Other,
        }
    }

    fn import(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        let source = node.child_by_field_name("source").or_else(|| {
            let mut cursor = node.walk();
            let clause = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "import_require_clause");
            clause.and_then(|c| c.child_by_field_name("source"))
        });

        let source = source.ok_or_else(|| {
            anyhow::anyhow!("import without a module specifier at line {}", node.start_position().row + 1)
        })?;
        unit.dependencies.push(unquote(parsed.node_text(source)).to_string());
        Ok(())
    }

    fn namespace(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        unit.namespace = node
            .child_by_field_name("name")
            .map(|n| unquote(parsed.node_text(n)).to_string());
        Ok(())
    }

    fn function(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        if self.kind.is_ui_bearing() {
            if let Verdict::Component { name } = components::classify_function(parsed, node) {
                return self.push_component(parsed, node, name, unit);
            }
        }

        let Some(name_node) = node.child_by_field_name("name") else {
            return Ok(());
        };
        let (start_line, end_line) = line_range(node);
        unit.functions.push(Function {
            name: parsed.node_text(name_node).to_string(),
            source_text: parsed.node_text(node).to_string(),
            start_line,
            end_line,
        });
        Ok(())
    }

    fn function_expression(
        &self,
        parsed: &ParsedFile,
        node: Node,
        unit: &mut SourceUnit,
    ) -> anyhow::Result<()> {
        match components::classify_function(parsed, node) {
            Verdict::Component { name } => self.push_component(parsed, node, name, unit),
            Verdict::Plain => Ok(()),
        }
    }

    fn class(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        if self.kind.is_ui_bearing() {
            if let Verdict::Component { name } = components::classify_class(parsed, node) {
                return self.push_component(parsed, node, name, unit);
            }
        }

        let name = node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string());
        let (methods, properties) = match node.child_by_field_name("body") {
            Some(body) => self.members(parsed, body)?,
            None => (Vec::new(), Vec::new()),
        };

        let (start_line, end_line) = line_range(node);
        unit.classes.push(ClassEntity {
            name,
            source_text: parsed.node_text(node).to_string(),
            start_line,
            end_line,
            methods,
            properties,
        });
        Ok(())
    }

    fn type_declaration(
        &self,
        parsed: &ParsedFile,
        node: Node,
        kind: TypeKind,
        unit: &mut SourceUnit,
    ) -> anyhow::Result<()> {
        let Some(name_node) = node.child_by_field_name("name") else {
            return Ok(());
        };
        let (start_line, end_line) = line_range(node);
        unit.types.push(TypeDeclaration {
            name: parsed.node_text(name_node).to_string(),
            kind,
            source_text: parsed.node_text(node).to_string(),
            start_line,
            end_line,
        });
        Ok(())
    }

    fn export(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        let is_default = has_keyword(node, "default");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let name = if is_default {
                Some("default".to_string())
            } else {
                declaration_name(parsed, declaration)
            };
            unit.exports.push(Export {
                name,
                declaration_kind: Some(declaration_kind(declaration)),
                source_text: Some(parsed.node_text(declaration).to_string()),
            });
            return Ok(());
        }

        if let Some(value) = node.child_by_field_name("value") {
            let kind = match value.kind() {
                "class" => DeclarationKind::Class,
                "function_expression" | "function" | "generator_function" | "arrow_function" => {
                    DeclarationKind::Function
                }
                _ => DeclarationKind::Expression,
            };
            unit.exports.push(Export {
                name: Some("default".to_string()),
                declaration_kind: Some(kind),
                source_text: Some(parsed.node_text(value).to_string()),
            });
            return Ok(());
        }

        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "export_clause");
        // `export * from` and `export =` carry no specifiers.
        let Some(clause) = clause else {
            return Ok(());
        };

        let mut clause_cursor = clause.walk();
        for specifier in clause.named_children(&mut clause_cursor) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let exported = specifier
                .child_by_field_name("alias")
                .or_else(|| specifier.child_by_field_name("name"));
            unit.exports.push(Export {
                name: exported.map(|n| unquote(parsed.node_text(n)).to_string()),
                declaration_kind: None,
                source_text: None,
            });
        }
        Ok(())
    }
}

fn member_name(node: Node) -> anyhow::Result<Node> {
    node.child_by_field_name("name").ok_or_else(|| {
        anyhow::anyhow!(
            "{} without name at line {}",
            node.kind(),
            node.start_position().row + 1
        )
    })
}

/// Keyword tokens that precede the member name.
fn leading_keywords<'a>(node: Node<'a>, name: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    let keywords = node
        .children(&mut cursor)
        .take_while(|c| c.start_byte() < name.start_byte())
        .collect();
    keywords
}

fn accessor_keyword(node: Node, name: Node) -> Option<&'static str> {
    leading_keywords(node, name)
        .into_iter()
        .find_map(|c| match c.kind() {
            "get" if !c.is_named() => Some("get"),
            "set" if !c.is_named() => Some("set"),
            _ => None,
        })
}

/// Only explicit keywords count; there is no implicit visibility.
fn modifier_flags(parsed: &ParsedFile, node: Node, name: Node) -> ModifierFlags {
    let mut flags = ModifierFlags::default();
    for child in leading_keywords(node, name) {
        match child.kind() {
            "accessibility_modifier" => match parsed.node_text(child).trim() {
                "public" => flags.public = true,
                "protected" => flags.protected = true,
                "private" => flags.private = true,
                _ => {}
            },
            "static" if !child.is_named() => flags.is_static = true,
            "abstract" if !child.is_named() => flags.is_abstract = true,
            _ => {}
        }
    }
    flags
}

fn has_keyword(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == keyword);
    found
}

fn declaration_kind(declaration: Node) -> DeclarationKind {
    match declaration.kind() {
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            DeclarationKind::Function
        }
        "class_declaration" | "abstract_class_declaration" => DeclarationKind::Class,
        "lexical_declaration" | "variable_declaration" => DeclarationKind::Variable,
        "interface_declaration" => DeclarationKind::Interface,
        "type_alias_declaration" => DeclarationKind::Type,
        "enum_declaration" => DeclarationKind::Enum,
        "internal_module" | "module" => DeclarationKind::Namespace,
        "ambient_declaration" => match first_named_child(declaration) {
            Some(inner) => declaration_kind(inner),
            None => DeclarationKind::Expression,
        },
        _ => DeclarationKind::Expression,
    }
}

/// Name of an exported declaration; variable declarations use their
/// first declarator.
fn declaration_name(parsed: &ParsedFile, declaration: Node) -> Option<String> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            let declarator = declaration
                .named_children(&mut cursor)
                .find(|c| c.kind() == "variable_declarator");
            declarator
                .and_then(|d| d.child_by_field_name("name"))
                .map(|n| parsed.node_text(n).to_string())
        }
        "ambient_declaration" => {
            first_named_child(declaration).and_then(|inner| declaration_name(parsed, inner))
        }
        _ => declaration
            .child_by_field_name("name")
            .map(|n| unquote(parsed.node_text(n)).to_string()),
    }
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    child
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
}
