//! PHP extractor using tree-sitter.

use tree_sitter::Node;

use crate::analysis::{
    line_range, printer, ClassEntity, Function, LanguageExtractor, Method, MethodKind,
    ModifierFlags, NodeKind, Property, SourceUnit, TypeDeclaration, TypeKind,
};
use crate::parser::{FileKind, ParsedFile};

/// Node kinds that name an imported symbol inside a use clause.
const USE_TARGET_KINDS: &[&str] = &["name", "qualified_name", "namespace_name"];

pub struct PhpExtractor;

impl PhpExtractor {
    pub const fn new() -> Self {
        Self
    }

    /// Direct-body members of a class, as (methods, properties).
    fn members(&self, parsed: &ParsedFile, body: Node) -> anyhow::Result<(Vec<Method>, Vec<Property>)> {
        let mut methods = Vec::new();
        let mut properties = Vec::new();

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => methods.push(self.method(parsed, member)?),
                "property_declaration" => properties.extend(self.properties(parsed, member)?),
                _ => {}
            }
        }

        Ok((methods, properties))
    }

    fn method(&self, parsed: &ParsedFile, node: Node) -> anyhow::Result<Method> {
        let name_node = node.child_by_field_name("name").ok_or_else(|| {
            anyhow::anyhow!("method without name at line {}", node.start_position().row + 1)
        })?;
        let name = parsed.node_text(name_node).to_string();
        let kind = if name.eq_ignore_ascii_case("__construct") {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        };
        let (start_line, end_line) = line_range(node);

        Ok(Method {
            name,
            modifiers: modifier_flags(parsed, node).to_modifiers(),
            kind,
            source_text: parsed.node_text(node).to_string(),
            start_line,
            end_line,
        })
    }

    /// One property per declared variable, sharing type and modifiers.
    fn properties(&self, parsed: &ParsedFile, node: Node) -> anyhow::Result<Vec<Property>> {
        let declared_type = node
            .child_by_field_name("type")
            .map(|t| parsed.node_text(t).to_string());
        let modifiers = modifier_flags(parsed, node).to_modifiers();

        let mut properties = Vec::new();
        let mut cursor = node.walk();
        for element in node.named_children(&mut cursor) {
            if element.kind() != "property_element" {
                continue;
            }
            let (name, default) = property_element(parsed, element)?;
            properties.push(Property {
                name,
                declared_type: declared_type.clone(),
                modifiers: modifiers.clone(),
                default_value_expression: default,
            });
        }

        Ok(properties)
    }
}

impl Default for PhpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for PhpExtractor {
    fn file_kind(&self) -> FileKind {
        FileKind::Php
    }

    fn classify(&self, node: Node) -> NodeKind {
        if !node.is_named() {
            return NodeKind::Other;
        }
        match node.kind() {
            "namespace_use_declaration" => NodeKind::Import,
            "namespace_definition" => NodeKind::Namespace,
            "function_definition" => NodeKind::Function,
            "class_declaration" | "anonymous_class" => NodeKind::Class,
            // Grammars without an `anonymous_class` node inline the class body.
            "object_creation_expression" if class_body(node).is_some() => NodeKind::Class,
            "interface_declaration" => NodeKind::Interface,
            _ => NodeKind::Other,
        }
    }

    fn import(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();

        let group = children.iter().find(|c| c.kind() == "namespace_use_group");
        // The group prefix is whatever name precedes the braces.
        let prefix = group.and_then(|group| {
            children
                .iter()
                .take_while(|c| c.id() != group.id())
                .filter(|c| c.kind() != "comment")
                .last()
                .map(|p| trim_namespace(parsed.node_text(*p)).trim_end_matches('\\'))
        });

        let clauses: Vec<Node> = match group {
            Some(group) => {
                let mut group_cursor = group.walk();
                let clauses = group.named_children(&mut group_cursor).collect();
                clauses
            }
            None => children.clone(),
        };

        let mut dependencies = Vec::new();
        for clause in clauses {
            if !matches!(
                clause.kind(),
                "namespace_use_clause" | "namespace_use_group_clause"
            ) {
                continue;
            }
            let mut clause_cursor = clause.walk();
            let target = clause
                .named_children(&mut clause_cursor)
                .find(|c| USE_TARGET_KINDS.contains(&c.kind()))
                .ok_or_else(|| {
                    anyhow::anyhow!("use clause without a name at line {}", clause.start_position().row + 1)
                })?;
            let target = trim_namespace(parsed.node_text(target));
            dependencies.push(match &prefix {
                Some(prefix) => format!("{}\\{}", prefix, target),
                None => target.to_string(),
            });
        }

        unit.dependencies.extend(dependencies);
        Ok(())
    }

    fn namespace(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        unit.namespace = node
            .child_by_field_name("name")
            .map(|n| trim_namespace(parsed.node_text(n)).to_string());
        Ok(())
    }

    fn function(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
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

    fn class(&self, parsed: &ParsedFile, node: Node, unit: &mut SourceUnit) -> anyhow::Result<()> {
        let name = node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string());

        let (methods, properties) = match class_body(node) {
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
}

fn class_body(node: Node) -> Option<Node> {
    if let Some(body) = node.child_by_field_name("body") {
        return Some(body);
    }
    let mut cursor = node.walk();
    let body = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "declaration_list");
    body
}

/// Members without an explicit visibility are public; `var` is public.
fn modifier_flags(parsed: &ParsedFile, node: Node) -> ModifierFlags {
    let mut flags = ModifierFlags::default();
    let mut has_visibility = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "visibility_modifier" => {
                has_visibility = true;
                match parsed.node_text(child).to_ascii_lowercase().as_str() {
                    "public" => flags.public = true,
                    "protected" => flags.protected = true,
                    "private" => flags.private = true,
                    _ => {}
                }
            }
            "var_modifier" => {
                has_visibility = true;
                flags.public = true;
            }
            "static_modifier" => flags.is_static = true,
            "final_modifier" => flags.is_final = true,
            "abstract_modifier" => flags.is_abstract = true,
            _ => {}
        }
    }

    if !has_visibility {
        flags.public = true;
    }
    flags
}

/// Name (without `$`) and pretty-printed default of a property element.
fn property_element(parsed: &ParsedFile, element: Node) -> anyhow::Result<(String, Option<String>)> {
    let mut cursor = element.walk();
    let mut name = None;
    let mut default = None;

    for child in element.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "variable_name" if name.is_none() => {
                name = Some(parsed.node_text(child).trim_start_matches('$').to_string());
            }
            "property_initializer" => {
                let mut init_cursor = child.walk();
                default = child
                    .named_children(&mut init_cursor)
                    .find(|n| n.kind() != "comment")
                    .map(|value| printer::pretty(value, &parsed.source));
            }
            _ => default = Some(printer::pretty(child, &parsed.source)),
        }
    }

    let name = name.ok_or_else(|| {
        anyhow::anyhow!("property without a variable name at line {}", element.start_position().row + 1)
    })?;
    Ok((name, default))
}

fn trim_namespace(text: &str) -> &str {
    text.trim().trim_start_matches('\\')
}
