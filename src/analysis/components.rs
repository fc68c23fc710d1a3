//! UI component classification for markup-bearing files.
//!
//! The rules are deliberately approximate and must stay exactly as they
//! are:
//! - a class is a component when it extends one of `COMPONENT_BASES`;
//! - a function-shaped node is a component when it initializes a variable,
//!   or when it is a named function declaration with at least one
//!   parameter.
//!
//! Plain helper functions with parameters are therefore reported as
//! components. Props are the markup attributes used in the component body.

use anyhow::anyhow;
use phf::phf_set;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use super::{line_range, printer, Component, Prop};
use crate::parser::ParsedFile;

/// Base classes that make a class a component.
static COMPONENT_BASES: phf::Set<&'static str> = phf_set! {
    "Component",
    "PureComponent",
    "React.Component",
    "React.PureComponent",
};

/// Every markup attribute, in document order.
const ATTRIBUTE_QUERY: &str = "(jsx_attribute) @attribute";

/// Classification of a class or function-shaped node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the plain function/class record.
    Plain,
    /// Divert into `components` under this name.
    Component { name: Option<String> },
}

/// Classify a class declaration by its `extends` clause.
pub fn classify_class(parsed: &ParsedFile, class: Node) -> Verdict {
    match superclass(parsed, class) {
        Some(base) if COMPONENT_BASES.contains(base) => Verdict::Component {
            name: class
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n).to_string()),
        },
        _ => Verdict::Plain,
    }
}

/// Classify a function declaration, function expression or arrow function.
pub fn classify_function(parsed: &ParsedFile, function: Node) -> Verdict {
    if let Some(declarator) = initialized_declarator(function) {
        return Verdict::Component {
            name: declarator
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n).to_string()),
        };
    }

    if matches!(
        function.kind(),
        "function_declaration" | "generator_function_declaration"
    ) {
        if let Some(name) = function.child_by_field_name("name") {
            if parameter_count(function) > 0 {
                return Verdict::Component {
                    name: Some(parsed.node_text(name).to_string()),
                };
            }
        }
    }

    Verdict::Plain
}

/// Build the component record, scanning the body for markup attributes.
pub fn build(parsed: &ParsedFile, node: Node, name: Option<String>) -> anyhow::Result<Component> {
    let scope = node.child_by_field_name("body").unwrap_or(node);
    let props = markup_props(parsed, scope)?;
    let (start_line, end_line) = line_range(node);

    Ok(Component {
        name,
        source_text: parsed.node_text(node).to_string(),
        start_line,
        end_line,
        props,
    })
}

/// The text of the `extends` value, without type arguments.
fn superclass<'a>(parsed: &'a ParsedFile, class: Node) -> Option<&'a str> {
    let mut cursor = class.walk();
    let heritage = class
        .children(&mut cursor)
        .find(|c| c.kind() == "class_heritage")?;

    let mut heritage_cursor = heritage.walk();
    let extends = heritage
        .named_children(&mut heritage_cursor)
        .find(|c| c.kind() == "extends_clause")?;

    let value = extends
        .child_by_field_name("value")
        .or_else(|| extends.named_child(0))?;
    Some(parsed.node_text(value).trim())
}

/// The variable declarator this node is the initializer of, if any.
fn initialized_declarator(node: Node) -> Option<Node> {
    let parent = node.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    let value = parent.child_by_field_name("value")?;
    (value.id() == node.id()).then_some(parent)
}

fn parameter_count(function: Node) -> usize {
    if function.child_by_field_name("parameter").is_some() {
        return 1;
    }
    match function.child_by_field_name("parameters") {
        Some(params) => {
            let mut cursor = params.walk();
            let count = params
                .named_children(&mut cursor)
                .filter(|p| p.kind() != "comment")
                .count();
            count
        }
        None => 0,
    }
}

fn markup_props(parsed: &ParsedFile, scope: Node) -> anyhow::Result<Vec<Prop>> {
    let query = Query::new(&parsed.kind.language(), ATTRIBUTE_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, scope, parsed.source.as_bytes());

    let mut props = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            props.push(attribute_prop(parsed, capture.node)?);
        }
    }
    Ok(props)
}

fn attribute_prop(parsed: &ParsedFile, attribute: Node) -> anyhow::Result<Prop> {
    let mut cursor = attribute.walk();
    let mut parts = attribute
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment");

    let name = parts.next().ok_or_else(|| {
        anyhow!(
            "markup attribute without a name at line {}",
            attribute.start_position().row + 1
        )
    })?;
    let value_expression = parts.next().and_then(|value| attribute_value(parsed, value));

    Ok(Prop {
        name: parsed.node_text(name).to_string(),
        value_expression,
    })
}

/// `"x"` keeps its quotes; `{expr}` yields the expression; `{}` yields
/// nothing.
fn attribute_value(parsed: &ParsedFile, value: Node) -> Option<String> {
    match value.kind() {
        "string" => Some(parsed.node_text(value).to_string()),
        "jsx_expression" => {
            let mut cursor = value.walk();
            let inner = value
                .named_children(&mut cursor)
                .find(|n| n.kind() != "comment")?;
            Some(printer::pretty(inner, &parsed.source))
        }
        _ => Some(printer::pretty(value, &parsed.source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, FileKind};

    fn first_of_kind<'a>(root: Node<'a>, kind: &str) -> Option<Node<'a>> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == kind && node.is_named() {
                return Some(node);
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }

    fn tsx(source: &str) -> ParsedFile {
        parse(source, FileKind::Tsx).unwrap()
    }

    #[test]
    fn test_class_extending_component() {
        let parsed = tsx("class Foo extends Component {}\n");
        let class = first_of_kind(parsed.root(), "class_declaration").unwrap();
        assert_eq!(
            classify_class(&parsed, class),
            Verdict::Component {
                name: Some("Foo".to_string())
            }
        );
    }

    #[test]
    fn test_class_extending_react_pure_component_with_generics() {
        let parsed = tsx("class Foo extends React.PureComponent<Props> {}\n");
        let class = first_of_kind(parsed.root(), "class_declaration").unwrap();
        assert!(matches!(classify_class(&parsed, class), Verdict::Component { .. }));
    }

    #[test]
    fn test_class_with_other_base_is_plain() {
        let parsed = tsx("class Store extends EventEmitter {}\nclass Bare {}\n");
        let root = parsed.root();
        let mut cursor = root.walk();
        let classes: Vec<_> = root
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "class_declaration")
            .collect();
        assert_eq!(classes.len(), 2);
        for class in classes {
            assert_eq!(classify_class(&parsed, class), Verdict::Plain);
        }
    }

    #[test]
    fn test_arrow_assigned_to_const() {
        let parsed = tsx("const Button = () => <button />;\n");
        let arrow = first_of_kind(parsed.root(), "arrow_function").unwrap();
        assert_eq!(
            classify_function(&parsed, arrow),
            Verdict::Component {
                name: Some("Button".to_string())
            }
        );
    }

    #[test]
    fn test_function_declaration_needs_a_parameter() {
        let parsed = tsx("function App() { return null; }\n");
        let func = first_of_kind(parsed.root(), "function_declaration").unwrap();
        assert_eq!(classify_function(&parsed, func), Verdict::Plain);

        let parsed = tsx("function Card(props) { return null; }\n");
        let func = first_of_kind(parsed.root(), "function_declaration").unwrap();
        assert_eq!(
            classify_function(&parsed, func),
            Verdict::Component {
                name: Some("Card".to_string())
            }
        );
    }

    #[test]
    fn test_callback_argument_is_plain() {
        let parsed = tsx("items.map((item) => item.id);\n");
        let arrow = first_of_kind(parsed.root(), "arrow_function").unwrap();
        assert_eq!(classify_function(&parsed, arrow), Verdict::Plain);
    }

    #[test]
    fn test_props_from_markup_attributes() {
        let source = r#"const Card = ({ title }) => (
  <div className="card" onClick={() => open(title)} hidden>
    <h2 id={title}>{title}</h2>
  </div>
);
"#;
        let parsed = tsx(source);
        let arrow = first_of_kind(parsed.root(), "arrow_function").unwrap();
        let component = build(&parsed, arrow, Some("Card".to_string())).unwrap();

        let props: Vec<(&str, Option<&str>)> = component
            .props
            .iter()
            .map(|p| (p.name.as_str(), p.value_expression.as_deref()))
            .collect();
        assert_eq!(
            props,
            vec![
                ("className", Some("\"card\"")),
                ("onClick", Some("() => open(title)")),
                ("hidden", None),
                ("id", Some("title")),
            ]
        );
        assert_eq!(component.start_line, 1);
        assert_eq!(component.end_line, 5);
    }
}
