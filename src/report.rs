//! Output formatting for extraction results.
//!
//! Two documents exist and exactly one is printed per run:
//! - the result document, the serialized `SourceUnit` with its fixed key
//!   order `namespace, dependencies, functions, classes, types, exports,
//!   components`
//! - the error document, `{"error": "<message>"}`

use serde::{Deserialize, Serialize};

use crate::analysis::SourceUnit;

/// Error document printed instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

/// Serialize a result document, pretty-printed unless `compact`.
pub fn to_json(unit: &SourceUnit, compact: bool) -> anyhow::Result<String> {
    render(unit, compact)
}

/// Serialize an error document for `message`.
pub fn error_document(message: &str, compact: bool) -> anyhow::Result<String> {
    render(
        &ErrorReport {
            error: message.to_string(),
        },
        compact,
    )
}

/// Write a result document to stdout.
pub fn write_json(unit: &SourceUnit, compact: bool) -> anyhow::Result<()> {
    let json = to_json(unit, compact)?;
    println!("{}", json);
    Ok(())
}

/// Write an error document to stdout.
pub fn write_error(message: &str, compact: bool) -> anyhow::Result<()> {
    let json = error_document(message, compact)?;
    println!("{}", json);
    Ok(())
}

fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Export, Function};

    #[test]
    fn test_empty_unit_has_all_keys_in_order() {
        let json = to_json(&SourceUnit::default(), true).unwrap();
        assert_eq!(
            json,
            r#"{"namespace":null,"dependencies":[],"functions":[],"classes":[],"types":[],"exports":[],"components":[]}"#
        );
    }

    #[test]
    fn test_camel_case_fields_and_nulls() {
        let unit = SourceUnit {
            functions: vec![Function {
                name: "f".to_string(),
                source_text: "function f() {}".to_string(),
                start_line: 1,
                end_line: 1,
            }],
            exports: vec![Export {
                name: Some("f".to_string()),
                declaration_kind: None,
                source_text: None,
            }],
            ..Default::default()
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&unit, false).unwrap()).unwrap();
        assert_eq!(value["functions"][0]["sourceText"], "function f() {}");
        assert_eq!(value["functions"][0]["startLine"], 1);
        assert_eq!(value["functions"][0]["endLine"], 1);
        assert!(value["exports"][0]["declarationKind"].is_null());
        assert!(value["exports"][0]["sourceText"].is_null());
    }

    #[test]
    fn test_pretty_and_compact_agree() {
        let unit = SourceUnit {
            dependencies: vec!["pkg/a".to_string()],
            ..Default::default()
        };
        let pretty: serde_json::Value = serde_json::from_str(&to_json(&unit, false).unwrap()).unwrap();
        let compact: serde_json::Value = serde_json::from_str(&to_json(&unit, true).unwrap()).unwrap();
        assert_eq!(pretty, compact);
        assert!(to_json(&unit, false).unwrap().contains('\n'));
    }

    #[test]
    fn test_error_document() {
        let json = error_document("cannot read x.ts: not found", true).unwrap();
        assert_eq!(json, r#"{"error":"cannot read x.ts: not found"}"#);

        let parsed: ErrorReport = serde_json::from_str(&error_document("boom", false).unwrap()).unwrap();
        assert_eq!(parsed.error, "boom");
    }
}
