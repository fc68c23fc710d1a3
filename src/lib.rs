//! Codeshape - structural source extractor.
//!
//! Codeshape reads one PHP, TypeScript or TSX file and describes its
//! structure as a fixed-schema JSON document: namespace, dependencies,
//! functions, classes with members, type declarations, exports and UI
//! components.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `parser`: grammar selection, parsing and the one-shot source repair
//! - `analysis`: the traversal, language extractors and component heuristic
//! - `report`: JSON output (result and error documents)
//! - `cli`: argument parsing and logging setup
//!
//! # Example
//!
//! ```
//! use codeshape::{extract_source, FileKind};
//!
//! let unit = extract_source("import x from 'pkg';\n", FileKind::TypeScript).unwrap();
//! assert_eq!(unit.dependencies, vec!["pkg"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod parser;
pub mod report;

use std::path::Path;

pub use analysis::SourceUnit;
pub use error::ExtractError;
pub use parser::{FileKind, ParseFailure};

/// Extract the structure of in-memory source text.
///
/// Per-node extraction failures are logged and skipped; only a parse
/// failure is returned as an error.
pub fn extract_source(source: &str, kind: FileKind) -> Result<SourceUnit, ParseFailure> {
    tracing::debug!(grammar = %kind, bytes = source.len(), "parsing source");
    let parsed = parser::parse(source, kind)?;
    let outcome = analysis::walk(&parsed, analysis::extractor_for(kind));
    Ok(outcome.unit)
}

/// Read a file and extract its structure, selecting the grammar from the
/// file extension.
pub fn extract_file(path: &Path) -> Result<SourceUnit, ExtractError> {
    let source = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let kind = FileKind::from_path(path);
    extract_source(&source, kind).map_err(|failure| ExtractError::Parse {
        path: path.to_path_buf(),
        failure,
    })
}
