//! Language-specific extractor implementations.

mod php;
mod typescript;

pub use php::PhpExtractor;
pub use typescript::TypeScriptExtractor;

use super::LanguageExtractor;
use crate::parser::FileKind;

/// Static storage for the PHP extractor.
static PHP_EXTRACTOR: PhpExtractor = PhpExtractor::new();

/// Static storage for the base TypeScript extractor.
static TYPESCRIPT_EXTRACTOR: TypeScriptExtractor = TypeScriptExtractor::new(FileKind::TypeScript);

/// Static storage for the TSX extractor.
static TSX_EXTRACTOR: TypeScriptExtractor = TypeScriptExtractor::new(FileKind::Tsx);

/// Get the extractor for a grammar variant.
pub fn extractor_for(kind: FileKind) -> &'static dyn LanguageExtractor {
    match kind {
        FileKind::Php => &PHP_EXTRACTOR,
        FileKind::TypeScript => &TYPESCRIPT_EXTRACTOR,
        FileKind::Tsx => &TSX_EXTRACTOR,
    }
}
