//! Source rewrite applied before the single reparse.
//!
//! The TypeScript early-error check rejects `const` declarations that have
//! no initializer. This rewrite turns each bare `const NAME;` (optionally
//! with a type annotation, optionally exported) into `let NAME;` so the
//! structure around it can still be extracted. It is textual and does not
//! look at the tree: a match inside a string or comment is rewritten too.
//!
//! Only horizontal whitespace is matched, so line numbers are unchanged.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static BARE_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bconst([ \t]+)([A-Za-z_$][A-Za-z0-9_$]*)([ \t]*:[^=;\n]*)?[ \t]*;")
        .expect("bare const pattern is valid")
});

/// Rewrite uninitialized `const` declarations into `let` declarations.
///
/// Returns `None` when nothing matched, so the caller can skip a reparse
/// that would fail the same way.
pub fn declare_uninitialized(source: &str) -> Option<String> {
    match BARE_CONST.replace_all(source, "let${1}${2}${3};") {
        Cow::Borrowed(_) => None,
        Cow::Owned(rewritten) => Some(rewritten),
    }
}
