//! AST-backed structural extraction.
//!
//! This module turns a parsed file into a `SourceUnit`: the namespace,
//! dependencies, functions, classes, types, exports and UI components the
//! file declares.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ ParsedFile  │────▶│ walk         │────▶│ SourceUnit    │
//! └─────────────┘     │ (pre-order)  │     │ (records)     │
//!                     └──────────────┘     └───────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐     ┌───────────────┐
//!                     │ Extractors   │────▶│ components    │
//!                     │ (PHP, TS)    │     │ (TSX only)    │
//!                     └──────────────┘     └───────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement the `LanguageExtractor` trait: `classify` plus the handlers
//!    for the node kinds the language has
//! 3. Return it from `languages::extractor_for`

pub mod components;
mod facts;
mod languages;
pub mod printer;
mod traits;
mod walk;

pub use facts::{
    line_range, ClassEntity, Component, DeclarationKind, Export, Function, Method, MethodKind,
    Modifier, ModifierFlags, Prop, Property, SourceUnit, TypeDeclaration, TypeKind,
};
pub use languages::{extractor_for, PhpExtractor, TypeScriptExtractor};
pub use traits::{LanguageExtractor, NodeKind};
pub use walk::{walk, NodeFailure, WalkOutcome};
