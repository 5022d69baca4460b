//! Dynamic text bindings
//!
//! Text elements may embed bindings that are resolved when the document is
//! rendered:
//!
//! - `{mapFrame:<frame>.mapName}`, `.description`, `.scale`
//! - `{project.name}`
//! - `{layout:<layout>.name}`, `.serviceLayerCredits`

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
