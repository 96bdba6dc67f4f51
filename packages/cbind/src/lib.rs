//! Converts a C++ header for an immediate-mode GUI library into a pure C header, a
//! C++ bridging implementation, and a JSON metadata document.
//!
//! The pipeline is lex -> parse -> modify -> emit. [`dom`] holds the tree the parser
//! builds and the modifiers rewrite; [`modifiers`] is the ordered set of rewrites that
//! make the tree expressible in C; [`emit`] walks the finished tree to produce the
//! three output artifacts. [`driver`] ties the stages together for a caller that
//! already has source text and configuration in hand.

pub mod config;
pub mod dom;
pub mod driver;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod modifiers;
pub mod parser;
pub mod position;

pub use config::{EmitConfig, PipelineConfig};
pub use dom::Dom;
pub use driver::{convert, ConversionOutput};
pub use error::BindgenError;
