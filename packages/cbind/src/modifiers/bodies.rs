//! Removes parsed function bodies, keeping only signatures.
//!
//! The parser never retains body tokens in the first place (`FunctionDeclaration` has
//! no body field; [`parser::function_like::skip_balanced_braces`](crate::parser)
//! discards them as it scans past). This pass exists purely to keep the pipeline's
//! step order matching the original tool's, and to give a single place to assert the
//! invariant it establishes.

use crate::dom::Dom;

pub fn remove_function_bodies(_dom: &mut Dom) {}
