//! `tstrip_core` locates every embedded expression inside a parsed template
//! tree, strips extension-only (type-level) syntax out of each one through an
//! external transformer, and splices the results back into the original text
//! with byte-exact preservation of everything outside the changed spans.
//!
//! ## Processing pipeline
//!
//! ```text
//! Parsed template tree
//!   -> Walker (ordered expression records with ancestry context)
//!   -> Classifier (ordered rules assign each record a snippet category)
//!   -> Batcher (dedup identical snippets, wrap in probes, one batched call + standalone calls)
//!   -> Unwrapper (split batch output on the marker line, recover inner text)
//!   -> Splicer (quote-safe, offset-indexed overwrites of the original text)
//! ```
//!
//! ## Key types
//!
//! - [`TemplateNode`] — the closed tree node type supplied by the host's
//!   document parser.
//! - [`Transform`] — the external expression transformer; implemented by any
//!   `Fn(String) -> Future` closure.
//! - [`SnippetCategory`] — syntactic categories with their probe wrappers.
//! - [`SpliceBuffer`] — offset-indexed overwrite buffer over the original
//!   text.
//! - [`TstripError`] — fatal engine errors.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tstrip_core::{RootNode, Span, TemplateNode, TransformFailure, transpile_template};
//!
//! let root = TemplateNode::Root(RootNode {
//!     children: vec![],
//!     span: Span::new(0, 0, ""),
//! });
//! let transform = |code: String| async move { Ok::<_, TransformFailure>(code) };
//! let rewritten =
//!     futures::executor::block_on(transpile_template("", &root, 0, &transform)).unwrap();
//! assert_eq!(rewritten, "");
//! ```
//!
//! The engine is a pure function of `(tree, source text, offset, transform)`
//! and holds no state across documents; a host processing many documents
//! concurrently can run one engine call per document on any async runtime.

pub use ast::*;
pub use batch::*;
pub use engine::*;
pub use error::*;
pub use snippets::*;
pub use splice::*;
pub use walker::*;

mod ast;
mod batch;
mod engine;
mod error;
mod snippets;
mod splice;
mod walker;

#[cfg(test)]
mod __fixtures;
