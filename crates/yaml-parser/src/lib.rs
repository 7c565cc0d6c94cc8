//! # yaml-parser
//!
//! Parse YAML into an editable tree and write it back without disturbing
//! anything that was not edited.
//!
//! ## Overview
//!
//! - [`parse`] runs `yaml_edit`'s lossless parser and turns its syntax tree
//!   into a [`YamlDocument`]: an arena of nodes over the original text, plus
//!   the [`ParseError`]s reported along the way.
//! - [`YamlDocument::walk`] visits pairs and nodes depth-first in document
//!   order, handing the visitor the structural path to the current item.
//! - [`YamlDocument::resolve_alias`] maps an alias to the single anchored
//!   scalar it refers to, so an edit through any alias reaches them all.
//! - `Display` replays the source text with only the edited scalars
//!   replaced.
//!
//! ## Example
//!
//! ```ignore
//! use yaml_parser::parse;
//!
//! let mut doc = parse("defines:\n  - &react ^18.2.0\ncatalog:\n  react: *react\n").document;
//! let alias = doc.get_path(&["catalog", "react"]).unwrap();
//! let anchor = doc.resolve_alias(alias).unwrap();
//! doc.set_scalar(anchor, "^18.3.1");
//! assert_eq!(
//!     doc.to_string(),
//!     "defines:\n  - &react ^18.3.1\ncatalog:\n  react: *react\n"
//! );
//! ```

mod parser;
mod walker;
mod yaml_tree;

pub use parser::{parse, ParseError, ParseResult};
pub use walker::{PathItem, Visit, Visited};
pub use yaml_tree::{
    Alias, Flow, Map, Node, NodeId, NodeKind, Pair, Scalar, ScalarStyle, ScalarType, Seq, Span,
    YamlDocument,
};
