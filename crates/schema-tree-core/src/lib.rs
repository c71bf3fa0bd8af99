//! # schema-tree-core
//!
//! The compiled schema graph consumed by the tree-diagram renderer.
//!
//! This crate provides:
//! - An arena-backed [`SchemaContext`] of modules, nodes and features
//! - A [`ContextBuilder`] that normalises choices, operations and augments
//! - A JSON [description](description) format compiled into a context
//! - If-feature parsing and evaluation
//! - Schema-path resolution and prefix rewriting ([`path`])
//!
//! # Example
//!
//! ```
//! use schema_tree_core::{BaseType, ContextBuilder, LeafType, NewNode};
//!
//! let mut b = ContextBuilder::new();
//! let m = b.add_module("example", "ex").unwrap();
//! let top = b.add_top_level(m, NewNode::container("top")).unwrap();
//! b.add_child(top, NewNode::leaf("id", LeafType::builtin(BaseType::Uint32)).mandatory(true))
//!     .unwrap();
//! let ctx = b.build();
//!
//! assert_eq!(ctx.node(top).children.len(), 1);
//! ```

pub mod builder;
pub mod context;
pub mod description;
pub mod error;
pub mod path;
pub mod types;

pub use builder::{ContextBuilder, NewNode};
pub use context::SchemaContext;
pub use error::SchemaError;
pub use types::*;
