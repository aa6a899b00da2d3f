#![warn(clippy::pedantic)]
//! Parser-independent AST node abstraction and the immutable Definition Model.
//!
//! This crate knows nothing about any concrete parser. Backends produce
//! [`node::SyntaxNode`] trees wrapped in a [`node::SyntaxTree`]; conversion
//! layers produce [`definitions`] values through the builder states in
//! [`builder`]. Definitions are registered in an [`arena::DefinitionArena`]
//! which records the non-owning parent route for every node.

pub mod arena;
pub mod builder;
pub mod definitions;
pub mod errors;
pub mod node;
pub mod node_kind;
