#![warn(clippy::pedantic)]
//! Editing sessions over the parser backend.
//!
//! A [`session::CodeSession`] owns a mutable set of source files and
//! references and hands out immutable [`enumgen_parser::compilation::Compilation`]
//! snapshots, rebuilt lazily after every mutation. The
//! [`manager::SessionManager`] keys sessions by caller-chosen id, shares
//! them across threads, and sweeps idle ones in the background.

pub mod errors;
pub mod manager;
pub mod session;

pub use errors::SessionError;
pub use manager::{SessionManager, SessionStats};
pub use session::{CodeSession, SessionSnapshot, SessionTransform};
