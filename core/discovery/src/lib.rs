#![warn(clippy::pedantic)]
//! Discovery engine: finds marker-annotated collection declarations and the
//! concrete option types deriving from their base types.
//!
//! Discovery is a pure function of an immutable [`enumgen_parser::compilation::Compilation`]:
//! no process-wide state, safe to run concurrently across builds. Per-build
//! memoization lives in an explicit [`cache::DiscoveryCache`] value that is
//! created per invocation and dies with it.

pub mod cache;
pub mod engine;
pub mod facts;

pub use engine::DiscoveryEngine;
pub use facts::{
    DiscoveredCollection, EnumTypeInfo, EnumValueInfo, NameComparison, PropertyLookupInfo,
};
