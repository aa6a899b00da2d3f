//! Per-invocation discovery memoization.
//!
//! Keyed by (module identity, base-type identity) and scoped to one build
//! invocation: the cache is created next to the engine run and dropped with
//! it, so it can never leak results across program-model snapshots.

use rustc_hash::FxHashMap;

use enumgen_parser::symbols::{ModuleId, SymbolId};

#[derive(Default, Debug)]
pub struct DiscoveryCache {
    derived: FxHashMap<(ModuleId, SymbolId), Vec<SymbolId>>,
}

impl DiscoveryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn derived_in_module<F>(
        &mut self,
        module: ModuleId,
        base: SymbolId,
        compute: F,
    ) -> Vec<SymbolId>
    where
        F: FnOnce() -> Vec<SymbolId>,
    {
        self.derived
            .entry((module, base))
            .or_insert_with(compute)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.derived.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }
}
