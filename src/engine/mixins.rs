// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ProjectionInterface;
use crate::traits::Mixin;

/// Projection interface -> capability interface -> mixin.
///
/// A mixin is indexed under every capability it lists that the projection
/// interface also extends (or that names the projection interface itself). The
/// last registration wins per capability.
#[derive(Default)]
pub struct MixinRegistry {
    entries: RwLock<HashMap<String, HashMap<String, Arc<dyn Mixin>>>>,
}

impl MixinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mixin` for `interface` and return the capabilities it was
    /// indexed under, sorted. An empty result means nothing was registered.
    pub fn register(&self, interface: &ProjectionInterface, mixin: Arc<dyn Mixin>) -> Vec<String> {
        let extended: HashSet<&str> = interface
            .extends
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(interface.name.as_str()))
            .collect();
        let mut capabilities: Vec<String> = mixin
            .capabilities()
            .into_iter()
            .filter(|c| extended.contains(c.as_str()))
            .collect();
        capabilities.sort();
        capabilities.dedup();
        if capabilities.is_empty() {
            return capabilities;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let by_capability = entries.entry(interface.name.clone()).or_default();
        for capability in &capabilities {
            by_capability.insert(capability.clone(), Arc::clone(&mixin));
        }
        capabilities
    }

    pub fn lookup(&self, interface: &str, capability: &str) -> Option<Arc<dyn Mixin>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(interface)
            .and_then(|by_capability| by_capability.get(capability))
            .cloned()
    }

    pub fn remove(&self, interface: &str, capability: &str) -> Option<Arc<dyn Mixin>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let by_capability = entries.get_mut(interface)?;
        let removed = by_capability.remove(capability);
        if by_capability.is_empty() {
            entries.remove(interface);
        }
        removed
    }

    /// Capabilities with a registered mixin for `interface`, sorted
    pub fn capabilities(&self, interface: &str) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut capabilities: Vec<String> = entries
            .get(interface)
            .map(|by_capability| by_capability.keys().cloned().collect())
            .unwrap_or_default();
        capabilities.sort();
        capabilities
    }
}

impl std::fmt::Debug for MixinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut interfaces: Vec<&String> = entries.keys().collect();
        interfaces.sort();
        f.debug_struct("MixinRegistry")
            .field("interfaces", &interfaces)
            .finish()
    }
}
