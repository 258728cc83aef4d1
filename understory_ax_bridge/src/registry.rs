// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Id-keyed storage for per-node delegates.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use understory_ax_tree::NodeId;

/// Owns one delegate per live node and hands out non-owning references.
///
/// References are [`Weak`]: once a node is released, every outstanding
/// reference fails to upgrade.
pub struct DelegateRegistry<N> {
    delegates: HashMap<NodeId, Arc<N>>,
}

impl<N> DelegateRegistry<N> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            delegates: HashMap::new(),
        }
    }

    /// Store the delegate for `id`, dropping any previous one.
    pub fn insert(&mut self, id: NodeId, delegate: N) {
        self.delegates.insert(id, Arc::new(delegate));
    }

    /// Drop the delegate for `id`. Returns whether one was stored.
    pub fn release(&mut self, id: NodeId) -> bool {
        self.delegates.remove(&id).is_some()
    }

    /// Non-owning reference to the delegate for `id`.
    ///
    /// Unknown ids get a reference that never upgrades.
    pub fn get(&self, id: NodeId) -> Weak<N> {
        self.delegates.get(&id).map(Arc::downgrade).unwrap_or_default()
    }

    /// True if a delegate is stored for `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.delegates.contains_key(&id)
    }

    /// Number of stored delegates.
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    /// True if no delegates are stored.
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl<N> Default for DelegateRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for DelegateRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.delegates.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("DelegateRegistry")
            .field("ids", &ids)
            .finish_non_exhaustive()
    }
}
