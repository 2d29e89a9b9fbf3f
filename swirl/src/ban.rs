// Copyright (c) 2026 Swirl Foundation

//! The cross-round coin ban list.
//!
//! A coordinator ban is permanent: a banned coin is filtered out before
//! registration and never resubmitted. The list is the only mutable state
//! shared between rounds.

use crate::coin::OutPoint;
use std::{
    collections::HashSet,
    sync::{Arc, RwLock},
};

/// Thread-safe set of permanently banned outpoints.
#[derive(Clone, Debug, Default)]
pub struct BanList {
    inner: Arc<RwLock<HashSet<OutPoint>>>,
}

impl BanList {
    /// An empty ban list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a coordinator ban for `outpoint`.
    pub fn ban(&self, outpoint: OutPoint) {
        if let Ok(mut set) = self.inner.write() {
            set.insert(outpoint);
        }
    }

    /// Whether `outpoint` has ever been banned.
    pub fn is_banned(&self, outpoint: &OutPoint) -> bool {
        self.inner
            .read()
            .map(|set| set.contains(outpoint))
            .unwrap_or(false)
    }

    /// Number of banned outpoints.
    pub fn len(&self) -> usize {
        self.inner.read().map(|set| set.len()).unwrap_or(0)
    }

    /// Whether no outpoint is banned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ban_is_visible_to_clones() {
        let list = BanList::new();
        let shared = list.clone();
        let outpoint = OutPoint::new([1u8; 32], 0);

        assert!(!shared.is_banned(&outpoint));
        list.ban(outpoint);
        assert!(shared.is_banned(&outpoint));
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_ban_is_idempotent() {
        let list = BanList::new();
        let outpoint = OutPoint::new([2u8; 32], 1);

        list.ban(outpoint);
        list.ban(outpoint);
        assert_eq!(list.len(), 1);
    }
}
