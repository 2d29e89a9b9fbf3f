// Copyright (c) 2026 Swirl Foundation

//! Per-round binding material.

use serde::{Deserialize, Serialize};

/// The context an ownership proof is scoped to.
///
/// Created fresh for every round and never reused. Folding both the
/// coordinator identity and the round identifier into the proof challenge
/// means a proof is worthless to any other coordinator and to any other
/// round run by the same coordinator.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundBinding {
    /// Identity string of the coordinator running the round.
    pub coordinator_id: String,

    /// Round identifier assigned by the coordinator.
    pub round_id: [u8; 32],
}

impl RoundBinding {
    /// Create a binding for one round of one coordinator.
    pub fn new(coordinator_id: impl Into<String>, round_id: [u8; 32]) -> Self {
        Self {
            coordinator_id: coordinator_id.into(),
            round_id,
        }
    }

    /// Unambiguous byte encoding for hashing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let id = self.coordinator_id.as_bytes();
        let mut bytes = Vec::with_capacity(8 + id.len() + 32);
        bytes.extend_from_slice(&(id.len() as u64).to_le_bytes());
        bytes.extend_from_slice(id);
        bytes.extend_from_slice(&self.round_id);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_separates_fields() {
        // Same concatenated content, different field split.
        let a = RoundBinding::new("swirl", [7u8; 32]);
        let b = RoundBinding::new("swir", [7u8; 32]);

        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_encoding_is_stable() {
        let binding = RoundBinding::new("coordinator", [1u8; 32]);
        assert_eq!(binding.to_bytes(), binding.to_bytes());
    }
}
