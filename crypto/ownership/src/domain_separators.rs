// Copyright (c) 2026 Swirl Foundation

//! Domain separation tags for ownership-proof hashing.

/// Challenge derivation for ownership proofs.
pub const OWNERSHIP_CHALLENGE_DOMAIN_TAG: &[u8] = b"swl_ownership_proof_challenge";
