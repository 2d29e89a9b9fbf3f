// Copyright (c) 2026 Swirl Foundation

//! Domain separation tags for credential hashing.

/// Hash-to-point derivation of the fixed credential generators.
pub const CREDENTIAL_GENERATOR_DOMAIN_TAG: &[u8] = b"swl_credential_generator";

/// Hash-to-point derivation of the per-MAC base `U = H(t)`.
pub const MAC_BASE_DOMAIN_TAG: &[u8] = b"swl_credential_mac_base";

/// Challenge derivation for credential request proofs.
pub const REQUEST_CHALLENGE_DOMAIN_TAG: &[u8] = b"swl_credential_request_challenge";

/// Challenge derivation for issuance proofs.
pub const ISSUANCE_CHALLENGE_DOMAIN_TAG: &[u8] = b"swl_credential_issuance_challenge";

/// Merlin transcript label for the aggregated range proof.
pub const RANGE_PROOF_TRANSCRIPT_LABEL: &[u8] = b"swl_credential_range_proof";
