// Copyright (c) 2026 Swirl Foundation

//! Bulletproof range proofs over requested credential values.
//!
//! Requested values must be proven to fit in 64 bits; without this the
//! balance equation would hold modulo the group order and a client could
//! request credentials summing to more than it presented.

use crate::{
    domain_separators::RANGE_PROOF_TRANSCRIPT_LABEL, request::CREDENTIAL_SET_SIZE, Error,
};
use bulletproofs_og::{BulletproofGens, PedersenGens, RangeProof};
use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};

/// Bit width of every committed value.
pub(crate) const RANGE_PROOF_BITS: usize = 64;

/// Prove all `values` lie in `[0, 2^64)`.
///
/// Returns the aggregated proof and the Pedersen commitments it covers; the
/// commitments equal `v * Gg + r * Gh` for the given blindings, so they double
/// as the request's attribute commitments.
pub(crate) fn prove_values<R: RngCore + CryptoRng>(
    values: &[u64],
    blindings: &[Scalar],
    rng: &mut R,
) -> Result<(RangeProof, Vec<CompressedRistretto>), Error> {
    let bp_gens = BulletproofGens::new(RANGE_PROOF_BITS, CREDENTIAL_SET_SIZE);
    let pc_gens = PedersenGens::default();
    let mut transcript = Transcript::new(RANGE_PROOF_TRANSCRIPT_LABEL);

    RangeProof::prove_multiple_with_rng(
        &bp_gens,
        &pc_gens,
        &mut transcript,
        values,
        blindings,
        RANGE_PROOF_BITS,
        rng,
    )
    .map_err(|_e| Error::RangeProofGeneration)
}

/// Verify an aggregated range proof over the given commitments.
pub(crate) fn verify_commitments<R: RngCore + CryptoRng>(
    proof: &RangeProof,
    commitments: &[CompressedRistretto],
    rng: &mut R,
) -> Result<(), Error> {
    let bp_gens = BulletproofGens::new(RANGE_PROOF_BITS, CREDENTIAL_SET_SIZE);
    let pc_gens = PedersenGens::default();
    let mut transcript = Transcript::new(RANGE_PROOF_TRANSCRIPT_LABEL);

    proof
        .verify_multiple_with_rng(
            &bp_gens,
            &pc_gens,
            &mut transcript,
            commitments,
            RANGE_PROOF_BITS,
            rng,
        )
        .map_err(|_e| Error::InvalidRangeProof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_range_proof_roundtrip() {
        let values = [1000u64, 0u64];
        let blindings = [Scalar::random(&mut OsRng), Scalar::random(&mut OsRng)];

        let (proof, commitments) =
            prove_values(&values, &blindings, &mut OsRng).expect("proving should succeed");
        assert_eq!(commitments.len(), CREDENTIAL_SET_SIZE);
        assert!(verify_commitments(&proof, &commitments, &mut OsRng).is_ok());
    }

    #[test]
    fn test_range_proof_rejects_swapped_commitments() {
        let values = [1000u64, 0u64];
        let blindings = [Scalar::random(&mut OsRng), Scalar::random(&mut OsRng)];
        let (proof, mut commitments) =
            prove_values(&values, &blindings, &mut OsRng).expect("proving should succeed");

        commitments.swap(0, 1);

        assert_eq!(
            verify_commitments(&proof, &commitments, &mut OsRng),
            Err(Error::InvalidRangeProof)
        );
    }

    #[test]
    fn test_commitments_match_pedersen_form() {
        let values = [77u64, 12u64];
        let blindings = [Scalar::random(&mut OsRng), Scalar::random(&mut OsRng)];
        let (_proof, commitments) =
            prove_values(&values, &blindings, &mut OsRng).expect("proving should succeed");

        let pc_gens = PedersenGens::default();
        for ((value, blinding), commitment) in
            values.iter().zip(&blindings).zip(&commitments)
        {
            let expected = Scalar::from(*value) * pc_gens.B + blinding * pc_gens.B_blinding;
            assert_eq!(expected.compress(), *commitment);
        }
    }
}
