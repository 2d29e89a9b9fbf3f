// Copyright (c) 2026 Swirl Foundation

//! Schnorr proof of spend-key knowledge, bound to one round.

use crate::{domain_separators::OWNERSHIP_CHALLENGE_DOMAIN_TAG, Error, RoundBinding};
use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT, ristretto::CompressedRistretto, scalar::Scalar,
};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use swl_crypto_keys::{SpendPrivate, SpendPublic};

/// Proof of knowledge of the spend key behind a destination script.
///
/// The challenge commits to the script, the round binding, the nonce
/// commitment and the public key, so the proof verifies only for exactly the
/// `(script, round)` pair it was generated for.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OwnershipProof {
    /// The destination script this proof was generated for.
    pub script_pubkey: Vec<u8>,

    /// Nonce commitment `R = k * G`.
    pub commitment: CompressedRistretto,

    /// Response `s = k + c * x`.
    pub response: Scalar,
}

impl OwnershipProof {
    /// Prove control of `script_pubkey` for the given round.
    ///
    /// The caller is responsible for `key` actually being the key the script
    /// commits to; a mismatched pair simply produces a proof nobody can
    /// verify.
    pub fn prove<R: CryptoRngCore>(
        key: &SpendPrivate,
        script_pubkey: &[u8],
        binding: &RoundBinding,
        rng: &mut R,
    ) -> Self {
        let nonce = Scalar::random(rng);
        let commitment = (nonce * RISTRETTO_BASEPOINT_POINT).compress();
        let challenge = challenge(
            script_pubkey,
            binding,
            &commitment,
            &key.public().compress(),
        );
        let response = nonce + challenge * key.as_ref();

        Self {
            script_pubkey: script_pubkey.to_vec(),
            commitment,
            response,
        }
    }

    /// Verify against the spend key the destination script commits to,
    /// under the given round binding.
    pub fn verify(&self, key: &SpendPublic, binding: &RoundBinding) -> Result<(), Error> {
        let commitment = self
            .commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;
        let challenge = challenge(
            &self.script_pubkey,
            binding,
            &self.commitment,
            &key.compress(),
        );

        // s * G = R + c * P
        if self.response * RISTRETTO_BASEPOINT_POINT == commitment + challenge * key.as_ref() {
            Ok(())
        } else {
            Err(Error::InvalidProof)
        }
    }
}

fn challenge(
    script_pubkey: &[u8],
    binding: &RoundBinding,
    commitment: &CompressedRistretto,
    public: &CompressedRistretto,
) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(OWNERSHIP_CHALLENGE_DOMAIN_TAG);
    hasher.update((script_pubkey.len() as u64).to_le_bytes());
    hasher.update(script_pubkey);
    hasher.update(binding.to_bytes());
    hasher.update(commitment.as_bytes());
    hasher.update(public.as_bytes());
    Scalar::from_hash(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand_core::OsRng;

    fn keypair() -> (SpendPrivate, SpendPublic) {
        let private = SpendPrivate::from_random(&mut OsRng);
        let public = private.public();
        (private, public)
    }

    #[test]
    fn test_proof_verifies_for_its_round() {
        let (private, public) = keypair();
        let script = public.to_bytes();
        let binding = RoundBinding::new("coordinator", [1u8; 32]);

        let proof = OwnershipProof::prove(&private, &script, &binding, &mut OsRng);
        assert!(proof.verify(&public, &binding).is_ok());
    }

    #[test]
    fn test_proof_rejected_under_other_round() {
        let (private, public) = keypair();
        let script = public.to_bytes();
        let binding = RoundBinding::new("coordinator", [1u8; 32]);
        let other_round = RoundBinding::new("coordinator", [2u8; 32]);

        let proof = OwnershipProof::prove(&private, &script, &binding, &mut OsRng);
        assert_eq!(
            proof.verify(&public, &other_round),
            Err(Error::InvalidProof)
        );
    }

    #[test]
    fn test_proof_rejected_under_other_coordinator() {
        let (private, public) = keypair();
        let script = public.to_bytes();
        let binding = RoundBinding::new("coordinator", [1u8; 32]);
        let other_coordinator = RoundBinding::new("imposter", [1u8; 32]);

        let proof = OwnershipProof::prove(&private, &script, &binding, &mut OsRng);
        assert_eq!(
            proof.verify(&public, &other_coordinator),
            Err(Error::InvalidProof)
        );
    }

    #[test]
    fn test_proof_rejected_for_other_key() {
        let (private, public) = keypair();
        let (_other_private, other_public) = keypair();
        let script = public.to_bytes();
        let binding = RoundBinding::new("coordinator", [1u8; 32]);

        let proof = OwnershipProof::prove(&private, &script, &binding, &mut OsRng);
        assert_eq!(
            proof.verify(&other_public, &binding),
            Err(Error::InvalidProof)
        );
    }

    #[test]
    fn test_proof_rejected_when_script_swapped() {
        let (private, public) = keypair();
        let script = public.to_bytes();
        let binding = RoundBinding::new("coordinator", [1u8; 32]);

        let mut proof = OwnershipProof::prove(&private, &script, &binding, &mut OsRng);
        proof.script_pubkey = vec![0u8; 32];

        assert_eq!(proof.verify(&public, &binding), Err(Error::InvalidProof));
    }

    proptest! {
        #[test]
        fn test_distinct_round_ids_never_cross_verify(
            round_a in prop::array::uniform32(any::<u8>()),
            round_b in prop::array::uniform32(any::<u8>()),
        ) {
            prop_assume!(round_a != round_b);

            let (private, public) = keypair();
            let script = public.to_bytes();
            let binding_a = RoundBinding::new("coordinator", round_a);
            let binding_b = RoundBinding::new("coordinator", round_b);

            let proof = OwnershipProof::prove(&private, &script, &binding_a, &mut OsRng);
            prop_assert!(proof.verify(&public, &binding_a).is_ok());
            prop_assert!(proof.verify(&public, &binding_b).is_err());
        }
    }
}
