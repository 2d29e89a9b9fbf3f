// Copyright (c) 2026 Swirl Foundation

//! Plain Schnorr signatures with domain-separated challenges.
//!
//! This is the witness scheme for spending a coin: `R = k * G`,
//! `s = k + c * x`, with the challenge `c` binding a caller-supplied context
//! string so a signature over one message class can never be replayed in
//! another.

use crate::{Error, SpendPrivate, SpendPublic};
use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT, ristretto::CompressedRistretto, scalar::Scalar,
};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

/// Domain separator for signature challenges.
const SPEND_SIGNATURE_DOMAIN_TAG: &[u8] = b"swl_spend_signature";

/// A Schnorr signature over the Ristretto group.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Signature {
    /// Nonce commitment `R = k * G`.
    pub commitment: CompressedRistretto,

    /// Response `s = k + c * x`.
    pub response: Scalar,
}

impl Signature {
    /// Sign `message` under `context` with the given spend key.
    pub fn sign<R: CryptoRngCore>(
        key: &SpendPrivate,
        context: &[u8],
        message: &[u8],
        rng: &mut R,
    ) -> Self {
        let nonce = Scalar::random(rng);
        let commitment = (nonce * RISTRETTO_BASEPOINT_POINT).compress();
        let challenge = challenge(&commitment, &key.public().compress(), context, message);
        let response = nonce + challenge * key.as_ref();

        Self {
            commitment,
            response,
        }
    }

    /// Verify against the signer's public key.
    pub fn verify(
        &self,
        key: &SpendPublic,
        context: &[u8],
        message: &[u8],
    ) -> Result<(), Error> {
        let commitment = self
            .commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;
        let challenge = challenge(&self.commitment, &key.compress(), context, message);

        // s * G = R + c * P
        if self.response * RISTRETTO_BASEPOINT_POINT == commitment + challenge * key.as_ref() {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

fn challenge(
    commitment: &CompressedRistretto,
    public: &CompressedRistretto,
    context: &[u8],
    message: &[u8],
) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(SPEND_SIGNATURE_DOMAIN_TAG);
    // Length-prefix the context so the context/point boundary is unambiguous.
    hasher.update((context.len() as u64).to_le_bytes());
    hasher.update(context);
    hasher.update(commitment.as_bytes());
    hasher.update(public.as_bytes());
    hasher.update(message);
    Scalar::from_hash(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = SpendPrivate::from_random(&mut OsRng);
        let sig = Signature::sign(&key, b"test_context", b"hello", &mut OsRng);

        assert!(sig.verify(&key.public(), b"test_context", b"hello").is_ok());
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = SpendPrivate::from_random(&mut OsRng);
        let other = SpendPrivate::from_random(&mut OsRng);
        let sig = Signature::sign(&key, b"test_context", b"hello", &mut OsRng);

        assert_eq!(
            sig.verify(&other.public(), b"test_context", b"hello"),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_context_fails() {
        let key = SpendPrivate::from_random(&mut OsRng);
        let sig = Signature::sign(&key, b"test_context", b"hello", &mut OsRng);

        assert_eq!(
            sig.verify(&key.public(), b"other_context", b"hello"),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_message_fails() {
        let key = SpendPrivate::from_random(&mut OsRng);
        let sig = Signature::sign(&key, b"test_context", b"hello", &mut OsRng);

        assert_eq!(
            sig.verify(&key.public(), b"test_context", b"goodbye"),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_response_fails() {
        let key = SpendPrivate::from_random(&mut OsRng);
        let mut sig = Signature::sign(&key, b"test_context", b"hello", &mut OsRng);
        sig.response += Scalar::ONE;

        assert_eq!(
            sig.verify(&key.public(), b"test_context", b"hello"),
            Err(Error::InvalidSignature)
        );
    }
}
