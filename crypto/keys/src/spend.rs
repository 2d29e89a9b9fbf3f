// Copyright (c) 2026 Swirl Foundation

//! Spend key pairs for pay-to-spend-key destinations.

use crate::Error;
use core::fmt;
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A private spend key.
///
/// Owned exclusively by the wallet layer; the round protocol only ever
/// borrows it to produce proofs and witnesses.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SpendPrivate(Scalar);

impl SpendPrivate {
    /// Generate a fresh spend key.
    pub fn from_random<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self(Scalar::random(rng))
    }

    /// The public half of this key.
    pub fn public(&self) -> SpendPublic {
        SpendPublic(self.0 * RISTRETTO_BASEPOINT_POINT)
    }

    /// Canonical scalar bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

impl From<Scalar> for SpendPrivate {
    fn from(src: Scalar) -> Self {
        Self(src)
    }
}

impl AsRef<Scalar> for SpendPrivate {
    fn as_ref(&self) -> &Scalar {
        &self.0
    }
}

impl From<&SpendPrivate> for SpendPublic {
    fn from(src: &SpendPrivate) -> Self {
        src.public()
    }
}

impl TryFrom<&[u8]> for SpendPrivate {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 32] = src
            .try_into()
            .map_err(|_e| Error::LengthMismatch(src.len(), 32))?;
        let scalar =
            Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes)).ok_or(Error::InvalidScalar)?;
        Ok(Self(scalar))
    }
}

// Never print the scalar, not even in debug logs.
impl fmt::Debug for SpendPrivate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpendPrivate(<redacted>)")
    }
}

/// A public spend key.
#[derive(Clone, Copy, Deserialize, Eq, PartialEq, Serialize)]
pub struct SpendPublic(RistrettoPoint);

impl SpendPublic {
    /// Compress to wire form.
    pub fn compress(&self) -> CompressedRistretto {
        self.0.compress()
    }

    /// Compressed point bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }
}

impl From<RistrettoPoint> for SpendPublic {
    fn from(src: RistrettoPoint) -> Self {
        Self(src)
    }
}

impl AsRef<RistrettoPoint> for SpendPublic {
    fn as_ref(&self) -> &RistrettoPoint {
        &self.0
    }
}

impl TryFrom<&[u8]> for SpendPublic {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Error> {
        if src.len() != 32 {
            return Err(Error::LengthMismatch(src.len(), 32));
        }
        let compressed =
            CompressedRistretto::from_slice(src).map_err(|_e| Error::InvalidCurvePoint)?;
        let point = compressed.decompress().ok_or(Error::InvalidCurvePoint)?;
        Ok(Self(point))
    }
}

impl fmt::Debug for SpendPublic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpendPublic({})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for SpendPublic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}
