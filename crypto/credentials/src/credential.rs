// Copyright (c) 2026 Swirl Foundation

//! Credential secrets and their randomized wire presentation.

use crate::{
    generators::{mac_base, Generators},
    Error,
};
use curve25519_dalek::{ristretto::CompressedRistretto, ristretto::RistrettoPoint, scalar::Scalar};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential held by the client.
///
/// The issuer saw only the attribute commitment `Ma = v * Gg + r * Gh`; the
/// opening `(v, r)` and the MAC `(t, V)` together are the spendable secret.
/// `r` doubles as the serial-number preimage, which is why a credential can
/// be presented only once.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// The committed value (amount in sats, or weight units).
    pub value: u64,

    /// Pedersen commitment randomness; serial-number preimage.
    pub randomness: Scalar,

    /// MAC nonce scalar.
    pub t: Scalar,

    /// MAC tag point `V`.
    pub mac: RistrettoPoint,
}

impl Credential {
    /// The attribute commitment `Ma = v * Gg + r * Gh`.
    pub(crate) fn attribute(&self, gens: &Generators) -> RistrettoPoint {
        Scalar::from(self.value) * gens.gg + self.randomness * gens.gh
    }

    /// Randomize for presentation.
    ///
    /// Also returns the opening the request proof needs. The serial number
    /// `S = r * Gs` is deterministic per credential; everything else is
    /// freshly blinded by `z`.
    pub(crate) fn present<R: RngCore + CryptoRng>(
        &self,
        gens: &Generators,
        rng: &mut R,
    ) -> (Presentation, PresentationOpening) {
        let z = Scalar::random(rng);
        let u = mac_base(&self.t);

        let presentation = Presentation {
            ca: (self.attribute(gens) + z * gens.ga).compress(),
            cx0: (u + z * gens.gx0).compress(),
            cx1: (self.t * u + z * gens.gx1).compress(),
            cv: (self.mac + z * gens.gv).compress(),
            serial: (self.randomness * gens.gs).compress(),
        };
        let opening = PresentationOpening {
            value: self.value,
            randomness: self.randomness,
            z,
        };

        (presentation, opening)
    }
}

/// The wire form of a presented credential.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Presentation {
    /// Randomized attribute commitment `Ca = Ma + z * Ga`.
    pub ca: CompressedRistretto,

    /// Randomized MAC base `Cx0 = U + z * Gx0`.
    pub cx0: CompressedRistretto,

    /// Randomized scaled MAC base `Cx1 = t * U + z * Gx1`.
    pub cx1: CompressedRistretto,

    /// Randomized MAC tag `Cv = V + z * Gv`.
    pub cv: CompressedRistretto,

    /// Serial number `S = r * Gs`; single-use.
    pub serial: CompressedRistretto,
}

impl Presentation {
    /// Decompress all points.
    pub(crate) fn decompress(&self) -> Result<DecompressedPresentation, Error> {
        Ok(DecompressedPresentation {
            ca: self.ca.decompress().ok_or(Error::InvalidCurvePoint)?,
            cx0: self.cx0.decompress().ok_or(Error::InvalidCurvePoint)?,
            cx1: self.cx1.decompress().ok_or(Error::InvalidCurvePoint)?,
            cv: self.cv.decompress().ok_or(Error::InvalidCurvePoint)?,
            serial: self.serial.decompress().ok_or(Error::InvalidCurvePoint)?,
        })
    }
}

/// A presentation with all points decompressed, ready for verification.
pub(crate) struct DecompressedPresentation {
    pub ca: RistrettoPoint,
    pub cx0: RistrettoPoint,
    pub cx1: RistrettoPoint,
    pub cv: RistrettoPoint,
    pub serial: RistrettoPoint,
}

/// The client-side secrets behind one presentation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct PresentationOpening {
    /// The committed value.
    pub value: u64,

    /// Pedersen commitment randomness.
    pub randomness: Scalar,

    /// The presentation's randomizer.
    pub z: Scalar,
}

/// The opening of a requested, not-yet-issued credential.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct CredentialOpening {
    /// The committed value.
    pub value: u64,

    /// Pedersen commitment randomness.
    pub randomness: Scalar,
}

impl CredentialOpening {
    /// Draw a fresh opening for `value`.
    pub fn new<R: RngCore + CryptoRng>(value: u64, rng: &mut R) -> Self {
        Self {
            value,
            randomness: Scalar::random(rng),
        }
    }

    /// The attribute commitment `Ma = v * Gg + r * Gh`.
    pub fn attribute(&self, gens: &Generators) -> RistrettoPoint {
        Scalar::from(self.value) * gens.gg + self.randomness * gens.gh
    }
}
