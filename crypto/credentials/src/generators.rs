// Copyright (c) 2026 Swirl Foundation

//! Fixed generators for the credential scheme.
//!
//! All scheme-specific generators are derived via hash-to-curve so no
//! discrete-log relation between them is known. The value and blinding
//! generators `Gg`/`Gh` are the Bulletproof Pedersen generators, so attribute
//! commitments double as range-proof commitments without conversion.

use crate::domain_separators::{CREDENTIAL_GENERATOR_DOMAIN_TAG, MAC_BASE_DOMAIN_TAG};
use bulletproofs_og::PedersenGens;
use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use sha2::{Digest, Sha512};

/// The full generator set used by provers, verifiers and the issuer.
#[derive(Clone, Copy)]
pub(crate) struct Generators {
    /// MAC key generator for `w`.
    pub gw: RistrettoPoint,
    /// MAC key generator for `wp`.
    pub gwp: RistrettoPoint,
    /// Presentation blinding generator for `U`.
    pub gx0: RistrettoPoint,
    /// Presentation blinding generator for `t * U`.
    pub gx1: RistrettoPoint,
    /// Attribute randomization generator.
    pub ga: RistrettoPoint,
    /// MAC tag randomization generator.
    pub gv: RistrettoPoint,
    /// Serial number generator.
    pub gs: RistrettoPoint,
    /// Pedersen value generator (Bulletproof `B`).
    pub gg: RistrettoPoint,
    /// Pedersen blinding generator (Bulletproof `B_blinding`).
    pub gh: RistrettoPoint,
}

impl Generators {
    pub fn new() -> Self {
        let pedersen = PedersenGens::default();
        Self {
            gw: derive_generator(b"w"),
            gwp: derive_generator(b"wp"),
            gx0: derive_generator(b"x0"),
            gx1: derive_generator(b"x1"),
            ga: derive_generator(b"a"),
            gv: derive_generator(b"v"),
            gs: derive_generator(b"s"),
            gg: pedersen.B,
            gh: pedersen.B_blinding,
        }
    }
}

/// Derive one fixed generator by label.
fn derive_generator(label: &[u8]) -> RistrettoPoint {
    let mut hasher = Sha512::new();
    hasher.update(CREDENTIAL_GENERATOR_DOMAIN_TAG);
    hasher.update(label);
    RistrettoPoint::from_hash(hasher)
}

/// The per-MAC base `U = H(t)`.
///
/// Deriving `U` from `t` (rather than letting the issuer pick it) stops the
/// issuer from encoding a tracking tag in its choice of `U`.
pub(crate) fn mac_base(t: &Scalar) -> RistrettoPoint {
    let mut hasher = Sha512::new();
    hasher.update(MAC_BASE_DOMAIN_TAG);
    hasher.update(t.as_bytes());
    RistrettoPoint::from_hash(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generators_distinct() {
        let gens = Generators::new();
        let all = [
            gens.gw, gens.gwp, gens.gx0, gens.gx1, gens.ga, gens.gv, gens.gs, gens.gg, gens.gh,
        ];

        let unique: HashSet<[u8; 32]> = all.iter().map(|p| p.compress().to_bytes()).collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_generators_stable() {
        let a = Generators::new();
        let b = Generators::new();
        assert_eq!(a.gw, b.gw);
        assert_eq!(a.gs, b.gs);
    }

    #[test]
    fn test_mac_base_depends_on_t() {
        let a = mac_base(&Scalar::from(1u64));
        let b = mac_base(&Scalar::from(2u64));
        assert_ne!(a, b);
        assert_eq!(a, mac_base(&Scalar::from(1u64)));
    }
}
