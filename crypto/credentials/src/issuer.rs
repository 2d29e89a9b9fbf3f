// Copyright (c) 2026 Swirl Foundation

//! The issuing side of the credential scheme.
//!
//! A coordinator holds one [`IssuerSecret`] per credential kind per round and
//! publishes the matching [`IssuerParams`] in the round parameters. The
//! stateful [`Issuer`] wraps the secret together with the serial numbers it
//! has accepted, which is all the state credential verification needs.

use crate::{
    credential::DecompressedPresentation,
    generators::{mac_base, Generators},
    proofs, range,
    request::{CredentialRequest, CredentialResponse, IssuedCredential, CREDENTIAL_SET_SIZE},
    Error,
};
use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The issuer's MAC key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IssuerSecret {
    pub(crate) w: Scalar,
    pub(crate) wp: Scalar,
    pub(crate) x0: Scalar,
    pub(crate) x1: Scalar,
    pub(crate) ya: Scalar,
}

impl IssuerSecret {
    /// Generate a fresh MAC key.
    pub fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            w: Scalar::random(rng),
            wp: Scalar::random(rng),
            x0: Scalar::random(rng),
            x1: Scalar::random(rng),
            ya: Scalar::random(rng),
        }
    }

    /// The public parameters clients verify issuance against.
    pub(crate) fn params(&self, gens: &Generators) -> IssuerParams {
        IssuerParams {
            cw: self.w * gens.gw + self.wp * gens.gwp,
            i: gens.gv - (self.x0 * gens.gx0 + self.x1 * gens.gx1 + self.ya * gens.ga),
        }
    }

    /// MAC the attribute commitment `ma`.
    fn mac<R: RngCore + CryptoRng>(
        &self,
        gens: &Generators,
        ma: &RistrettoPoint,
        rng: &mut R,
    ) -> (Scalar, RistrettoPoint) {
        let t = Scalar::random(rng);
        let u = mac_base(&t);
        let v = self.w * gens.gw + self.x0 * u + self.x1 * (t * u) + self.ya * ma;
        (t, v)
    }

    /// The MAC validity point for a presentation:
    /// `Z = Cv - w * Gw - x0 * Cx0 - x1 * Cx1 - ya * Ca`.
    ///
    /// Equal to `z * I` exactly when the presented credential carries a valid
    /// MAC under this key, which is what the request proof's `Z` row checks.
    fn validity_point(&self, gens: &Generators, presentation: &DecompressedPresentation) -> RistrettoPoint {
        presentation.cv
            - self.w * gens.gw
            - self.x0 * presentation.cx0
            - self.x1 * presentation.cx1
            - self.ya * presentation.ca
    }
}

/// Public issuer parameters, published per round and per credential kind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IssuerParams {
    /// Commitment `Cw = w * Gw + wp * Gwp` to the MAC key's `w` half.
    pub cw: RistrettoPoint,

    /// `I = Gv - x0 * Gx0 - x1 * Gx1 - ya * Ga`, the public image of the
    /// MAC key's `x`/`y` half.
    pub i: RistrettoPoint,
}

/// A stateful credential issuer for one round and one credential kind.
pub struct Issuer {
    secret: IssuerSecret,
    params: IssuerParams,
    gens: Generators,
    seen_serials: HashSet<[u8; 32]>,
}

impl Issuer {
    /// Create an issuer from an existing secret.
    pub fn new(secret: IssuerSecret) -> Self {
        let gens = Generators::new();
        let params = secret.params(&gens);
        Self {
            secret,
            params,
            gens,
            seen_serials: HashSet::new(),
        }
    }

    /// Create an issuer with a fresh random key.
    pub fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::new(IssuerSecret::from_random(rng))
    }

    /// The public parameters for this issuer.
    pub fn params(&self) -> IssuerParams {
        self.params
    }

    /// Verify a credential request and, when valid, issue the requested
    /// credentials.
    ///
    /// The caller decides whether `request.delta` is acceptable for the
    /// operation at hand (registration value, zero for a reissue, negative
    /// target for a presentation); this method checks everything
    /// cryptographic: the request proof, the range proof, MAC validity of
    /// every presented credential, and serial-number freshness. Serials are
    /// recorded only after every check passes.
    pub fn process<R: RngCore + CryptoRng>(
        &mut self,
        request: &CredentialRequest,
        rng: &mut R,
    ) -> Result<CredentialResponse, Error> {
        if request.requested.len() != CREDENTIAL_SET_SIZE {
            return Err(Error::WrongRequestSize(
                request.requested.len(),
                CREDENTIAL_SET_SIZE,
            ));
        }
        if request.presentations.len() > CREDENTIAL_SET_SIZE {
            return Err(Error::TooManyPresentations(
                request.presentations.len(),
                CREDENTIAL_SET_SIZE,
            ));
        }

        // Serial freshness, including duplicates within this request.
        let mut serials: Vec<[u8; 32]> = Vec::with_capacity(request.presentations.len());
        for presentation in &request.presentations {
            let serial = presentation.serial.to_bytes();
            if self.seen_serials.contains(&serial) || serials.contains(&serial) {
                return Err(Error::SerialNumberReused);
            }
            serials.push(serial);
        }

        let decompressed: Vec<DecompressedPresentation> = request
            .presentations
            .iter()
            .map(|p| p.decompress())
            .collect::<Result<_, _>>()?;
        let zs: Vec<RistrettoPoint> = decompressed
            .iter()
            .map(|p| self.secret.validity_point(&self.gens, p))
            .collect();

        proofs::verify_request(
            &self.gens,
            &self.params,
            &request.presentations,
            &decompressed,
            &zs,
            &request.requested,
            request.delta,
            &request.proof,
        )?;
        range::verify_commitments(&request.range_proof, &request.requested, rng)?;

        self.seen_serials.extend(serials);

        let issued = request
            .requested
            .iter()
            .map(|ma_compressed| {
                let ma = ma_compressed
                    .decompress()
                    .ok_or(Error::InvalidCurvePoint)?;
                let (t, v) = self.secret.mac(&self.gens, &ma, rng);
                let proof = proofs::prove_issuance(
                    &self.gens,
                    &self.secret,
                    &self.params,
                    &t,
                    &ma,
                    &v,
                    rng,
                );
                Ok(IssuedCredential {
                    t,
                    mac: v.compress(),
                    proof,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(CredentialResponse { issued })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientSession;
    use rand_core::OsRng;

    #[test]
    fn test_process_rejects_wrong_request_size() {
        let mut issuer = Issuer::from_random(&mut OsRng);
        let mut session = ClientSession::new(issuer.params());
        let mut request = session
            .request_initial(1000, &mut OsRng)
            .expect("initial request");
        request.requested.pop();

        assert_eq!(
            issuer.process(&request, &mut OsRng),
            Err(Error::WrongRequestSize(1, CREDENTIAL_SET_SIZE))
        );
    }

    #[test]
    fn test_process_rejects_replayed_serials() {
        let mut issuer = Issuer::from_random(&mut OsRng);

        let mut session = ClientSession::new(issuer.params());
        let request = session
            .request_initial(1000, &mut OsRng)
            .expect("initial request");
        let response = issuer.process(&request, &mut OsRng).expect("issuance");
        session.absorb(&response).expect("absorb");

        let reissue = session
            .request_reissue(&[600, 400], &mut OsRng)
            .expect("reissue request");
        let response = issuer.process(&reissue, &mut OsRng).expect("reissue");
        session.absorb(&response).expect("absorb");

        // Replaying the spent request presents already-seen serials.
        assert_eq!(
            issuer.process(&reissue, &mut OsRng),
            Err(Error::SerialNumberReused)
        );
    }

    #[test]
    fn test_process_rejects_tampered_proof() {
        let mut issuer = Issuer::from_random(&mut OsRng);
        let mut session = ClientSession::new(issuer.params());
        let mut request = session
            .request_initial(1000, &mut OsRng)
            .expect("initial request");
        request.delta = 999;

        assert_eq!(
            issuer.process(&request, &mut OsRng),
            Err(Error::InvalidRequestProof)
        );
    }

    #[test]
    fn test_params_stable_for_same_secret() {
        let secret = IssuerSecret::from_random(&mut OsRng);
        let a = Issuer::new(secret.clone());
        let b = Issuer::new(secret);
        assert_eq!(a.params(), b.params());
    }
}
