// Copyright (c) 2026 Swirl Foundation

//! Zero-knowledge proofs for credential requests and issuance.
//!
//! Both proofs are multi-statement Schnorr proofs sharing one Fiat-Shamir
//! challenge across all statements, with one response scalar per witness.
//!
//! The request proof covers, for a request presenting credentials
//! `1..m` and asking for fresh commitments `1..k` with public delta `d`:
//!
//! ```text
//! Z_i  = z_i * I                          (MAC validity, Z computed by issuer)
//! Ca_i = v_i * Gg + r_i * Gh + z_i * Ga   (randomized attribute opening)
//! S_i  = r_i * Gs                         (serial matches the attribute)
//! Ma_j = v'_j * Gg + r'_j * Gh            (requested attribute opening)
//! B    = rd * Gh + zd * Ga                (balance)
//! ```
//!
//! where `B = sum(Ca_i) + d * Gg - sum(Ma_j)` and the balance statement is
//! checked against the aggregated responses `rd = sum(r_i) - sum(r'_j)`,
//! `zd = sum(z_i)`. A prover can satisfy it only when
//! `sum(v_i) + d = sum(v'_j)`, since any residue sits on `Gg`, which is
//! outside the span a response can cover.
//!
//! The issuance proof shows the issuer MACed with the key committed in its
//! published parameters, which stops a malicious issuer from tagging clients
//! with per-client keys.

use crate::{
    credential::{CredentialOpening, DecompressedPresentation, Presentation, PresentationOpening},
    domain_separators::{ISSUANCE_CHALLENGE_DOMAIN_TAG, REQUEST_CHALLENGE_DOMAIN_TAG},
    generators::{mac_base, Generators},
    issuer::{IssuerParams, IssuerSecret},
    Error,
};
use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Proof material for one presented credential.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PresentedPart {
    /// Statement commitment for the `Z = z * I` row.
    pub z_commitment: CompressedRistretto,

    /// Statement commitment for the `Ca` opening row.
    pub attribute_commitment: CompressedRistretto,

    /// Statement commitment for the serial row.
    pub serial_commitment: CompressedRistretto,

    /// Response for the randomizer `z`.
    pub z_response: Scalar,

    /// Response for the value `v`.
    pub value_response: Scalar,

    /// Response for the randomness `r`.
    pub randomness_response: Scalar,
}

/// Proof material for one requested credential.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RequestedPart {
    /// Statement commitment for the `Ma` opening row.
    pub attribute_commitment: CompressedRistretto,

    /// Response for the value `v'`.
    pub value_response: Scalar,

    /// Response for the randomness `r'`.
    pub randomness_response: Scalar,
}

/// Knowledge-and-balance proof over a whole credential request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RequestProof {
    /// One part per presented credential.
    pub presented: Vec<PresentedPart>,

    /// One part per requested credential.
    pub requested: Vec<RequestedPart>,

    /// Statement commitment for the balance row.
    pub balance_commitment: CompressedRistretto,
}

/// Build the request proof.
///
/// `presentations`/`openings` and `requested`/`requested_openings` must be
/// index-aligned; callers in this crate construct them together.
#[allow(clippy::too_many_arguments)]
pub(crate) fn prove_request<R: RngCore + CryptoRng>(
    gens: &Generators,
    params: &IssuerParams,
    presentations: &[Presentation],
    openings: &[PresentationOpening],
    requested: &[CompressedRistretto],
    requested_openings: &[CredentialOpening],
    delta: i64,
    rng: &mut R,
) -> RequestProof {
    debug_assert_eq!(presentations.len(), openings.len());
    debug_assert_eq!(requested.len(), requested_openings.len());

    // Nonces, one per witness.
    let z_nonces: Vec<Scalar> = openings.iter().map(|_| Scalar::random(rng)).collect();
    let v_nonces: Vec<Scalar> = openings.iter().map(|_| Scalar::random(rng)).collect();
    let r_nonces: Vec<Scalar> = openings.iter().map(|_| Scalar::random(rng)).collect();
    let rv_nonces: Vec<Scalar> = requested_openings
        .iter()
        .map(|_| Scalar::random(rng))
        .collect();
    let rr_nonces: Vec<Scalar> = requested_openings
        .iter()
        .map(|_| Scalar::random(rng))
        .collect();

    // Statement commitments.
    let mut presented_commitments = Vec::with_capacity(openings.len());
    for i in 0..openings.len() {
        presented_commitments.push([
            (z_nonces[i] * params.i).compress(),
            (v_nonces[i] * gens.gg + r_nonces[i] * gens.gh + z_nonces[i] * gens.ga).compress(),
            (r_nonces[i] * gens.gs).compress(),
        ]);
    }
    let requested_commitments: Vec<CompressedRistretto> = (0..requested_openings.len())
        .map(|j| (rv_nonces[j] * gens.gg + rr_nonces[j] * gens.gh).compress())
        .collect();

    let r_nonce_sum: Scalar = r_nonces.iter().sum();
    let rr_nonce_sum: Scalar = rr_nonces.iter().sum();
    let z_nonce_sum: Scalar = z_nonces.iter().sum();
    let balance_commitment =
        ((r_nonce_sum - rr_nonce_sum) * gens.gh + z_nonce_sum * gens.ga).compress();

    // The MAC validity points, computable from the client's own randomizers.
    let zs: Vec<CompressedRistretto> = openings
        .iter()
        .map(|o| (o.z * params.i).compress())
        .collect();

    let challenge = request_challenge(
        params,
        presentations,
        &zs,
        requested,
        delta,
        &presented_commitments,
        &requested_commitments,
        &balance_commitment,
    );

    let presented = (0..openings.len())
        .map(|i| PresentedPart {
            z_commitment: presented_commitments[i][0],
            attribute_commitment: presented_commitments[i][1],
            serial_commitment: presented_commitments[i][2],
            z_response: z_nonces[i] + challenge * openings[i].z,
            value_response: v_nonces[i] + challenge * Scalar::from(openings[i].value),
            randomness_response: r_nonces[i] + challenge * openings[i].randomness,
        })
        .collect();
    let requested_parts = (0..requested_openings.len())
        .map(|j| RequestedPart {
            attribute_commitment: requested_commitments[j],
            value_response: rv_nonces[j] + challenge * Scalar::from(requested_openings[j].value),
            randomness_response: rr_nonces[j] + challenge * requested_openings[j].randomness,
        })
        .collect();

    RequestProof {
        presented,
        requested: requested_parts,
        balance_commitment,
    }
}

/// Verify a request proof.
///
/// `zs` are the per-presentation MAC validity points `Z = Cv - w * Gw -
/// x0 * Cx0 - x1 * Cx1 - ya * Ca`, computed by the issuer from its secret.
#[allow(clippy::too_many_arguments)]
pub(crate) fn verify_request(
    gens: &Generators,
    params: &IssuerParams,
    presentations: &[Presentation],
    decompressed: &[DecompressedPresentation],
    zs: &[RistrettoPoint],
    requested: &[CompressedRistretto],
    delta: i64,
    proof: &RequestProof,
) -> Result<(), Error> {
    if proof.presented.len() != presentations.len() || proof.requested.len() != requested.len() {
        return Err(Error::InvalidRequestProof);
    }

    let requested_points: Vec<RistrettoPoint> = requested
        .iter()
        .map(|ma| ma.decompress().ok_or(Error::InvalidCurvePoint))
        .collect::<Result<_, _>>()?;

    let zs_compressed: Vec<CompressedRistretto> = zs.iter().map(|z| z.compress()).collect();
    let presented_commitments: Vec<[CompressedRistretto; 3]> = proof
        .presented
        .iter()
        .map(|part| {
            [
                part.z_commitment,
                part.attribute_commitment,
                part.serial_commitment,
            ]
        })
        .collect();
    let requested_commitments: Vec<CompressedRistretto> = proof
        .requested
        .iter()
        .map(|part| part.attribute_commitment)
        .collect();

    let challenge = request_challenge(
        params,
        presentations,
        &zs_compressed,
        requested,
        delta,
        &presented_commitments,
        &requested_commitments,
        &proof.balance_commitment,
    );

    for (i, part) in proof.presented.iter().enumerate() {
        let z_commitment = part
            .z_commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;
        let attribute_commitment = part
            .attribute_commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;
        let serial_commitment = part
            .serial_commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;

        if part.z_response * params.i != z_commitment + challenge * zs[i] {
            return Err(Error::InvalidRequestProof);
        }
        if part.value_response * gens.gg
            + part.randomness_response * gens.gh
            + part.z_response * gens.ga
            != attribute_commitment + challenge * decompressed[i].ca
        {
            return Err(Error::InvalidRequestProof);
        }
        if part.randomness_response * gens.gs
            != serial_commitment + challenge * decompressed[i].serial
        {
            return Err(Error::InvalidRequestProof);
        }
    }

    for (j, part) in proof.requested.iter().enumerate() {
        let attribute_commitment = part
            .attribute_commitment
            .decompress()
            .ok_or(Error::InvalidCurvePoint)?;

        if part.value_response * gens.gg + part.randomness_response * gens.gh
            != attribute_commitment + challenge * requested_points[j]
        {
            return Err(Error::InvalidRequestProof);
        }
    }

    // Balance row against aggregated responses.
    let balance_commitment = proof
        .balance_commitment
        .decompress()
        .ok_or(Error::InvalidCurvePoint)?;
    let presented_sum: RistrettoPoint = decompressed.iter().map(|p| p.ca).sum();
    let requested_sum: RistrettoPoint = requested_points.iter().sum();
    let balance_point = presented_sum + delta_scalar(delta) * gens.gg - requested_sum;

    let randomness_response_sum: Scalar = proof
        .presented
        .iter()
        .map(|p| p.randomness_response)
        .sum::<Scalar>()
        - proof
            .requested
            .iter()
            .map(|p| p.randomness_response)
            .sum::<Scalar>();
    let z_response_sum: Scalar = proof.presented.iter().map(|p| p.z_response).sum();

    if randomness_response_sum * gens.gh + z_response_sum * gens.ga
        != balance_commitment + challenge * balance_point
    {
        return Err(Error::InvalidRequestProof);
    }

    Ok(())
}

/// Map a signed public delta onto the scalar field.
fn delta_scalar(delta: i64) -> Scalar {
    if delta >= 0 {
        Scalar::from(delta as u64)
    } else {
        -Scalar::from(delta.unsigned_abs())
    }
}

#[allow(clippy::too_many_arguments)]
fn request_challenge(
    params: &IssuerParams,
    presentations: &[Presentation],
    zs: &[CompressedRistretto],
    requested: &[CompressedRistretto],
    delta: i64,
    presented_commitments: &[[CompressedRistretto; 3]],
    requested_commitments: &[CompressedRistretto],
    balance_commitment: &CompressedRistretto,
) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(REQUEST_CHALLENGE_DOMAIN_TAG);
    hasher.update(params.cw.compress().as_bytes());
    hasher.update(params.i.compress().as_bytes());

    hasher.update((presentations.len() as u64).to_le_bytes());
    for (presentation, z) in presentations.iter().zip(zs) {
        hasher.update(presentation.ca.as_bytes());
        hasher.update(presentation.cx0.as_bytes());
        hasher.update(presentation.cx1.as_bytes());
        hasher.update(presentation.cv.as_bytes());
        hasher.update(presentation.serial.as_bytes());
        hasher.update(z.as_bytes());
    }

    hasher.update((requested.len() as u64).to_le_bytes());
    for ma in requested {
        hasher.update(ma.as_bytes());
    }
    hasher.update(delta.to_le_bytes());

    for [z_commitment, attribute_commitment, serial_commitment] in presented_commitments {
        hasher.update(z_commitment.as_bytes());
        hasher.update(attribute_commitment.as_bytes());
        hasher.update(serial_commitment.as_bytes());
    }
    for commitment in requested_commitments {
        hasher.update(commitment.as_bytes());
    }
    hasher.update(balance_commitment.as_bytes());

    Scalar::from_hash(hasher)
}

/// Proof that a MAC was issued with the key behind the published issuer
/// parameters.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IssuanceProof {
    /// Statement commitment for the `Cw` row.
    pub w_commitment: CompressedRistretto,

    /// Statement commitment for the `Gv - I` row.
    pub x_commitment: CompressedRistretto,

    /// Statement commitment for the MAC equation row.
    pub v_commitment: CompressedRistretto,

    /// Response for `w`.
    pub w_response: Scalar,

    /// Response for `wp`.
    pub wp_response: Scalar,

    /// Response for `x0`.
    pub x0_response: Scalar,

    /// Response for `x1`.
    pub x1_response: Scalar,

    /// Response for `ya`.
    pub ya_response: Scalar,
}

/// Prove correct issuance of the MAC `(t, V)` over attribute `Ma`.
pub(crate) fn prove_issuance<R: RngCore + CryptoRng>(
    gens: &Generators,
    secret: &IssuerSecret,
    params: &IssuerParams,
    t: &Scalar,
    ma: &RistrettoPoint,
    v: &RistrettoPoint,
    rng: &mut R,
) -> IssuanceProof {
    let u = mac_base(t);
    let ut = t * u;

    let w_nonce = Scalar::random(rng);
    let wp_nonce = Scalar::random(rng);
    let x0_nonce = Scalar::random(rng);
    let x1_nonce = Scalar::random(rng);
    let ya_nonce = Scalar::random(rng);

    let w_commitment = (w_nonce * gens.gw + wp_nonce * gens.gwp).compress();
    let x_commitment = (x0_nonce * gens.gx0 + x1_nonce * gens.gx1 + ya_nonce * gens.ga).compress();
    let v_commitment =
        (w_nonce * gens.gw + x0_nonce * u + x1_nonce * ut + ya_nonce * ma).compress();

    let challenge = issuance_challenge(
        params,
        t,
        &u.compress(),
        &ma.compress(),
        &v.compress(),
        &w_commitment,
        &x_commitment,
        &v_commitment,
    );

    IssuanceProof {
        w_commitment,
        x_commitment,
        v_commitment,
        w_response: w_nonce + challenge * secret.w,
        wp_response: wp_nonce + challenge * secret.wp,
        x0_response: x0_nonce + challenge * secret.x0,
        x1_response: x1_nonce + challenge * secret.x1,
        ya_response: ya_nonce + challenge * secret.ya,
    }
}

/// Verify an issuance proof against the published issuer parameters.
pub(crate) fn verify_issuance(
    gens: &Generators,
    params: &IssuerParams,
    t: &Scalar,
    ma: &RistrettoPoint,
    v: &RistrettoPoint,
    proof: &IssuanceProof,
) -> Result<(), Error> {
    let u = mac_base(t);
    let ut = t * u;

    let challenge = issuance_challenge(
        params,
        t,
        &u.compress(),
        &ma.compress(),
        &v.compress(),
        &proof.w_commitment,
        &proof.x_commitment,
        &proof.v_commitment,
    );

    let w_commitment = proof
        .w_commitment
        .decompress()
        .ok_or(Error::InvalidCurvePoint)?;
    let x_commitment = proof
        .x_commitment
        .decompress()
        .ok_or(Error::InvalidCurvePoint)?;
    let v_commitment = proof
        .v_commitment
        .decompress()
        .ok_or(Error::InvalidCurvePoint)?;

    if proof.w_response * gens.gw + proof.wp_response * gens.gwp
        != w_commitment + challenge * params.cw
    {
        return Err(Error::InvalidIssuanceProof);
    }
    if proof.x0_response * gens.gx0 + proof.x1_response * gens.gx1 + proof.ya_response * gens.ga
        != x_commitment + challenge * (gens.gv - params.i)
    {
        return Err(Error::InvalidIssuanceProof);
    }
    if proof.w_response * gens.gw
        + proof.x0_response * u
        + proof.x1_response * ut
        + proof.ya_response * ma
        != v_commitment + challenge * v
    {
        return Err(Error::InvalidIssuanceProof);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn issuance_challenge(
    params: &IssuerParams,
    t: &Scalar,
    u: &CompressedRistretto,
    ma: &CompressedRistretto,
    v: &CompressedRistretto,
    w_commitment: &CompressedRistretto,
    x_commitment: &CompressedRistretto,
    v_commitment: &CompressedRistretto,
) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(ISSUANCE_CHALLENGE_DOMAIN_TAG);
    hasher.update(params.cw.compress().as_bytes());
    hasher.update(params.i.compress().as_bytes());
    hasher.update(t.as_bytes());
    hasher.update(u.as_bytes());
    hasher.update(ma.as_bytes());
    hasher.update(v.as_bytes());
    hasher.update(w_commitment.as_bytes());
    hasher.update(x_commitment.as_bytes());
    hasher.update(v_commitment.as_bytes());
    Scalar::from_hash(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    fn issuer() -> (IssuerSecret, IssuerParams, Generators) {
        let gens = Generators::new();
        let secret = IssuerSecret::from_random(&mut OsRng);
        let params = secret.params(&gens);
        (secret, params, gens)
    }

    #[test]
    fn test_initial_request_proof_verifies() {
        let (_secret, params, gens) = issuer();

        let openings = vec![
            CredentialOpening::new(700, &mut OsRng),
            CredentialOpening::new(300, &mut OsRng),
        ];
        let requested: Vec<CompressedRistretto> = openings
            .iter()
            .map(|o| o.attribute(&gens).compress())
            .collect();

        let proof = prove_request(&gens, &params, &[], &[], &requested, &openings, 1000, &mut OsRng);

        assert!(verify_request(&gens, &params, &[], &[], &[], &requested, 1000, &proof).is_ok());
    }

    #[test]
    fn test_unbalanced_request_proof_rejected() {
        let (_secret, params, gens) = issuer();

        let openings = vec![
            CredentialOpening::new(700, &mut OsRng),
            CredentialOpening::new(300, &mut OsRng),
        ];
        let requested: Vec<CompressedRistretto> = openings
            .iter()
            .map(|o| o.attribute(&gens).compress())
            .collect();

        // Prover claims a delta that does not match the committed values.
        let proof = prove_request(&gens, &params, &[], &[], &requested, &openings, 999, &mut OsRng);

        assert_eq!(
            verify_request(&gens, &params, &[], &[], &[], &requested, 999, &proof),
            Err(Error::InvalidRequestProof)
        );
    }

    #[test]
    fn test_request_proof_rejects_tampered_delta() {
        let (_secret, params, gens) = issuer();

        let openings = vec![
            CredentialOpening::new(500, &mut OsRng),
            CredentialOpening::new(0, &mut OsRng),
        ];
        let requested: Vec<CompressedRistretto> = openings
            .iter()
            .map(|o| o.attribute(&gens).compress())
            .collect();

        let proof = prove_request(&gens, &params, &[], &[], &requested, &openings, 500, &mut OsRng);

        // Same proof replayed under a different public delta.
        assert_eq!(
            verify_request(&gens, &params, &[], &[], &[], &requested, 400, &proof),
            Err(Error::InvalidRequestProof)
        );
    }

    #[test]
    fn test_issuance_proof_verifies() {
        let (secret, params, gens) = issuer();

        let opening = CredentialOpening::new(42, &mut OsRng);
        let ma = opening.attribute(&gens);
        let t = Scalar::random(&mut OsRng);
        let u = mac_base(&t);
        let v = secret.w * gens.gw + secret.x0 * u + secret.x1 * (t * u) + secret.ya * ma;

        let proof = prove_issuance(&gens, &secret, &params, &t, &ma, &v, &mut OsRng);
        assert!(verify_issuance(&gens, &params, &t, &ma, &v, &proof).is_ok());
    }

    #[test]
    fn test_issuance_proof_rejects_foreign_key() {
        let (secret, params, gens) = issuer();
        let (other_secret, _other_params, _) = issuer();

        let opening = CredentialOpening::new(42, &mut OsRng);
        let ma = opening.attribute(&gens);
        let t = Scalar::random(&mut OsRng);
        let u = mac_base(&t);

        // MAC with a key other than the published one.
        let v = other_secret.w * gens.gw
            + other_secret.x0 * u
            + other_secret.x1 * (t * u)
            + other_secret.ya * ma;

        let proof = prove_issuance(&gens, &other_secret, &params, &t, &ma, &v, &mut OsRng);
        assert_eq!(
            verify_issuance(&gens, &params, &t, &ma, &v, &proof),
            Err(Error::InvalidIssuanceProof)
        );
        // The honest secret cannot prove a foreign MAC either.
        let proof = prove_issuance(&gens, &secret, &params, &t, &ma, &v, &mut OsRng);
        assert_eq!(
            verify_issuance(&gens, &params, &t, &ma, &v, &proof),
            Err(Error::InvalidIssuanceProof)
        );
    }

    #[test]
    fn test_issuance_proof_rejects_tampered_response() {
        let (secret, params, gens) = issuer();

        let opening = CredentialOpening::new(7, &mut OsRng);
        let ma = opening.attribute(&gens);
        let t = Scalar::random(&mut OsRng);
        let u = mac_base(&t);
        let v = secret.w * gens.gw + secret.x0 * u + secret.x1 * (t * u) + secret.ya * ma;

        let mut proof = prove_issuance(&gens, &secret, &params, &t, &ma, &v, &mut OsRng);
        proof.ya_response += Scalar::ONE;

        assert_eq!(
            verify_issuance(&gens, &params, &t, &ma, &v, &proof),
            Err(Error::InvalidIssuanceProof)
        );
    }
}
