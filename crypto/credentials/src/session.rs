// Copyright (c) 2026 Swirl Foundation

//! Client-side credential session for one round and one credential kind.
//!
//! A session owns the credentials issued to this client and never lets their
//! total drift from the public deltas it has requested: every request either
//! balances exactly or is refused before anything reaches the wire. Sessions
//! are created per round from the round's issuer parameters and dropped with
//! the round, so credentials cannot leak across rounds.

use crate::{
    credential::{Credential, CredentialOpening, Presentation, PresentationOpening},
    generators::Generators,
    proofs, range,
    request::{CredentialRequest, CredentialResponse, CREDENTIAL_SET_SIZE},
    Error, IssuerParams,
};
use rand_core::{CryptoRng, RngCore};

/// The secrets behind an in-flight request.
struct PendingIssuance {
    /// The request, kept for transport-level retries.
    request: CredentialRequest,

    /// Openings of the requested commitments, index-aligned with
    /// `request.requested`.
    openings: Vec<CredentialOpening>,
}

/// Client-side credential state for one kind (amount or weight).
pub struct ClientSession {
    params: IssuerParams,
    gens: Generators,
    held: Vec<Credential>,
    issued_once: bool,
    pending: Option<PendingIssuance>,
}

impl ClientSession {
    /// Create a session against one issuer's published parameters.
    pub fn new(params: IssuerParams) -> Self {
        Self {
            params,
            gens: Generators::new(),
            held: Vec::new(),
            issued_once: false,
            pending: None,
        }
    }

    /// Total value currently held.
    pub fn total(&self) -> u64 {
        self.held.iter().map(|c| c.value).sum()
    }

    /// The in-flight request, if any. Resubmit this on transport failures
    /// rather than building a new request.
    pub fn pending_request(&self) -> Option<&CredentialRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    /// Build the one-time initial request: no presentations, the full
    /// registered value as a positive delta.
    pub fn request_initial<R: RngCore + CryptoRng>(
        &mut self,
        value: u64,
        rng: &mut R,
    ) -> Result<CredentialRequest, Error> {
        if self.pending.is_some() {
            return Err(Error::RequestPending);
        }
        if self.issued_once || !self.held.is_empty() {
            return Err(Error::AlreadyIssued);
        }
        let delta = i64::try_from(value).map_err(|_e| Error::ValueOverflow)?;

        self.build_request(Vec::new(), vec![value, 0], delta, rng)
    }

    /// Build a reissuance: spend everything held, request `split` (padded
    /// with zero credentials), zero delta.
    ///
    /// Used both as the connection-confirmation keep-alive (`split` equal to
    /// the held values) and to cut denominations before output registration.
    pub fn request_reissue<R: RngCore + CryptoRng>(
        &mut self,
        split: &[u64],
        rng: &mut R,
    ) -> Result<CredentialRequest, Error> {
        if self.pending.is_some() {
            return Err(Error::RequestPending);
        }
        if self.held.is_empty() {
            return Err(Error::NothingHeld);
        }
        if split.len() > CREDENTIAL_SET_SIZE {
            return Err(Error::WrongRequestSize(split.len(), CREDENTIAL_SET_SIZE));
        }

        let split_total = split
            .iter()
            .try_fold(0u64, |acc, v| acc.checked_add(*v))
            .ok_or(Error::ValueOverflow)?;
        if split_total != self.total() {
            return Err(Error::ValueNotConserved);
        }

        let mut values = split.to_vec();
        values.resize(CREDENTIAL_SET_SIZE, 0);

        let (presentations, openings) = self.present_all(rng);
        self.build_presented_request(presentations, openings, values, 0, rng)
    }

    /// Build a presentation: spend everything held, withdraw `target` as a
    /// negative delta, request the change.
    ///
    /// Used at output registration, where the withdrawn value backs the
    /// output being registered.
    pub fn request_presentation<R: RngCore + CryptoRng>(
        &mut self,
        target: u64,
        rng: &mut R,
    ) -> Result<CredentialRequest, Error> {
        if self.pending.is_some() {
            return Err(Error::RequestPending);
        }
        if self.held.is_empty() {
            return Err(Error::NothingHeld);
        }
        let total = self.total();
        if total < target {
            return Err(Error::InsufficientValue(target, total));
        }
        let delta = -i64::try_from(target).map_err(|_e| Error::ValueOverflow)?;

        let (presentations, openings) = self.present_all(rng);
        self.build_presented_request(presentations, openings, vec![total - target, 0], delta, rng)
    }

    /// Verify an issuance response and replace the held credentials.
    ///
    /// Nothing is mutated unless every issuance proof verifies.
    pub fn absorb(&mut self, response: &CredentialResponse) -> Result<(), Error> {
        let pending = self.pending.as_ref().ok_or(Error::NoPendingRequest)?;
        if response.issued.len() != CREDENTIAL_SET_SIZE {
            return Err(Error::WrongResponseSize(
                response.issued.len(),
                CREDENTIAL_SET_SIZE,
            ));
        }

        let mut fresh = Vec::with_capacity(CREDENTIAL_SET_SIZE);
        for (issued, opening) in response.issued.iter().zip(&pending.openings) {
            let ma = opening.attribute(&self.gens);
            let mac = issued.mac.decompress().ok_or(Error::InvalidCurvePoint)?;
            proofs::verify_issuance(&self.gens, &self.params, &issued.t, &ma, &mac, &issued.proof)?;

            fresh.push(Credential {
                value: opening.value,
                randomness: opening.randomness,
                t: issued.t,
                mac,
            });
        }

        self.held = fresh;
        self.pending = None;
        self.issued_once = true;
        Ok(())
    }

    /// Randomize every held credential for presentation.
    fn present_all<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> (Vec<Presentation>, Vec<PresentationOpening>) {
        self.held
            .iter()
            .map(|c| c.present(&self.gens, rng))
            .unzip()
    }

    fn build_request<R: RngCore + CryptoRng>(
        &mut self,
        presentations: Vec<Presentation>,
        values: Vec<u64>,
        delta: i64,
        rng: &mut R,
    ) -> Result<CredentialRequest, Error> {
        self.build_presented_request(presentations, Vec::new(), values, delta, rng)
    }

    fn build_presented_request<R: RngCore + CryptoRng>(
        &mut self,
        presentations: Vec<Presentation>,
        presented_openings: Vec<PresentationOpening>,
        values: Vec<u64>,
        delta: i64,
        rng: &mut R,
    ) -> Result<CredentialRequest, Error> {
        let requested_openings: Vec<CredentialOpening> = values
            .iter()
            .map(|value| CredentialOpening::new(*value, rng))
            .collect();
        let blindings: Vec<_> = requested_openings.iter().map(|o| o.randomness).collect();

        let (range_proof, requested) = range::prove_values(&values, &blindings, rng)?;
        let proof = proofs::prove_request(
            &self.gens,
            &self.params,
            &presentations,
            &presented_openings,
            &requested,
            &requested_openings,
            delta,
            rng,
        );

        let request = CredentialRequest {
            presentations,
            requested,
            delta,
            range_proof,
            proof,
        };
        self.pending = Some(PendingIssuance {
            request: request.clone(),
            openings: requested_openings,
        });

        Ok(request)
    }
}
