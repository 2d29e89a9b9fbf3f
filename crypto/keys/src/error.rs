// Copyright (c) 2026 Swirl Foundation

//! Errors which can occur when handling keys and signatures.

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// An error which can occur when parsing key material or verifying a
/// signature.
#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Error {
    /// Incorrect length for array copy, provided `{0}`, required `{1}`.
    LengthMismatch(usize, usize),

    /// Invalid curve point
    InvalidCurvePoint,

    /// Invalid private key scalar
    InvalidScalar,

    /// The signature was not able to be validated
    InvalidSignature,
}

impl std::error::Error for Error {}
