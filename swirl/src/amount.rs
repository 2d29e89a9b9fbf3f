// Copyright (c) 2026 Swirl Foundation

//! Value, weight and fee-rate newtypes.
//!
//! All amounts are in satoshis, all weights in weight units. Arithmetic that
//! could wrap is checked; callers decide whether an overflow is a protocol
//! violation or a caller bug.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A value in satoshis.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Amount(u64);

impl Amount {
    /// Zero satoshis.
    pub const ZERO: Amount = Amount(0);

    /// Construct from satoshis.
    pub const fn from_sats(sats: u64) -> Self {
        Self(sats)
    }

    /// The raw satoshi value.
    pub const fn to_sats(self) -> u64 {
        self.0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// The absolute difference between two amounts.
    pub fn abs_diff(self, other: Amount) -> Amount {
        Amount(self.0.abs_diff(other.0))
    }

    /// Sum an iterator of amounts, failing on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, Amount::checked_add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats", self.0)
    }
}

/// A transaction weight in weight units.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Weight(u64);

impl Weight {
    /// Zero weight units.
    pub const ZERO: Weight = Weight(0);

    /// Construct from weight units.
    pub const fn from_wu(wu: u64) -> Self {
        Self(wu)
    }

    /// The raw weight-unit value.
    pub const fn to_wu(self) -> u64 {
        self.0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Weight) -> Option<Weight> {
        self.0.checked_add(other.0).map(Weight)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Weight) -> Option<Weight> {
        self.0.checked_sub(other.0).map(Weight)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wu", self.0)
    }
}

/// A fee rate in satoshis per 1000 weight units.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct FeeRate(u64);

impl FeeRate {
    /// Construct from satoshis per 1000 weight units.
    pub const fn from_sats_per_kwu(sats: u64) -> Self {
        Self(sats)
    }

    /// The raw sats-per-kwu value.
    pub const fn to_sats_per_kwu(self) -> u64 {
        self.0
    }

    /// The fee owed for `weight`, rounded up.
    pub fn fee_for(self, weight: Weight) -> Amount {
        // u128 intermediate: u64 * u64 cannot overflow here.
        let sats = (self.0 as u128 * weight.to_wu() as u128).div_ceil(1000);
        // Capped rather than wrapped; a fee above u64::MAX sats is already
        // nonsense the balance checks will refuse.
        Amount(u64::try_from(sats).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats/kwu", self.0)
    }
}
