// Copyright (c) 2026 Swirl Foundation

//! Coins and the pay-to-spend-key destination script.

use crate::amount::Amount;
use core::fmt;
use serde::{Deserialize, Serialize};
use swl_crypto_keys::SpendPublic;

/// A reference to an unspent transaction output.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct OutPoint {
    /// Transaction id of the funding transaction.
    pub txid: [u8; 32],

    /// Output index within that transaction.
    pub index: u32,
}

impl OutPoint {
    /// Construct from a txid and output index.
    pub const fn new(txid: [u8; 32], index: u32) -> Self {
        Self { txid, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.txid), self.index)
    }
}

/// A destination script.
///
/// Swirl destinations are pay-to-spend-key: the script is the compressed
/// Ristretto spend public key.
#[derive(
    Clone, Copy, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct ScriptPubkey([u8; 32]);

impl ScriptPubkey {
    /// The raw script bytes.
    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// The raw script bytes, borrowed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The spend public key this script pays to.
    pub fn spend_public(&self) -> Result<SpendPublic, swl_crypto_keys::Error> {
        SpendPublic::try_from(&self.0[..])
    }
}

impl From<&SpendPublic> for ScriptPubkey {
    fn from(src: &SpendPublic) -> Self {
        Self(src.to_bytes())
    }
}

impl From<[u8; 32]> for ScriptPubkey {
    fn from(src: [u8; 32]) -> Self {
        Self(src)
    }
}

impl fmt::Debug for ScriptPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptPubkey({})", hex::encode(self.0))
    }
}

impl fmt::Display for ScriptPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// An unspent output selected for a round.
///
/// Immutable once selected; the spend key material behind `script_pubkey`
/// stays in the wallet's key chain and never enters the round protocol.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Coin {
    /// Where the coin sits on chain.
    pub outpoint: OutPoint,

    /// The coin's value.
    pub amount: Amount,

    /// The destination script the coin pays to.
    pub script_pubkey: ScriptPubkey,
}

/// Wallet-side coin selection, consumed by the round client.
pub trait CoinSource {
    /// The coins to enter the round with.
    fn select_coins(&self) -> Vec<Coin>;
}

impl CoinSource for Vec<Coin> {
    fn select_coins(&self) -> Vec<Coin> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;
    use swl_crypto_keys::SpendPrivate;

    #[test]
    fn test_script_roundtrips_spend_public() {
        let public = SpendPrivate::from_random(&mut OsRng).public();
        let script = ScriptPubkey::from(&public);

        assert_eq!(script.spend_public().expect("valid script"), public);
    }

    #[test]
    fn test_garbage_script_has_no_spend_public() {
        // Not a valid Ristretto encoding.
        let script = ScriptPubkey::from([0xffu8; 32]);
        assert!(script.spend_public().is_err());
    }

    #[test]
    fn test_outpoint_display() {
        let outpoint = OutPoint::new([0xab; 32], 7);
        let rendered = outpoint.to_string();
        assert!(rendered.starts_with("abab"));
        assert!(rendered.ends_with(":7"));
    }
}
