//! 32-byte account addresses and their bech32 text form.

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::CodecError;

/// Raw address length in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Human-readable prefix of account addresses.
pub const ADDRESS_HRP: &str = "erd";

/// Network account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse the checksummed `erd1...` form.
    pub fn from_bech32(text: &str) -> Result<Self, CodecError> {
        let (hrp, data, variant) = bech32::decode(text.trim())
            .map_err(|e| CodecError::InvalidAddress(format!("{}: {}", text, e)))?;
        if hrp != ADDRESS_HRP {
            return Err(CodecError::InvalidAddress(format!(
                "expected prefix `{}`, found `{}`",
                ADDRESS_HRP, hrp
            )));
        }
        if variant != Variant::Bech32 {
            return Err(CodecError::InvalidAddress(
                "bech32m addresses are not accepted".into(),
            ));
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(text.trim_start_matches("0x"))
            .map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            CodecError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn to_bech32(&self) -> String {
        self.to_string()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bech32::encode(ADDRESS_HRP, self.0.to_base32(), Variant::Bech32)
            .map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_bech32(&text).map_err(serde::de::Error::custom)
    }
}
