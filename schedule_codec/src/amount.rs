use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CodecError;

/// Decimals of the native token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Atomic units per display unit (10^18).
pub const DENOMINATION: u128 = 1_000_000_000_000_000_000;

/// Fractional digits kept when rendering an amount.
pub const DISPLAY_DECIMALS: u32 = 6;

/// Token quantity in atomic units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub const fn from_atomic(units: u128) -> Self {
        Self(units)
    }

    pub const fn atomic(&self) -> u128 {
        self.0
    }

    /// Parse a display-unit decimal ("1.5") into atomic units.
    ///
    /// Digits past the 18th fractional place are truncated.
    pub fn parse_display(text: &str) -> Result<Self, CodecError> {
        let text = text.trim();
        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(CodecError::InvalidAmount(format!("`{}`", text)));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CodecError::InvalidAmount(format!("`{}`", text)));
        }

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CodecError::InvalidAmount(format!("`{}` is too large", text)))?
        };

        let kept = &frac[..frac.len().min(TOKEN_DECIMALS as usize)];
        let mut frac_units: u128 = 0;
        for digit in kept.bytes() {
            frac_units = frac_units * 10 + u128::from(digit - b'0');
        }
        frac_units *= 10u128.pow(TOKEN_DECIMALS - kept.len() as u32);

        whole_units
            .checked_mul(DENOMINATION)
            .and_then(|units| units.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| CodecError::InvalidAmount(format!("`{}` is too large", text)))
    }

    /// Render in display units, truncated to six decimals.
    pub fn to_display(&self) -> String {
        let whole = self.0 / DENOMINATION;
        let scale = 10u128.pow(TOKEN_DECIMALS - DISPLAY_DECIMALS);
        let frac = (self.0 % DENOMINATION) / scale;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", frac, width = DISPLAY_DECIMALS as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }

    /// Lowercase hex, zero-padded to at least 16 digits and to an even length.
    pub fn to_payload_hex(&self) -> String {
        let mut encoded = format!("{:016x}", self.0);
        if encoded.len() % 2 == 1 {
            encoded.insert(0, '0');
        }
        encoded
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl From<u64> for TokenAmount {
    fn from(units: u64) -> Self {
        Self(u128::from(units))
    }
}
