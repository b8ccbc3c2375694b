use std::fmt::{Display, Formatter};
use std::str::FromStr;

use data_encoding::HEXLOWER_PERMISSIVE;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::common::AccountId;

pub type HmacSha256 = Hmac<Sha256>;

/// An opaque 32-byte commitment proving a voter's eligibility, so that no
/// identifying data needs to live in the ledger. Rendered as lowercase hex.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationHash([u8; RegistrationHash::LEN]);

impl RegistrationHash {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Commit to a voter's eligibility with a key held by the registration authority.
    /// The same `(secret, voter, salt)` always yields the same commitment.
    pub fn commit(secret: &[u8], voter: &AccountId, salt: &[u8]) -> Self {
        let mut hmac =
            HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        hmac.update(voter.as_ref());
        hmac.update(salt);
        Self::from_output(&hmac.finalize().into_bytes())
    }

    /// Plain SHA-256 of an off-ledger registration record.
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self::from_output(&Sha256::digest(data.as_ref()))
    }

    fn from_output(output: &[u8]) -> Self {
        let mut bytes = [0; Self::LEN];
        bytes.copy_from_slice(output);
        Self(bytes)
    }
}

impl Display for RegistrationHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&HEXLOWER_PERMISSIVE.encode(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashParseError {
    #[error("registration hash is not valid hex: {0}")]
    Hex(String),
    #[error("registration hash must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

impl FromStr for RegistrationHash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = HEXLOWER_PERMISSIVE
            .decode(s.as_bytes())
            .map_err(|e| HashParseError::Hex(e.to_string()))?;
        let actual = bytes.len();
        let bytes: [u8; Self::LEN] = bytes.try_into().map_err(|_| HashParseError::Length {
            expected: Self::LEN,
            actual,
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for RegistrationHash {
    type Error = HashParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RegistrationHash> for String {
    fn from(hash: RegistrationHash) -> Self {
        hash.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_accepts_prefix_and_case() {
        let hash = RegistrationHash::digest("voter roll entry 17");
        let hex = hash.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex, hex.to_lowercase());

        assert_eq!(hex.parse::<RegistrationHash>(), Ok(hash));
        assert_eq!(
            format!("0x{}", hex.to_uppercase()).parse::<RegistrationHash>(),
            Ok(hash)
        );
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(matches!(
            "not hex".parse::<RegistrationHash>(),
            Err(HashParseError::Hex(_))
        ));
        assert_eq!(
            "abcd".parse::<RegistrationHash>(),
            Err(HashParseError::Length {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn commitments_depend_on_every_input() {
        let alice = AccountId::voter_example(1);
        let bob = AccountId::voter_example(2);

        let base = RegistrationHash::commit(b"key", &alice, b"salt");
        assert_eq!(base, RegistrationHash::commit(b"key", &alice, b"salt"));
        assert_ne!(base, RegistrationHash::commit(b"other key", &alice, b"salt"));
        assert_ne!(base, RegistrationHash::commit(b"key", &bob, b"salt"));
        assert_ne!(base, RegistrationHash::commit(b"key", &alice, b"pepper"));
    }

    #[test]
    fn serializes_as_hex_string() {
        let hash = RegistrationHash::from_bytes([0xab; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        assert_eq!(serde_json::from_str::<RegistrationHash>(&json).unwrap(), hash);
    }
}
