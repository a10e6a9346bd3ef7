#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use sha2::Digest;

use crate::ModelError;

/// A deterministic row identifier.
///
/// Derived from a namespace (source id or session) and an ordinal, rendered
/// as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId([u8; 16]);

impl RowId {
    pub fn from_first_16_bytes_of_sha256(digest: [u8; 32]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    /// sha256("<namespace>\0<ordinal>"), first 16 bytes.
    pub fn derive(namespace: &str, ordinal: u64) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update([0u8]);
        hasher.update(ordinal.to_string().as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Self::from_first_16_bytes_of_sha256(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for RowId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes =
            hex::decode(value.trim()).map_err(|_| ModelError::InvalidRowId(value.to_string()))?;
        let out: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ModelError::InvalidRowId(value.to_string()))?;
        Ok(Self(out))
    }
}

impl serde::Serialize for RowId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for RowId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Identifier of one editing session against a master table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Namespace for ids of rows created inside this session.
    pub fn row_namespace(self) -> String {
        format!("session:{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}
