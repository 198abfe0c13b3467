use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::TypeError;

/// Identifier of a stored document.
///
/// Ids are random (UUIDv4 bytes) and rendered as 32 lowercase hex characters.
/// The hex form doubles as the payload file name in the filesystem backend,
/// so only strings that parse as a `DocumentId` can ever address storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; 16]);

impl DocumentId {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = 32;

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    /// Create a `DocumentId` from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The raw 16 bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a lowercase hex string. Uppercase digits are rejected so
    /// every id has a single spelling.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(TypeError::InvalidHex(format!("not lowercase: {s}")));
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 16 {
            return Err(TypeError::InvalidLength {
                expected: 16,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.short_hex())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_ids_are_32_hex_chars() {
        let id = DocumentId::generate();
        let hex = id.to_hex();
        assert_eq!(hex.len(), DocumentId::HEX_LEN);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_differ() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_full_hex() {
        let id = DocumentId::from_bytes([0xab; 16]);
        assert_eq!(format!("{id}"), "ab".repeat(16));
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(DocumentId::generate().short_hex().len(), 8);
    }

    #[test]
    fn rejects_non_hex() {
        let err = DocumentId::from_hex("../../etc/passwd").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn rejects_uppercase_spelling() {
        let id = DocumentId::from_bytes([0xab; 16]);
        let upper = id.to_hex().to_ascii_uppercase();
        assert!(matches!(
            DocumentId::from_hex(&upper),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(DocumentId::from_hex(&"aB".repeat(16)).is_err());
        assert_eq!(DocumentId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = DocumentId::from_hex("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 16, actual: 2 });
    }

    #[test]
    fn rejects_sidecar_file_name() {
        let id = DocumentId::generate();
        assert!(format!("{id}.meta.json").parse::<DocumentId>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = DocumentId::from_bytes([1; 16]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(16)));
        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    proptest! {
        #[test]
        fn hex_parse_accepts_every_rendered_id(bytes in any::<[u8; 16]>()) {
            let id = DocumentId::from_bytes(bytes);
            prop_assert_eq!(id.to_hex().parse::<DocumentId>().unwrap(), id);
        }
    }
}
