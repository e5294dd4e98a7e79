use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use time::OffsetDateTime;

const ID_BYTES: usize = 12;
pub const ID_HEX_LEN: usize = ID_BYTES * 2;

static PROCESS_TAG: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Record identifier: 12 bytes rendered as 24 lowercase hex characters.
///
/// Layout is 4 bytes of big-endian unix seconds, 5 bytes fixed per process and
/// a 3 byte counter, so ids generated by one process sort by creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn generate() -> Self {
        let tag = PROCESS_TAG.get_or_init(|| {
            let mut tag = [0u8; 5];
            rand::thread_rng().fill_bytes(&mut tag);
            tag
        });
        let seconds = OffsetDateTime::now_utc().unix_timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(tag);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(hex::encode(bytes))
    }

    /// Returns `None` unless `value` is exactly 24 hex digits.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != ID_HEX_LEN || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("malformed object id: {}", value))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed() {
        let id = ObjectId::generate();
        assert_eq!(id.as_str().len(), ID_HEX_LEN);
        assert_eq!(ObjectId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn generated_ids_sort_by_creation() {
        let first = ObjectId::generate();
        let second = ObjectId::generate();
        assert!(first < second);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(ObjectId::parse("").is_none());
        assert!(ObjectId::parse("abc").is_none());
        assert!(ObjectId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(ObjectId::parse("65a1f0c2b3d4e5f6a7b8c9d0e1").is_none());
    }

    #[test]
    fn parse_normalizes_case() {
        let id = ObjectId::parse("65A1F0C2B3D4E5F6A7B8C9D0").expect("valid id");
        assert_eq!(id.as_str(), "65a1f0c2b3d4e5f6a7b8c9d0");
    }

    #[test]
    fn deserialize_rejects_malformed_ids() {
        let parsed: Result<ObjectId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(parsed.is_err());
    }
}
