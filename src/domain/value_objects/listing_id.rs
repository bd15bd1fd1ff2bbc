use uuid::Uuid;

/// Opaque identifier of a stored listing.
///
/// The format belongs to the backing store (a decimal sequence number for
/// the in-memory repository, a UUID for the SQL one). Callers may compare
/// ids for equality but must not interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(String);

impl ListingId {
    /// Identifier issued from a monotonic sequence
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Identifier issued by a UUID-keyed store
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }

    /// Parse a sequence-style identifier (positive decimal integer)
    pub fn parse_sequence(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match raw.parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(value) => Some(Self::from_sequence(value)),
        }
    }

    /// Parse a UUID-style identifier, normalizing to lowercase hyphenated form
    pub fn parse_uuid(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self::from_uuid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
