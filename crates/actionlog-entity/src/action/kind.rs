//! Operation kind classification for inbound telemetry events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The operation kind a telemetry event belongs to.
///
/// Derived from the free-text `type` field clients send. The vocabulary
/// is a closed, case-insensitive exact match; anything the client sends
/// outside of it degrades into [`OperationKind::Unknown`] rather than
/// being guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// A create-style interaction.
    Create,
    /// A read/view-style interaction.
    Read,
    /// An update-style interaction.
    Update,
    /// A delete-style interaction.
    Delete,
    /// Anything that could not be classified.
    Unknown,
}

impl OperationKind {
    /// All kinds, in persisted-code order.
    pub const ALL: [OperationKind; 5] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Unknown,
    ];

    /// The kinds handled by the slower non-read flush tier.
    pub const NON_READ: [OperationKind; 4] =
        [Self::Create, Self::Update, Self::Delete, Self::Unknown];

    /// Classify a raw event type string.
    ///
    /// Total function: matching is case-insensitive on the trimmed input,
    /// and any unmatched value (including the empty string) yields
    /// [`OperationKind::Unknown`].
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create" => Self::Create,
            "read" => Self::Read,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Unknown,
        }
    }

    /// Short code persisted in the `operation_code` column.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Create => "C",
            Self::Read => "R",
            Self::Update => "U",
            Self::Delete => "D",
            Self::Unknown => "X",
        }
    }

    /// Reverse of [`OperationKind::code`], for queries and tests.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(Self::Create),
            "R" => Some(Self::Read),
            "U" => Some(Self::Update),
            "D" => Some(Self::Delete),
            "X" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
