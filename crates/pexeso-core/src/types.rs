//! Strong type definitions for Pexeso.
//!
//! Identifiers and validated strings are newtypes to prevent misuse at
//! compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// The symbolic face of a card, shared by exactly two cards in a deck.
///
/// Usually the name of the image drawn on the card front (`"apple"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceId(String);

impl FaceId {
    /// Create a face identifier.
    pub fn new(face: impl Into<String>) -> Self {
        Self(face.into())
    }

    /// Get the face as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceId({})", self.0)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FaceId {
    fn from(face: &str) -> Self {
        Self(face.to_string())
    }
}

impl From<String> for FaceId {
    fn from(face: String) -> Self {
        Self(face)
    }
}

/// Store-assigned identifier of a score record.
///
/// Monotonic within a store and never reused after deletion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreId(pub i64);

impl ScoreId {
    /// Create from the raw row id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw row id.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScoreId({})", self.0)
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ScoreId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A validated, non-blank player display name.
///
/// Surrounding whitespace is trimmed on construction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate and create a player name.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::BlankPlayerName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerName({:?})", self.0)
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = CoreError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_id_display() {
        let face = FaceId::from("cherry");
        assert_eq!(face.to_string(), "cherry");
        assert_eq!(format!("{:?}", face), "FaceId(cherry)");
    }

    #[test]
    fn test_score_id_ordering() {
        assert!(ScoreId::new(1) < ScoreId::new(2));
        assert_eq!(ScoreId::from(7).get(), 7);
    }

    #[test]
    fn test_player_name_trims() {
        let name = PlayerName::parse("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_player_name_rejects_blank() {
        assert!(matches!(PlayerName::parse(""), Err(CoreError::BlankPlayerName)));
        assert!(matches!(PlayerName::parse(" \t\n"), Err(CoreError::BlankPlayerName)));
    }

    #[test]
    fn test_player_name_serde_validates() {
        let name: PlayerName = serde_json::from_str("\"Bob\"").unwrap();
        assert_eq!(name.as_str(), "Bob");
        assert!(serde_json::from_str::<PlayerName>("\"   \"").is_err());
    }
}
