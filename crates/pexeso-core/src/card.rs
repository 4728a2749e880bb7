//! Cards and deck construction.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::FaceId;

/// The stock face set: ten fruits, dealt as a 20-card deck on a 4×5 grid.
pub const DEFAULT_FACES: [&str; 10] = [
    "apple",
    "avocado",
    "banana",
    "blueberry",
    "cherry",
    "grapes",
    "pineapple",
    "orange",
    "strawberry",
    "watermelon",
];

/// Minimum number of distinct faces in a deck.
pub const MIN_FACES: usize = 2;

/// A single card on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique within a deck, assigned sequentially from 1.
    pub id: u32,
    /// Shared with exactly one other card in the deck.
    pub face: FaceId,
    /// Face-up right now.
    pub is_flipped: bool,
    /// Permanently revealed as half of a found pair.
    pub is_matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    pub fn new(id: u32, face: FaceId) -> Self {
        Self {
            id,
            face,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Whether `select` would accept this card.
    pub fn is_selectable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}

/// The stock face set as owned identifiers.
pub fn default_faces() -> Vec<FaceId> {
    DEFAULT_FACES.iter().copied().map(FaceId::from).collect()
}

/// Check a face set: at least [`MIN_FACES`] entries, none repeated.
pub fn validate_faces(faces: &[FaceId]) -> Result<()> {
    if faces.len() < MIN_FACES {
        return Err(CoreError::TooFewFaces(faces.len()));
    }

    let mut seen = HashSet::with_capacity(faces.len());
    for face in faces {
        if !seen.insert(face) {
            return Err(CoreError::DuplicateFace(face.clone()));
        }
    }

    Ok(())
}

/// Build the ordered (unshuffled) deck for a face set.
///
/// Card `i` carries face `faces[(i - 1) % n]`, so the first `n` cards hold one
/// copy of every face and the second `n` cards hold the other.
pub fn build_deck(faces: &[FaceId]) -> Result<Vec<Card>> {
    validate_faces(faces)?;

    let n = faces.len();
    Ok((1..=2 * n)
        .map(|id| Card::new(id as u32, faces[(id - 1) % n].clone()))
        .collect())
}

/// Build a deck and shuffle it into a uniformly random permutation.
pub fn deal<R: Rng + ?Sized>(faces: &[FaceId], rng: &mut R) -> Result<Vec<Card>> {
    let mut deck = build_deck(faces)?;
    deck.shuffle(rng);
    Ok(deck)
}
