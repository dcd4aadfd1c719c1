use crate::models::RatingEntry;
use std::collections::BTreeMap;
use thiserror::Error;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between 1 and 5, got {0}")]
    OutOfRange(i64),

    #[error("Rating user must not be empty")]
    MissingUser,
}

/// Per-user ratings of one recipe.
///
/// Each user holds at most one rating; resubmitting replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingBook {
    ratings: BTreeMap<String, u8>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries, later entries for the same user winning
    pub fn from_entries(entries: &[RatingEntry]) -> Self {
        let ratings = entries
            .iter()
            .map(|e| (e.user_email.clone(), e.value))
            .collect();
        Self { ratings }
    }

    /// Record `value` for `user`, replacing any earlier rating
    pub fn submit(&mut self, user: &str, value: i64) -> Result<(), RatingError> {
        if user.is_empty() {
            return Err(RatingError::MissingUser);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }

        // Range checked above, fits in u8
        self.ratings.insert(user.to_string(), value as u8);
        Ok(())
    }

    pub fn get(&self, user: &str) -> Option<u8> {
        self.ratings.get(user).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Arithmetic mean of all current ratings
    pub fn average(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: u64 = self.ratings.values().map(|v| *v as u64).sum();
        Some(total as f64 / self.ratings.len() as f64)
    }

    pub fn to_entries(&self) -> Vec<RatingEntry> {
        self.ratings
            .iter()
            .map(|(user, value)| RatingEntry {
                user_email: user.clone(),
                value: *value,
            })
            .collect()
    }
}
