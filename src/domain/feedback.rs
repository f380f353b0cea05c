use serde::Deserialize;

use super::error::ValidationError;

/// Message left on the feedback page. Logged, never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub message: String,
    pub rating: u8,
}

impl FeedbackForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyFeedback);
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}
