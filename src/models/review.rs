//! Recipe review model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A review left on a recipe. Append-only; there is no edit or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub recipe_id: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    pub comment: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for posting a review.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewReview {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_rating_bounds() {
        for rating in 1..=5u8 {
            let review = NewReview {
                rating,
                comment: String::new(),
            };
            assert!(review.validate().is_ok());
        }

        for rating in [0u8, 6, 10] {
            let review = NewReview {
                rating,
                comment: String::new(),
            };
            assert!(review.validate().is_err(), "rating {} should fail", rating);
        }
    }
}
