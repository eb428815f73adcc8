//! Recipe difficulty classification.
//!
//! A recipe's difficulty is never chosen by a user. It is derived from the
//! cooking time and the number of ingredients every time the recipe row is
//! written, using the two thresholds below.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Minutes;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cooking time (minutes) at or above which a recipe is no longer "quick".
pub const LONG_COOKING_TIME_MINS: Minutes = 10;

/// Ingredient count at or above which a recipe is no longer "simple".
pub const MANY_INGREDIENTS: i32 = 4;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// The four difficulty levels, declared in their canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Intermediate,
    Hard,
}

impl Difficulty {
    /// Every level in the fixed order used by charts and reports.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Intermediate,
        Difficulty::Hard,
    ];

    /// Classify a recipe from its cooking time and ingredient count.
    ///
    /// | cooking time | ingredients | difficulty   |
    /// |--------------|-------------|--------------|
    /// | `< 10`       | `< 4`       | Easy         |
    /// | `< 10`       | `>= 4`      | Medium       |
    /// | `>= 10`      | `< 4`       | Intermediate |
    /// | `>= 10`      | `>= 4`      | Hard         |
    pub fn classify(cooking_time: Minutes, ingredient_count: i32) -> Self {
        let long = cooking_time >= LONG_COOKING_TIME_MINS;
        let many = ingredient_count >= MANY_INGREDIENTS;
        match (long, many) {
            (false, false) => Self::Easy,
            (false, true) => Self::Medium,
            (true, false) => Self::Intermediate,
            (true, true) => Self::Hard,
        }
    }

    /// The label stored in the `recipes.difficulty` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Intermediate => "Intermediate",
            Self::Hard => "Hard",
        }
    }

    /// Parse a stored label back into a level.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Intermediate" => Ok(Self::Intermediate),
            "Hard" => Ok(Self::Hard),
            _ => Err(CoreError::Validation(format!(
                "Invalid difficulty '{s}'. Must be one of: Easy, Medium, Intermediate, Hard"
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lets row structs decode the TEXT column with `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for Difficulty {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
