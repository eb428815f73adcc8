/// Primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// UTC timestamp as stored in `timestamptz` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Cooking time in whole minutes (`recipes.cooking_time`, INTEGER).
pub type Minutes = i32;
