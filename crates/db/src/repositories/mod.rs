//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ingredient_repo;
pub mod recipe_ingredient_repo;
pub mod recipe_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;

pub use ingredient_repo::IngredientRepo;
pub use recipe_ingredient_repo::RecipeIngredientRepo;
pub use recipe_repo::RecipeRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
