//! Input validation for recipes, ingredients and recipe-ingredient rows.
//!
//! Request DTOs declare their shape rules with `#[derive(Validate)]`;
//! [`validate_input`] turns the collected field errors into a single
//! [`CoreError::Validation`]. The explicit `validate_*` helpers cover rules
//! that are also needed outside a DTO (batch rows, find-or-create).

use validator::Validate;

use crate::error::CoreError;
use crate::types::Minutes;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an ingredient name in characters.
pub const MAX_INGREDIENT_NAME_LENGTH: usize = 120;

/// Maximum length of a recipe name in characters.
pub const MAX_RECIPE_NAME_LENGTH: usize = 255;

/// Maximum length of a free-text quantity such as `"2 cups"`.
pub const MAX_QUANTITY_LENGTH: usize = 50;

/// Smallest number of ingredients a new recipe may declare.
pub const MIN_TARGET_INGREDIENT_COUNT: i32 = 1;

// ---------------------------------------------------------------------------
// DTO validation
// ---------------------------------------------------------------------------

/// Run the derived validator rules on `input` and report every failing field.
///
/// Messages are ordered by field name so responses are stable.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    let Err(errors) = input.validate() else {
        return Ok(());
    };

    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {msg}")
            })
        })
        .collect();
    messages.sort();

    Err(CoreError::Validation(messages.join("; ")))
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// The stored form of a user-supplied name: surrounding whitespace trimmed.
///
/// Ingredient names are compared in this form, so every write and lookup
/// goes through it.
pub fn normalize_name(name: &str) -> &str {
    name.trim()
}

/// An ingredient name must be non-blank and at most
/// [`MAX_INGREDIENT_NAME_LENGTH`] characters once trimmed.
pub fn validate_ingredient_name(name: &str) -> Result<(), CoreError> {
    validate_required_text("ingredient name", name, MAX_INGREDIENT_NAME_LENGTH)
}

/// A recipe name must be non-blank and at most [`MAX_RECIPE_NAME_LENGTH`]
/// characters once trimmed.
pub fn validate_recipe_name(name: &str) -> Result<(), CoreError> {
    validate_required_text("recipe name", name, MAX_RECIPE_NAME_LENGTH)
}

/// A quantity is free text but may not be blank.
pub fn validate_quantity(quantity: &str) -> Result<(), CoreError> {
    validate_required_text("quantity", quantity, MAX_QUANTITY_LENGTH)
}

/// Cooking time is expressed in whole minutes and cannot be negative.
pub fn validate_cooking_time(minutes: Minutes) -> Result<(), CoreError> {
    if minutes < 0 {
        return Err(CoreError::Validation(format!(
            "cooking time must be zero or more minutes, got {minutes}"
        )));
    }
    Ok(())
}

/// A new recipe must declare at least one ingredient.
pub fn validate_target_ingredient_count(count: i32) -> Result<(), CoreError> {
    if count < MIN_TARGET_INGREDIENT_COUNT {
        return Err(CoreError::Validation(format!(
            "number of ingredients must be at least {MIN_TARGET_INGREDIENT_COUNT}, got {count}"
        )));
    }
    Ok(())
}

fn validate_required_text(label: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} cannot be empty")));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{label} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}
