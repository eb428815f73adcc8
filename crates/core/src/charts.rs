//! Recipe statistics charts.
//!
//! Three canned reports are offered on the search page. Each one is a
//! labeled numeric series plus the kind of chart it should be drawn as;
//! drawing is left to the client. The database layer supplies the raw
//! aggregates and the builders here apply the ordering and zero-fill rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of entries in the popular-ingredients chart.
pub const POPULAR_INGREDIENT_LIMIT: i64 = 10;

/// Date format used for growth-over-time labels.
pub const DAY_LABEL_FORMAT: &str = "%Y-%m-%d";

pub const NO_INGREDIENT_DATA: &str = "No ingredient data available.";
pub const NO_GROWTH_DATA: &str = "No data available for recipe growth.";

// ---------------------------------------------------------------------------
// Query selection
// ---------------------------------------------------------------------------

/// How a chart is meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

/// The `chart` query parameter accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSelector {
    Difficulty,
    Popular,
    Growth,
}

/// A fully resolved chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartQuery {
    /// Recipes containing one ingredient, grouped by difficulty.
    DifficultyDistribution { ingredient: String },
    /// Ingredients ranked by how many recipes use them.
    PopularIngredients,
    /// Recipes created per calendar day.
    GrowthOverTime,
}

impl ChartQuery {
    /// Resolve the search parameters into a chart request.
    ///
    /// An ingredient without an explicit selector implies the difficulty
    /// distribution. Returns `Ok(None)` when nothing was asked for.
    pub fn from_params(
        selector: Option<ChartSelector>,
        ingredient: Option<&str>,
    ) -> Result<Option<Self>, CoreError> {
        let ingredient = ingredient.map(str::trim);

        match (selector, ingredient) {
            (Some(ChartSelector::Popular), _) => Ok(Some(Self::PopularIngredients)),
            (Some(ChartSelector::Growth), _) => Ok(Some(Self::GrowthOverTime)),
            (Some(ChartSelector::Difficulty), None) => Err(CoreError::Validation(
                "Ingredient name is required for the difficulty chart".to_string(),
            )),
            (_, Some("")) => Err(CoreError::Validation(
                "Ingredient name cannot be empty".to_string(),
            )),
            (_, Some(name)) => Ok(Some(Self::DifficultyDistribution {
                ingredient: name.to_string(),
            })),
            (None, None) => Ok(None),
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Self::DifficultyDistribution { .. } => ChartKind::Pie,
            Self::PopularIngredients => ChartKind::Bar,
            Self::GrowthOverTime => ChartKind::Line,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart payload
// ---------------------------------------------------------------------------

/// One labeled value of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: i64,
}

/// A chart ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub points: Vec<ChartPoint>,
    /// Set when the series is empty and there is nothing to draw.
    pub message: Option<String>,
}

/// Difficulty distribution for one ingredient.
///
/// Every level appears exactly once, in [`Difficulty::ALL`] order, with
/// zero for levels that have no recipes.
pub fn difficulty_distribution(
    ingredient: &str,
    counts: impl IntoIterator<Item = (Difficulty, i64)>,
) -> Chart {
    let mut totals = [0i64; Difficulty::ALL.len()];
    for (difficulty, count) in counts {
        totals[difficulty as usize] += count;
    }

    let points = Difficulty::ALL
        .iter()
        .zip(totals)
        .map(|(d, value)| ChartPoint {
            label: d.as_str().to_string(),
            value,
        })
        .collect();

    Chart {
        kind: ChartKind::Pie,
        title: format!("Recipes with {ingredient} by Difficulty"),
        x_label: None,
        y_label: None,
        points,
        message: None,
    }
}

/// The most used ingredients, highest recipe count first.
///
/// The input order is kept among equal counts, so the caller decides how
/// ties are broken.
pub fn popular_ingredients(usage: impl IntoIterator<Item = (String, i64)>) -> Chart {
    let mut usage: Vec<(String, i64)> = usage.into_iter().collect();
    usage.sort_by(|a, b| b.1.cmp(&a.1));
    usage.truncate(POPULAR_INGREDIENT_LIMIT as usize);

    let message = usage.is_empty().then(|| NO_INGREDIENT_DATA.to_string());
    let points = usage
        .into_iter()
        .map(|(label, value)| ChartPoint { label, value })
        .collect();

    Chart {
        kind: ChartKind::Bar,
        title: format!("Top {POPULAR_INGREDIENT_LIMIT} Most Popular Ingredients in Recipes"),
        x_label: Some("Number of Recipes".to_string()),
        y_label: Some("Ingredients".to_string()),
        points,
        message,
    }
}

/// Recipes created per day, oldest day first. Days without recipes are
/// simply absent from the series.
pub fn growth_over_time(daily: impl IntoIterator<Item = (NaiveDate, i64)>) -> Chart {
    let mut daily: Vec<(NaiveDate, i64)> = daily.into_iter().collect();
    daily.sort_by_key(|(day, _)| *day);

    let message = daily.is_empty().then(|| NO_GROWTH_DATA.to_string());
    let points = daily
        .into_iter()
        .map(|(day, value)| ChartPoint {
            label: day.format(DAY_LABEL_FORMAT).to_string(),
            value,
        })
        .collect();

    Chart {
        kind: ChartKind::Line,
        title: "Recipe Growth Over Time (Daily)".to_string(),
        x_label: Some("Day".to_string()),
        y_label: Some("Number of Recipes Added".to_string()),
        points,
        message,
    }
}
