use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// Units the recipe backend knows about. Ingredient units stay free text;
/// these are only offered as hints while editing.
pub const KNOWN_UNITS: &[&str] = &["ст.л.", "ч.л.", "г", "мл", "шт."];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default)]
    pub id: i64,
    pub order: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recipe as the screens see it.
///
/// Two shapes of recipe exist on the wire: one embeds full comments, the
/// other only carries `commentsCount`. Both collapse into this type;
/// `comments_loaded` says which one it came from. `comments_count` is always
/// the number to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecipeRecord", into = "RecipeRecord")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub stages: Vec<Stage>,
    pub author: Author,
    pub comments: Vec<Comment>,
    pub comments_count: u32,
    pub comments_loaded: bool,
    pub likes_count: u32,
}

/// Wire form of [`Recipe`], tolerant of both comment shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeRecord {
    id: i64,
    name: String,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    stages: Vec<Stage>,
    author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments_count: Option<u32>,
    #[serde(default)]
    likes_count: u32,
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = anyhow::Error;

    fn try_from(r: RecipeRecord) -> Result<Self> {
        let (comments, comments_count, comments_loaded) = match r.comments {
            Some(comments) => {
                let count = u32::try_from(comments.len())
                    .with_context(|| format!("Recipe {} has too many comments", r.id))?;
                match r.comments_count {
                    Some(declared) if declared != count => warn!(
                        "Recipe {} declares {declared} comments but embeds {count}; using {count}",
                        r.id
                    ),
                    _ => {}
                }
                (comments, count, true)
            }
            None => (Vec::new(), r.comments_count.unwrap_or(0), r.comments_count.is_none()),
        };

        Ok(Recipe {
            id: r.id,
            name: r.name,
            ingredients: r.ingredients,
            stages: r.stages,
            author: r.author,
            comments,
            comments_count,
            comments_loaded,
            likes_count: r.likes_count,
        })
    }
}

impl From<Recipe> for RecipeRecord {
    fn from(r: Recipe) -> Self {
        let comments = r.comments_loaded.then_some(r.comments);
        RecipeRecord {
            id: r.id,
            name: r.name,
            ingredients: r.ingredients,
            stages: r.stages,
            author: r.author,
            comments,
            comments_count: Some(r.comments_count),
            likes_count: r.likes_count,
        }
    }
}

/// The working copy a details screen hands to a store on save.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeEdits {
    pub recipe_id: i64,
    pub ingredients: Vec<Ingredient>,
    pub stages: Vec<Stage>,
}

/// Parse a recipe list in either wire shape.
pub fn parse_recipes(json: &str) -> Result<Vec<Recipe>> {
    serde_json::from_str(json).context("Failed to parse recipe list")
}

/// Parse a quantity typed into a text field.
///
/// Accepts plain numbers and a decimal comma ("1,5"). Rejects anything
/// that is not a finite, non-negative number.
pub fn parse_quantity(raw: &str) -> Result<f64> {
    let s = raw.trim().replace(',', ".");
    let value: f64 = s
        .parse()
        .with_context(|| format!("Invalid quantity: '{raw}'. Use a number like '2' or '1.5'"))?;
    if !value.is_finite() {
        bail!("Quantity must be a finite number");
    }
    if value < 0.0 {
        bail!("Quantity must not be negative");
    }
    Ok(value)
}

pub fn parse_stage_order(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid stage order: '{raw}'. Use a whole number"))
}

#[must_use]
pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.contains(&unit.trim())
}
