use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::models::{Recipe, parse_recipes};

const BUNDLED_RECIPES: &str = include_str!("../assets/recipes.json");

/// Where the recipe list comes from.
///
/// The CLI implements a remote variant with reqwest; the core ships a
/// bundled asset and a plain JSON file.
pub trait RecipeSource: Send + Sync {
    fn load(&self) -> Result<Vec<Recipe>>;

    /// Short human-readable origin, for logs and error messages.
    fn describe(&self) -> String;
}

/// The recipe list compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledSource;

impl RecipeSource for BundledSource {
    fn load(&self) -> Result<Vec<Recipe>> {
        let recipes = parse_recipes(BUNDLED_RECIPES).context("Bundled recipe asset is invalid")?;
        debug!("Loaded {} bundled recipes", recipes.len());
        Ok(recipes)
    }

    fn describe(&self) -> String {
        "bundled recipes".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecipeSource for FileSource {
    fn load(&self) -> Result<Vec<Recipe>> {
        let input = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read recipes file: {}", self.path.display()))?;
        let recipes = parse_recipes(&input)
            .with_context(|| format!("Invalid recipes file: {}", self.path.display()))?;
        debug!(
            "Loaded {} recipes from {}",
            recipes.len(),
            self.path.display()
        );
        Ok(recipes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A source that always hands back the same list. Handy for wiring the
/// screens to data that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    recipes: Vec<Recipe>,
}

impl StaticSource {
    #[must_use]
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }
}

impl RecipeSource for StaticSource {
    fn load(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    fn describe(&self) -> String {
        "in-memory recipes".to_string()
    }
}
