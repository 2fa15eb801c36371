use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::models::{Recipe, RecipeEdits, parse_recipes};

/// Persistence hand-off for a details screen's save.
///
/// Implementations decide what "saved" means. Rows with id 0 are new and
/// have no identity yet; assigning one is the store's job.
pub trait RecipeStore: Send + Sync {
    fn save(&self, edits: &RecipeEdits) -> Result<()>;
}

/// Accepts every save and only logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyStore;

impl RecipeStore for LogOnlyStore {
    fn save(&self, edits: &RecipeEdits) -> Result<()> {
        info!(
            "Saving recipe {}: {} ingredients, {} stages (not persisted)",
            edits.recipe_id,
            edits.ingredients.len(),
            edits.stages.len()
        );
        Ok(())
    }
}

/// Writes edits back into a recipes JSON file.
///
/// If the file does not exist yet it is created from `seed`, so edits to
/// bundled or remote recipes land in a local copy. When it does exist,
/// seeded recipes missing from it are added, and the edited recipe starts
/// from its seeded version rather than the stored one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    seed: Vec<Recipe>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Vec<Recipe>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Recipe>> {
        if !self.path.exists() {
            return Ok(self.seed.clone());
        }
        let input = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read recipes file: {}", self.path.display()))?;
        let mut recipes = parse_recipes(&input)
            .with_context(|| format!("Invalid recipes file: {}", self.path.display()))?;

        for fresh in &self.seed {
            if !recipes.iter().any(|r| r.id == fresh.id) {
                recipes.push(fresh.clone());
            }
        }
        Ok(recipes)
    }

    fn write_all(&self, recipes: &[Recipe]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(recipes)?;
        // Write to a sibling and rename so a failed write leaves the old file intact
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write recipes file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace recipes file: {}", self.path.display()))?;
        Ok(())
    }
}

impl RecipeStore for JsonFileStore {
    fn save(&self, edits: &RecipeEdits) -> Result<()> {
        let mut recipes = self.read_all()?;
        // The seeded version is the one the edits were made against
        if let Some(fresh) = self.seed.iter().find(|r| r.id == edits.recipe_id) {
            if let Some(existing) = recipes.iter_mut().find(|r| r.id == fresh.id) {
                existing.clone_from(fresh);
            }
        }
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == edits.recipe_id)
            .with_context(|| format!("Recipe {} not found in {}", edits.recipe_id, self.path.display()))?;

        recipe.ingredients.clone_from(&edits.ingredients);
        recipe.stages.clone_from(&edits.stages);
        assign_ids(recipe)?;

        self.write_all(&recipes)?;
        info!(
            "Saved recipe {} to {}",
            edits.recipe_id,
            self.path.display()
        );
        Ok(())
    }
}

/// Give every row with the placeholder id 0 a real id, counting up from
/// the largest id already used in that list.
fn assign_ids(recipe: &mut Recipe) -> Result<()> {
    let mut next = recipe.ingredients.iter().map(|i| i.id).max().unwrap_or(0);
    for ingredient in recipe.ingredients.iter_mut().filter(|i| i.id == 0) {
        next = next_id(next, "ingredient", recipe.id)?;
        ingredient.id = next;
    }

    let mut next = recipe.stages.iter().map(|s| s.id).max().unwrap_or(0);
    for stage in recipe.stages.iter_mut().filter(|s| s.id == 0) {
        next = next_id(next, "stage", recipe.id)?;
        stage.id = next;
    }
    Ok(())
}

fn next_id(last: i64, kind: &str, recipe_id: i64) -> Result<i64> {
    last.checked_add(1)
        .with_context(|| format!("Recipe {recipe_id} has no {kind} ids left to assign"))
}
