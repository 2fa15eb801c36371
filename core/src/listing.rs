use anyhow::Result;
use log::{debug, error};
use serde::Serialize;

use crate::models::Recipe;
use crate::navigation::Route;
use crate::source::RecipeSource;

/// Names and author names are cut to this many characters in list rows.
pub const LIST_LABEL_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loaded(Vec<Recipe>),
    Failed(String),
}

/// One selectable row of the recipe list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeListRow {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub likes: u32,
    pub comments: u32,
}

#[derive(Debug, Clone)]
pub struct RecipeList {
    state: LoadState,
}

impl RecipeList {
    /// Load once from `source`. A failure is kept as an explicit state
    /// rather than an empty list.
    pub fn load(source: &dyn RecipeSource) -> Self {
        Self::from_result(source.load(), &source.describe())
    }

    /// Build the list from the outcome of a load done elsewhere, such as an
    /// async fetch.
    pub fn from_result(result: Result<Vec<Recipe>>, origin: &str) -> Self {
        let state = match result {
            Ok(recipes) => {
                debug!("Recipe list loaded {} recipes from {origin}", recipes.len());
                LoadState::Loaded(recipes)
            }
            Err(e) => {
                error!("Failed to load recipes from {origin}: {e:#}");
                LoadState::Failed(format!("{e:#}"))
            }
        };
        Self { state }
    }

    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            state: LoadState::Loaded(recipes),
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        match &self.state {
            LoadState::Loaded(recipes) => recipes,
            LoadState::Failed(_) => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            LoadState::Loaded(_) => None,
        }
    }

    #[must_use]
    pub fn rows(&self) -> Vec<RecipeListRow> {
        self.recipes()
            .iter()
            .map(|r| RecipeListRow {
                id: r.id,
                name: label(&r.name),
                author: label(&r.author.name),
                likes: r.likes_count,
                comments: r.comments_count,
            })
            .collect()
    }

    /// Route to the details of the recipe at `index`, carrying a full copy.
    #[must_use]
    pub fn select(&self, index: usize) -> Option<Route> {
        self.recipes().get(index).cloned().map(Route::details)
    }

    #[must_use]
    pub fn select_id(&self, id: i64) -> Option<Route> {
        self.recipes()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .map(Route::details)
    }
}

/// First `LIST_LABEL_CHARS` characters of `s`.
#[must_use]
pub fn label(s: &str) -> String {
    s.chars().take(LIST_LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BundledSource, FileSource};

    #[test]
    fn test_label_truncates_by_chars() {
        assert_eq!(label("Blini with sour cream"), "Blini with");
        assert_eq!(label("Syrniki"), "Syrniki");
        assert_eq!(label("Сырники со сметаной"), "Сырники со");
        assert_eq!(label(""), "");
    }

    #[test]
    fn test_rows_truncate_but_selection_does_not() {
        let list = RecipeList::load(&BundledSource);
        let rows = list.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Blini with");
        assert_eq!(rows[0].author, "Natalia So");
        assert_eq!(rows[0].likes, 42);
        assert_eq!(rows[0].comments, 2);
        assert_eq!(rows[2].comments, 15);

        match list.select(0) {
            Some(Route::RecipeDetails { recipe }) => {
                assert_eq!(recipe.name, "Blini with sour cream");
                assert_eq!(recipe.author.name, "Natalia Sokolova");
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn test_select_out_of_range() {
        let list = RecipeList::load(&BundledSource);
        assert!(list.select(3).is_none());
        assert!(list.select_id(404).is_none());
        let route = list.select_id(2);
        assert_eq!(route.map(|r| r.name()), Some("RecipeDetails"));
    }

    #[test]
    fn test_order_is_preserved() {
        let list = RecipeList::load(&BundledSource);
        let ids: Vec<i64> = list.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_load_failure_is_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let list = RecipeList::load(&FileSource::new(dir.path().join("missing.json")));
        assert!(list.recipes().is_empty());
        assert!(list.rows().is_empty());
        assert!(list.error().unwrap().contains("missing.json"));
        assert!(matches!(list.state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_from_result_error() {
        let list = RecipeList::from_result(Err(anyhow::anyhow!("timed out")), "remote");
        assert_eq!(list.error(), Some("timed out"));
    }
}
