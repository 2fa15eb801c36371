use anyhow::{Result, bail};
use log::{debug, warn};

use crate::editor::{EditableList, IngredientField, StageField};
use crate::models::{Comment, Ingredient, Recipe, RecipeEdits, Stage};
use crate::navigation::Route;
use crate::store::RecipeStore;

/// What the comments panel should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsPanel<'a> {
    Hidden,
    Comments(&'a [Comment]),
    /// The recipe came without comment bodies; only the count is known.
    CountOnly(u32),
}

/// State of one open details screen.
///
/// The recipe passed in is kept as-is for display. Ingredients and stages
/// are copied into two [`EditableList`]s that share one edit mode.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    recipe: Recipe,
    ingredients: EditableList<Ingredient>,
    stages: EditableList<Stage>,
    comments_shown: bool,
}

impl RecipeDetails {
    /// Mount from the current route. Only `RecipeDetails` routes carry a
    /// recipe.
    pub fn mount(route: &Route) -> Result<Self> {
        match route {
            Route::RecipeDetails { recipe } => Ok(Self::new(recipe)),
            Route::RecipeList => bail!("The recipe list route has no recipe to show"),
        }
    }

    #[must_use]
    pub fn new(recipe: &Recipe) -> Self {
        Self {
            recipe: recipe.clone(),
            ingredients: EditableList::new(&recipe.ingredients),
            stages: EditableList::new(&recipe.stages),
            comments_shown: false,
        }
    }

    /// The recipe as it was when the screen was mounted.
    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        self.ingredients.rows()
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        self.stages.rows()
    }

    #[must_use]
    pub fn ingredient_list(&self) -> &EditableList<Ingredient> {
        &self.ingredients
    }

    #[must_use]
    pub fn stage_list(&self) -> &EditableList<Stage> {
        &self.stages
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.ingredients.is_editing()
    }

    pub fn enter_edit(&mut self) {
        self.ingredients.enter_edit();
        self.stages.enter_edit();
    }

    pub fn add_ingredient(&mut self) -> Result<()> {
        self.ingredients.add_row()
    }

    pub fn add_stage(&mut self) -> Result<()> {
        self.stages.add_row()
    }

    pub fn delete_ingredient(&mut self, index: usize) -> Result<()> {
        self.ingredients.delete_row(index)
    }

    pub fn delete_stage(&mut self, index: usize) -> Result<()> {
        self.stages.delete_row(index)
    }

    pub fn update_ingredient(&mut self, index: usize, field: IngredientField) -> Result<()> {
        self.ingredients.update_field(index, field)
    }

    pub fn update_stage(&mut self, index: usize, field: StageField) -> Result<()> {
        self.stages.update_field(index, field)
    }

    /// Update an ingredient field from its name and typed text.
    pub fn update_ingredient_named(&mut self, index: usize, field: &str, raw: &str) -> Result<()> {
        self.ingredients.update_named(index, field, raw)
    }

    pub fn update_stage_named(&mut self, index: usize, field: &str, raw: &str) -> Result<()> {
        self.stages.update_named(index, field, raw)
    }

    pub fn shift_stage_orders(&mut self, start_order: i64) -> Result<()> {
        self.stages.shift_orders_from(start_order)
    }

    pub fn renumber_stages(&mut self) -> Result<()> {
        self.stages.renumber()
    }

    pub fn toggle_comments(&mut self) {
        self.comments_shown = !self.comments_shown;
    }

    /// Stored toggle value, regardless of edit mode.
    #[must_use]
    pub fn comments_toggled(&self) -> bool {
        self.comments_shown
    }

    /// Edit mode hides the panel whatever the toggle says.
    #[must_use]
    pub fn comments_visible(&self) -> bool {
        self.comments_shown && !self.is_editing()
    }

    #[must_use]
    pub fn comments_panel(&self) -> CommentsPanel<'_> {
        if !self.comments_visible() {
            CommentsPanel::Hidden
        } else if self.recipe.comments_loaded {
            CommentsPanel::Comments(&self.recipe.comments)
        } else {
            CommentsPanel::CountOnly(self.recipe.comments_count)
        }
    }

    #[must_use]
    pub fn edits(&self) -> RecipeEdits {
        RecipeEdits {
            recipe_id: self.recipe.id,
            ingredients: self.ingredients.rows().to_vec(),
            stages: self.stages.rows().to_vec(),
        }
    }

    /// Hand the working copy to `store` and leave edit mode. If the store
    /// fails, edit mode stays on so nothing typed is lost.
    pub fn save_and_exit(&mut self, store: &dyn RecipeStore) -> Result<()> {
        if !self.is_editing() {
            debug!("Save requested for recipe {} outside edit mode", self.recipe.id);
        }
        if let Err(e) = store.save(&self.edits()) {
            warn!("Saving recipe {} failed: {e:#}", self.recipe.id);
            return Err(e);
        }
        self.ingredients.exit_edit();
        self.stages.exit_edit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use crate::store::LogOnlyStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<RecipeEdits>>,
    }

    impl RecipeStore for RecordingStore {
        fn save(&self, edits: &RecipeEdits) -> Result<()> {
            self.saved.lock().unwrap().push(edits.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl RecipeStore for FailingStore {
        fn save(&self, _edits: &RecipeEdits) -> Result<()> {
            bail!("disk full")
        }
    }

    fn flour_recipe() -> Recipe {
        Recipe {
            id: 10,
            name: "Bread".to_string(),
            ingredients: vec![Ingredient {
                id: 1,
                name: "Flour".to_string(),
                quantity: 2.0,
                unit: "cups".to_string(),
            }],
            stages: vec![Stage {
                id: 1,
                order: 1,
                description: "Knead".to_string(),
            }],
            author: Author {
                id: 1,
                name: "Baker".to_string(),
            },
            comments: vec![Comment {
                id: 1,
                content: "Nice crust".to_string(),
                author: Author {
                    id: 2,
                    name: "Guest".to_string(),
                },
                created_at: None,
            }],
            comments_count: 1,
            comments_loaded: true,
            likes_count: 3,
        }
    }

    #[test]
    fn test_add_update_delete_scenario() {
        let recipe = flour_recipe();
        let mut details = RecipeDetails::mount(&Route::details(recipe.clone())).unwrap();

        details.enter_edit();
        details.add_ingredient().unwrap();
        let sugar = IngredientField::Name("Sugar".to_string());
        details.update_ingredient(1, sugar).unwrap();
        details.delete_ingredient(0).unwrap();

        assert_eq!(
            details.ingredients(),
            &[Ingredient {
                id: 0,
                name: "Sugar".to_string(),
                quantity: 0.0,
                unit: String::new(),
            }]
        );
        assert_eq!(recipe, flour_recipe());
        assert_eq!(details.recipe().ingredients, flour_recipe().ingredients);
    }

    #[test]
    fn test_mount_requires_details_route() {
        assert!(RecipeDetails::mount(&Route::RecipeList).is_err());
    }

    #[test]
    fn test_starts_read_only_with_comments_hidden() {
        let details = RecipeDetails::new(&flour_recipe());
        assert!(!details.is_editing());
        assert!(!details.comments_visible());
        assert_eq!(details.comments_panel(), CommentsPanel::Hidden);
    }

    #[test]
    fn test_edit_mode_hides_comments() {
        let mut details = RecipeDetails::new(&flour_recipe());
        details.toggle_comments();
        assert!(details.comments_visible());

        details.enter_edit();
        assert!(!details.comments_visible());
        details.toggle_comments();
        details.toggle_comments();
        assert!(details.comments_toggled());
        assert!(!details.comments_visible());

        details.save_and_exit(&LogOnlyStore).unwrap();
        assert!(details.comments_visible());
        assert_eq!(
            details.comments_panel(),
            CommentsPanel::Comments(&flour_recipe().comments)
        );
    }

    #[test]
    fn test_leaving_edit_mode_restores_hidden_toggle() {
        let mut details = RecipeDetails::new(&flour_recipe());
        details.enter_edit();
        details.toggle_comments();
        details.toggle_comments();
        details.save_and_exit(&LogOnlyStore).unwrap();
        assert!(!details.comments_visible());
    }

    #[test]
    fn test_count_only_panel() {
        let mut recipe = flour_recipe();
        recipe.comments.clear();
        recipe.comments_loaded = false;
        recipe.comments_count = 8;
        let mut details = RecipeDetails::new(&recipe);
        details.toggle_comments();
        assert_eq!(details.comments_panel(), CommentsPanel::CountOnly(8));
    }

    #[test]
    fn test_save_hands_working_copy_to_store() {
        let store = RecordingStore::default();
        let mut details = RecipeDetails::new(&flour_recipe());
        details.enter_edit();
        details.add_stage().unwrap();
        let bake = StageField::Description("Bake".to_string());
        details.update_stage(1, bake).unwrap();
        details.save_and_exit(&store).unwrap();

        assert!(!details.is_editing());
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].recipe_id, 10);
        assert_eq!(saved[0].stages.len(), 2);
        assert_eq!(saved[0].stages[1].description, "Bake");
        assert_eq!(saved[0].ingredients, flour_recipe().ingredients);
    }

    #[test]
    fn test_failed_save_keeps_edit_mode() {
        let mut details = RecipeDetails::new(&flour_recipe());
        details.enter_edit();
        details.add_ingredient().unwrap();

        let err = details.save_and_exit(&FailingStore).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(details.is_editing());
        assert_eq!(details.ingredients().len(), 2);
    }

    #[test]
    fn test_enter_edit_twice() {
        let mut details = RecipeDetails::new(&flour_recipe());
        details.enter_edit();
        details.enter_edit();
        assert!(details.is_editing());
        assert!(details.stage_list().is_editing());
        assert_eq!(details.ingredients(), flour_recipe().ingredients.as_slice());
    }

    #[test]
    fn test_edits_do_not_touch_counters() {
        let mut details = RecipeDetails::new(&flour_recipe());
        details.enter_edit();
        details.delete_ingredient(0).unwrap();
        details.delete_stage(0).unwrap();
        details.save_and_exit(&LogOnlyStore).unwrap();
        assert_eq!(details.recipe().likes_count, 3);
        assert_eq!(details.recipe().comments_count, 1);
        assert!(details.ingredients().is_empty());
        assert!(details.stages().is_empty());
    }

    #[test]
    fn test_stage_edits_go_through_shared_edit_mode() {
        let mut details = RecipeDetails::new(&flour_recipe());
        assert!(details.shift_stage_orders(1).is_err());
        assert!(details.update_stage_named(0, "order", "3").is_err());

        details.enter_edit();
        details.add_stage().unwrap();
        details.update_stage_named(1, "description", "Bake").unwrap();
        details.update_ingredient_named(0, "quantity", "2,5").unwrap();
        details.shift_stage_orders(1).unwrap();
        assert_eq!(details.stages()[0].order, 2);
        details.renumber_stages().unwrap();

        details.save_and_exit(&LogOnlyStore).unwrap();
        assert!(!details.ingredient_list().is_editing());
        assert!(!details.stage_list().is_editing());
        assert!(details.renumber_stages().is_err());
        let orders: Vec<i64> = details.stages().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert!((details.ingredients()[0].quantity - 2.5).abs() < f64::EPSILON);
    }
}
