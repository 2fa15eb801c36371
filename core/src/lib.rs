pub mod details;
pub mod editor;
pub mod listing;
pub mod models;
pub mod navigation;
pub mod source;
pub mod store;

pub use details::{CommentsPanel, RecipeDetails};
pub use editor::{EditableList, IngredientField, Row, StageField};
pub use listing::{LoadState, RecipeList, RecipeListRow};
pub use models::{Author, Comment, Ingredient, Recipe, RecipeEdits, Stage};
pub use navigation::{Navigator, Route};
pub use source::{BundledSource, FileSource, RecipeSource, StaticSource};
pub use store::{JsonFileStore, LogOnlyStore, RecipeStore};
