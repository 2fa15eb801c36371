use crate::models::Recipe;

/// The two screens of the app and their parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    RecipeList,
    RecipeDetails { recipe: Box<Recipe> },
}

impl Route {
    #[must_use]
    pub fn details(recipe: Recipe) -> Self {
        Route::RecipeDetails {
            recipe: Box::new(recipe),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Route::RecipeList => "RecipeList",
            Route::RecipeDetails { .. } => "RecipeDetails",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Route::RecipeList => "Recipes",
            Route::RecipeDetails { .. } => "Recipe Details",
        }
    }
}

/// Screen stack. The recipe list is always at the bottom.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Route::RecipeList],
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pop the top screen. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        // The root is never popped
        &self.stack[self.stack.len() - 1]
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
