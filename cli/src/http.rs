use anyhow::{Context, Result};
use log::debug;

use cookbook_core::models::Recipe;

const RECIPES_PATH: &str = "recipes";

/// Fetches the recipe list from a remote backend.
pub struct HttpRecipeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecipeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "cookbook-cli/{} (recipe browser)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}/{RECIPES_PATH}", self.base_url)
    }

    pub async fn fetch_async(&self) -> Result<Vec<Recipe>> {
        let url = self.url();
        debug!("Fetching recipes from {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach recipe backend at {url}"))?
            .error_for_status()
            .context("Recipe backend returned an error")?;

        let recipes: Vec<Recipe> = resp
            .json()
            .await
            .context("Failed to parse recipe list response")?;

        Ok(recipes)
    }
}
