use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use cookbook_core::models::Recipe;
use cookbook_core::source::{BundledSource, FileSource, RecipeSource};
use cookbook_core::store::{JsonFileStore, LogOnlyStore, RecipeStore};

/// Fallback for `--url` when the flag is not given.
pub const URL_ENV: &str = "COOKBOOK_URL";

pub struct Config {
    pub data_dir: PathBuf,
    pub recipes_path: PathBuf,
}

/// Where this run reads recipes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Remote(String),
    File(PathBuf),
    Bundled,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "cookbook").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self::at(&data_dir))
    }

    pub fn at(data_dir: &Path) -> Self {
        Config {
            data_dir: data_dir.to_path_buf(),
            recipes_path: data_dir.join("recipes.json"),
        }
    }

    /// Pick a source: explicit file, then URL (flag or environment), then a
    /// previously saved local copy, then the bundled recipes.
    pub fn resolve_source(&self, file: Option<PathBuf>, url: Option<String>) -> SourceKind {
        if let Some(path) = file {
            return SourceKind::File(path);
        }
        if let Some(url) = url.or_else(|| std::env::var(URL_ENV).ok()) {
            return SourceKind::Remote(url);
        }
        if self.recipes_path.exists() {
            return SourceKind::File(self.recipes_path.clone());
        }
        SourceKind::Bundled
    }

    /// Local source for `kind`, or `None` for remote sources, which are
    /// fetched asynchronously.
    pub fn local_source(kind: &SourceKind) -> Option<Box<dyn RecipeSource>> {
        match kind {
            SourceKind::File(path) => Some(Box::new(FileSource::new(path))),
            SourceKind::Bundled => Some(Box::new(BundledSource)),
            SourceKind::Remote(_) => None,
        }
    }

    /// Store that receives saves. A file source is written in place; bundled
    /// and remote recipes are saved into a local copy seeded with `loaded`.
    pub fn store_for(
        &self,
        kind: &SourceKind,
        dry_run: bool,
        loaded: &[Recipe],
    ) -> Box<dyn RecipeStore> {
        if dry_run {
            return Box::new(LogOnlyStore);
        }
        match kind {
            SourceKind::File(path) => Box::new(JsonFileStore::new(path)),
            SourceKind::Bundled | SourceKind::Remote(_) => {
                Box::new(JsonFileStore::new(&self.recipes_path).with_seed(loaded.to_vec()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::models::RecipeEdits;

    #[test]
    fn test_explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        let kind = config.resolve_source(
            Some(PathBuf::from("mine.json")),
            Some("http://example.com".to_string()),
        );
        assert_eq!(kind, SourceKind::File(PathBuf::from("mine.json")));
    }

    #[test]
    fn test_url_flag() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        let kind = config.resolve_source(None, Some("http://example.com".to_string()));
        assert_eq!(kind, SourceKind::Remote("http://example.com".to_string()));
    }

    #[test]
    fn test_saved_copy_before_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        if std::env::var(URL_ENV).is_ok() {
            return;
        }
        assert_eq!(config.resolve_source(None, None), SourceKind::Bundled);

        std::fs::write(&config.recipes_path, "[]").unwrap();
        assert_eq!(
            config.resolve_source(None, None),
            SourceKind::File(config.recipes_path.clone())
        );
    }

    #[test]
    fn test_bundled_saves_go_to_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        let recipes = BundledSource.load().unwrap();
        let store = config.store_for(&SourceKind::Bundled, false, &recipes);

        store
            .save(&RecipeEdits {
                recipe_id: recipes[0].id,
                ingredients: Vec::new(),
                stages: recipes[0].stages.clone(),
            })
            .unwrap();

        let saved = FileSource::new(&config.recipes_path).load().unwrap();
        assert!(saved[0].ingredients.is_empty());
        assert_eq!(saved.len(), recipes.len());
    }

    #[test]
    fn test_remote_save_after_local_copy_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        let bundled = BundledSource.load().unwrap();
        config
            .store_for(&SourceKind::Bundled, false, &bundled)
            .save(&RecipeEdits {
                recipe_id: 1,
                ingredients: Vec::new(),
                stages: bundled[0].stages.clone(),
            })
            .unwrap();

        let mut remote = bundled.clone();
        remote[1].name = "Buckwheat (remote)".to_string();
        remote[2].id = 4;
        let kind = SourceKind::Remote("http://example.com".to_string());
        let store = config.store_for(&kind, false, &remote);
        for recipe in &remote[1..] {
            let edits = RecipeEdits {
                recipe_id: recipe.id,
                ingredients: recipe.ingredients.clone(),
                stages: Vec::new(),
            };
            store.save(&edits).unwrap();
        }

        let saved = FileSource::new(&config.recipes_path).load().unwrap();
        let names: Vec<&str> = saved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Blini with sour cream", "Buckwheat (remote)", "Syrniki", "Syrniki"]
        );
        assert!(saved[0].ingredients.is_empty());
        assert!(saved[1].stages.is_empty());
        assert_eq!(saved[3].id, 4);
        assert!(saved[3].stages.is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::at(dir.path());
        let recipes = BundledSource.load().unwrap();
        let store = config.store_for(&SourceKind::Bundled, true, &recipes);
        store
            .save(&RecipeEdits {
                recipe_id: 1,
                ingredients: Vec::new(),
                stages: Vec::new(),
            })
            .unwrap();
        assert!(!config.recipes_path.exists());
    }

    #[test]
    fn test_local_source() {
        assert!(Config::local_source(&SourceKind::Bundled).is_some());
        assert!(Config::local_source(&SourceKind::Remote("http://x".into())).is_none());
    }
}
