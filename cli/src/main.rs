mod commands;
mod config;
mod http;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use std::process;

use crate::commands::{cmd_browse, cmd_list, cmd_show};
use crate::config::{Config, SourceKind};
use crate::http::HttpRecipeClient;
use cookbook_core::listing::RecipeList;

#[derive(Parser)]
#[command(
    name = "cookbook",
    version,
    about = "Browse and edit recipes",
    long_about = "Browse recipes, read their ingredients, stages and comments, \
and edit ingredients and stages.\n\nRecipes come from --file, --url (or $COOKBOOK_URL), \
a saved local copy, or the bundled set, in that order."
)]
struct Cli {
    /// Read recipes from this JSON file (edits are saved back to it)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Fetch recipes from this backend (GET <URL>/recipes)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
    /// Log saves instead of writing them
    #[arg(long, global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all recipes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recipe details (ingredients, stages, optionally comments)
    Show {
        /// Recipe ID
        id: i64,
        /// Also show comments
        #[arg(short, long)]
        comments: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse recipes interactively
    Browse,
    /// Open a recipe in edit mode
    Edit {
        /// Recipe ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let kind = config.resolve_source(cli.file, cli.url);
    debug!("Recipe source: {kind:?}");

    let (list, origin) = load_list(&kind).await?;
    let store = config.store_for(&kind, cli.dry_run, list.recipes());

    match cli.command {
        Commands::List { json } => cmd_list(&list, &origin, json),
        Commands::Show { id, comments, json } => cmd_show(&list, &origin, id, comments, json),
        Commands::Browse => cmd_browse(&list, store.as_ref(), None, false),
        Commands::Edit { id } => cmd_browse(&list, store.as_ref(), Some(id), true),
    }
}

/// Load the recipe list once. Failures end up in the list's load state.
async fn load_list(kind: &SourceKind) -> Result<(RecipeList, String)> {
    if let SourceKind::Remote(url) = kind {
        let client = HttpRecipeClient::new(url)?;
        let origin = client.url();
        let list = RecipeList::from_result(client.fetch_async().await, &origin);
        return Ok((list, origin));
    }

    let Some(source) = Config::local_source(kind) else {
        anyhow::bail!("No local source for {kind:?}");
    };
    Ok((RecipeList::load(source.as_ref()), source.describe()))
}
