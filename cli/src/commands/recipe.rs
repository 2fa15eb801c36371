use anyhow::{Result, bail};
use log::debug;
use std::io::{self, Write};
use std::process;

use cookbook_core::details::RecipeDetails;
use cookbook_core::listing::RecipeList;

use super::helpers::{json_error, recipe_table, render_details};

fn require_loaded(list: &RecipeList, origin: &str, json: bool) -> Result<()> {
    if let Some(err) = list.error() {
        if json {
            println!("{}", json_error(err));
            process::exit(1);
        }
        bail!("Could not load recipes from {origin}: {err}");
    }
    Ok(())
}

pub(crate) fn cmd_list(list: &RecipeList, origin: &str, json: bool) -> Result<()> {
    require_loaded(list, origin, json)?;

    if list.recipes().is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list.rows())?);
        return Ok(());
    }

    println!("{}", recipe_table(list));
    Ok(())
}

pub(crate) fn cmd_show(
    list: &RecipeList,
    origin: &str,
    id: i64,
    comments: bool,
    json: bool,
) -> Result<()> {
    require_loaded(list, origin, json)?;

    let Some(route) = list.select_id(id) else {
        if json {
            println!("{}", json_error(&format!("Recipe {id} not found")));
        } else {
            eprintln!("Recipe {id} not found");
        }
        process::exit(2);
    };
    debug!("Showing {} for recipe {id}", route.name());

    let mut details = RecipeDetails::mount(&route)?;
    if json {
        println!("{}", serde_json::to_string_pretty(details.recipe())?);
        return Ok(());
    }

    if comments {
        details.toggle_comments();
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_details(&details, &mut out)?;
    out.flush()?;
    Ok(())
}
