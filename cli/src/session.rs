//! Line-driven navigation shell.
//!
//! Each input line is one user event. The session keeps the screen stack
//! and the open details screen, applies the event, and redraws.

use anyhow::{Result, anyhow, bail};
use log::{debug, info};
use std::io::{BufRead, Write};

use cookbook_core::details::RecipeDetails;
use cookbook_core::listing::RecipeList;
use cookbook_core::navigation::{Navigator, Route};
use cookbook_core::store::RecipeStore;

use crate::commands::{parse_position, recipe_table, render_details};

const LIST_HELP: &str = "\
Commands:
  <n>        open recipe number n
  list       redraw the list
  help       show this help
  quit       leave";

const DETAILS_HELP: &str = "\
Commands:
  edit                                  start editing ingredients and stages
  comments                              show or hide comments
  add ingredient|stage                  append an empty row
  del ingredient|stage <n>              delete row n
  set ingredient <n> name|quantity|unit <value>
  set stage <n> order|description <value>
  shift <order>                         move stages at or after <order> down by one
  renumber                              number stages 1..n in list order
  save                                  save changes and stop editing
  show                                  redraw
  back                                  return to the list
  quit                                  leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Ingredient,
    Stage,
}

impl RowKind {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "ingredient" | "ingredients" | "i" => Ok(RowKind::Ingredient),
            "stage" | "stages" | "s" => Ok(RowKind::Stage),
            _ => bail!("Expected 'ingredient' or 'stage', got '{raw}'"),
        }
    }
}

pub struct Session<'a> {
    list: &'a RecipeList,
    store: &'a dyn RecipeStore,
    nav: Navigator,
    details: Option<RecipeDetails>,
}

impl<'a> Session<'a> {
    pub fn new(list: &'a RecipeList, store: &'a dyn RecipeStore) -> Self {
        Self {
            list,
            store,
            nav: Navigator::new(),
            details: None,
        }
    }

    /// Jump straight to the details of recipe `id`.
    pub fn open(&mut self, id: i64) -> Result<()> {
        let Some(route) = self.list.select_id(id) else {
            bail!("Recipe {id} not found");
        };
        self.push(route)
    }

    pub fn details_mut(&mut self) -> Option<&mut RecipeDetails> {
        self.details.as_mut()
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        self.draw(out)?;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("{} <- {line}", self.nav.current().name());
            match self.handle(line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "Error: {e:#}")?,
            }
        }
        if self.details.as_ref().is_some_and(RecipeDetails::is_editing) {
            writeln!(out, "Unsaved changes discarded")?;
        }
        out.flush()?;
        Ok(())
    }

    fn push(&mut self, route: Route) -> Result<()> {
        self.details = Some(RecipeDetails::mount(&route)?);
        self.nav.navigate(route);
        Ok(())
    }

    fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\n--- {} ---", self.nav.current().title())?;
        match &self.details {
            Some(details) => render_details(details, out)?,
            None => {
                if let Some(err) = self.list.error() {
                    writeln!(out, "Could not load recipes: {err}")?;
                } else if self.list.recipes().is_empty() {
                    writeln!(out, "No recipes found")?;
                } else {
                    writeln!(out, "{}", recipe_table(self.list))?;
                }
            }
        }
        Ok(())
    }

    fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if matches!(words[0], "quit" | "q" | "exit") {
            return Ok(Flow::Quit);
        }
        if self.details.is_some() {
            self.handle_details(line, &words, out)?;
        } else {
            self.handle_list(&words, out)?;
        }
        Ok(Flow::Continue)
    }

    fn handle_list<W: Write>(&mut self, words: &[&str], out: &mut W) -> Result<()> {
        match words[0] {
            "help" | "?" => writeln!(out, "{LIST_HELP}")?,
            "list" | "ls" => self.draw(out)?,
            raw => {
                let index = parse_position(raw, self.list.recipes().len())?;
                let Some(route) = self.list.select(index) else {
                    bail!("Recipe {raw} not found");
                };
                self.push(route)?;
                self.draw(out)?;
            }
        }
        Ok(())
    }

    fn handle_details<W: Write>(&mut self, line: &str, words: &[&str], out: &mut W) -> Result<()> {
        let store = self.store;
        let Some(details) = self.details.as_mut() else {
            bail!("No recipe is open");
        };

        match words[0] {
            "help" | "?" => {
                writeln!(out, "{DETAILS_HELP}")?;
                return Ok(());
            }
            "show" => {}
            "back" => {
                if details.is_editing() {
                    writeln!(out, "Unsaved changes discarded")?;
                }
                self.details = None;
                self.nav.back();
            }
            "edit" => details.enter_edit(),
            "comments" | "c" => details.toggle_comments(),
            "save" => {
                details.save_and_exit(store)?;
                info!("Saved recipe {}", details.recipe().id);
                writeln!(out, "Saved")?;
            }
            "add" => {
                let kind = RowKind::parse(arg(words, 1, "add ingredient|stage")?)?;
                match kind {
                    RowKind::Ingredient => details.add_ingredient()?,
                    RowKind::Stage => details.add_stage()?,
                }
            }
            "del" | "delete" => {
                let kind = RowKind::parse(arg(words, 1, "del ingredient|stage <n>")?)?;
                let raw = arg(words, 2, "del ingredient|stage <n>")?;
                require_editing(details)?;
                match kind {
                    RowKind::Ingredient => {
                        let index = parse_position(raw, details.ingredients().len())?;
                        details.delete_ingredient(index)?;
                    }
                    RowKind::Stage => {
                        let index = parse_position(raw, details.stages().len())?;
                        details.delete_stage(index)?;
                    }
                }
            }
            "set" => {
                let usage = "set ingredient|stage <n> <field> <value>";
                let kind = RowKind::parse(arg(words, 1, usage)?)?;
                let raw = arg(words, 2, usage)?;
                let field = arg(words, 3, usage)?;
                let value = rest_after(line, 4);
                require_editing(details)?;
                match kind {
                    RowKind::Ingredient => {
                        let index = parse_position(raw, details.ingredients().len())?;
                        details.update_ingredient_named(index, field, value)?;
                    }
                    RowKind::Stage => {
                        let index = parse_position(raw, details.stages().len())?;
                        details.update_stage_named(index, field, value)?;
                    }
                }
            }
            "shift" => {
                let raw = arg(words, 1, "shift <order>")?;
                let Ok(order) = raw.parse::<i64>() else {
                    bail!("Invalid stage order '{raw}'");
                };
                details.shift_stage_orders(order)?;
            }
            "renumber" => details.renumber_stages()?,
            other => bail!("Unknown command '{other}'. Type 'help' for commands"),
        }

        self.draw(out)?;
        Ok(())
    }
}

fn require_editing(details: &RecipeDetails) -> Result<()> {
    if !details.is_editing() {
        bail!("Not in edit mode. Type 'edit' first");
    }
    Ok(())
}

fn arg<'w>(words: &[&'w str], index: usize, usage: &str) -> Result<&'w str> {
    words
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("Usage: {usage}"))
}

/// Everything after the first `skip` words of `line`, with inner spacing
/// kept as typed.
fn rest_after(line: &str, skip: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}
