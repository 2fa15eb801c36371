use anyhow::{Result, bail};
use serde::Serialize;
use std::io::Write;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use cookbook_core::details::{CommentsPanel, RecipeDetails};
use cookbook_core::listing::RecipeList;
use cookbook_core::models::{Comment, KNOWN_UNITS, is_known_unit};

pub(crate) fn recipe_table(list: &RecipeList) -> String {
    #[derive(Tabled)]
    struct ListRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Author")]
        author: String,
        #[tabled(rename = "Likes")]
        likes: u32,
        #[tabled(rename = "Comments")]
        comments: u32,
    }

    let rows: Vec<ListRow> = list
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, r)| ListRow {
            idx: i + 1,
            name: r.name,
            author: r.author,
            likes: r.likes,
            comments: r.comments,
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}

/// Draw the details screen: read-only text, or numbered rows in edit mode.
pub(crate) fn render_details(details: &RecipeDetails, out: &mut impl Write) -> Result<()> {
    let recipe = details.recipe();
    let name = &recipe.name;
    let author = &recipe.author.name;
    let likes = recipe.likes_count;
    let comments = recipe.comments_count;
    let editing = details.is_editing();

    if editing {
        writeln!(out, "=== {name} === [editing]")?;
    } else {
        writeln!(out, "=== {name} ===")?;
    }
    writeln!(out, "  by {author}  |  likes: {likes}  |  comments: {comments}\n")?;

    writeln!(out, "  INGREDIENTS:")?;
    for (i, ing) in details.ingredients().iter().enumerate() {
        let (iname, qty, unit) = (&ing.name, ing.quantity, &ing.unit);
        if editing {
            let pos = i + 1;
            let iname = if iname.is_empty() { "(new)" } else { iname };
            let custom = if unit.is_empty() || is_known_unit(unit) {
                ""
            } else {
                " (custom unit)"
            };
            writeln!(out, "    [{pos}] {iname} | {qty} | {unit}{custom}")?;
        } else {
            writeln!(out, "    {iname} - {qty} {unit}")?;
        }
    }

    writeln!(out, "\n  STAGES:")?;
    for (i, stage) in details.stages().iter().enumerate() {
        let (order, desc) = (stage.order, &stage.description);
        if editing {
            let pos = i + 1;
            let desc = if desc.is_empty() { "(new)" } else { desc };
            writeln!(out, "    [{pos}] #{order} {desc}")?;
        } else {
            writeln!(out, "    {order}. {desc}")?;
        }
    }

    match details.comments_panel() {
        CommentsPanel::Hidden => {}
        CommentsPanel::Comments(list) => {
            writeln!(out, "\n  COMMENTS:")?;
            if list.is_empty() {
                writeln!(out, "    No comments yet")?;
            }
            for c in list {
                writeln!(out, "    {}", comment_line(c))?;
            }
        }
        CommentsPanel::CountOnly(count) => {
            writeln!(out, "\n  COMMENTS: {count} (not loaded)")?;
        }
    }

    if editing {
        let units = KNOWN_UNITS.join(", ");
        writeln!(out, "\n  Units: {units}")?;
    }

    Ok(())
}

fn comment_line(c: &Comment) -> String {
    let who = &c.author.name;
    let text = &c.content;
    match c.created_at {
        Some(at) => {
            let when = at.format("%Y-%m-%d");
            format!("{who} ({when}): {text}")
        }
        None => format!("{who}: {text}"),
    }
}

/// Turn a 1-based position typed by the user into an index into `len` rows.
pub(crate) fn parse_position(raw: &str, len: usize) -> Result<usize> {
    let Ok(n) = raw.trim().parse::<usize>() else {
        bail!("Invalid position '{raw}'. Use a row number");
    };
    if len == 0 {
        bail!("There are no rows to pick from");
    }
    if n < 1 || n > len {
        bail!("Position {n} out of range (1-{len})");
    }
    Ok(n - 1)
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}
