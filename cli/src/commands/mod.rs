mod browse;
mod helpers;
mod recipe;

pub(crate) use browse::cmd_browse;
pub(crate) use helpers::{parse_position, recipe_table, render_details};
pub(crate) use recipe::{cmd_list, cmd_show};
