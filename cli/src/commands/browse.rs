use anyhow::Result;
use std::io;

use cookbook_core::listing::RecipeList;
use cookbook_core::store::RecipeStore;

use crate::session::Session;

/// Run the interactive session on stdin/stdout, optionally starting on a
/// recipe (and in edit mode).
pub(crate) fn cmd_browse(
    list: &RecipeList,
    store: &dyn RecipeStore,
    open: Option<i64>,
    edit: bool,
) -> Result<()> {
    let mut session = Session::new(list, store);
    if let Some(id) = open {
        session.open(id)?;
        if let Some(details) = session.details_mut().filter(|_| edit) {
            details.enter_edit();
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout.lock())
}
