use clap::Subcommand;

use super::{CmdResult, Context};
use studyplan_core::Session;

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the notepad
    Show,
    /// Replace the notepad content
    Save {
        /// New content
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

pub fn run(action: NotesAction) -> CmdResult {
    let ctx = Context::open()?;
    let session = Session::load(&ctx.store)?;
    match action {
        NotesAction::Show => match session.load_notes(&ctx.store)? {
            Some(notes) => println!("{notes}"),
            None => println!("(empty)"),
        },
        NotesAction::Save { text } => {
            session.save_notes(&ctx.store, &text.join(" "))?;
            println!("Notes saved");
        }
    }
    Ok(())
}
