//! Interactive donor browsing.
//!
//! Reads one-letter commands from a line-based input and prints the loaded
//! donor after every move. Store errors are shown and the session goes on.

use std::io::{BufRead, Write};

use tracing::debug;

use super::output::{donor_details, navigation_line};
use crate::controller::Controller;
use crate::error::Result;

/// A command typed at the browse prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Jump to the first donor.
    First,
    /// Step back.
    Previous,
    /// Step forward.
    Next,
    /// Jump to the last donor.
    Last,
    /// Load a donor by id.
    Go(i64),
    /// Show the key legend.
    Help,
    /// Leave the browser.
    Quit,
}

impl BrowseCommand {
    /// Parse a prompt line; `None` for anything unrecognised.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "f" | "first" => Self::First,
            "p" | "prev" | "previous" => Self::Previous,
            "n" | "next" => Self::Next,
            "l" | "last" => Self::Last,
            "g" | "go" => Self::Go(words.next()?.parse().ok()?),
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

/// Run the browse loop until `q` or end of input.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the output cannot be
/// written, or the initial donor list cannot be loaded.
pub fn run_browse<R: BufRead, W: Write>(
    controller: &mut Controller<'_>,
    input: R,
    mut out: W,
) -> Result<()> {
    if controller.load_first()? {
        show(controller, &mut out)?;
    } else {
        writeln!(out, "No donors yet. Add one with `donortrack donor add`.")?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = BrowseCommand::parse(&line) else {
            writeln!(out, "Unknown command: {}", line.trim())?;
            writeln!(out, "{}", navigation_line(controller.navigation()))?;
            continue;
        };
        debug!(?command, "Browse command");

        let moved = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                writeln!(out, "{}", navigation_line(controller.navigation()))?;
                continue;
            }
            BrowseCommand::First => controller.load_first(),
            BrowseCommand::Previous => controller.load_previous(),
            BrowseCommand::Next => controller.load_next(),
            BrowseCommand::Last => controller.load_last(),
            BrowseCommand::Go(id) => controller.load_donor(id).map(|()| true),
        };

        match moved {
            Ok(true) => show(controller, &mut out)?,
            Ok(false) => writeln!(out, "Nowhere to go.")?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }
    Ok(())
}

fn show<W: Write>(controller: &Controller<'_>, out: &mut W) -> Result<()> {
    if let Some(loaded) = controller.loaded() {
        write!(out, "\n{}", donor_details(loaded))?;
    }
    writeln!(out, "{}", navigation_line(controller.navigation()))?;
    Ok(())
}
