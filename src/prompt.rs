use anyhow::Result;
use colored::Colorize;
use semver::Version;
use std::io::{self, Write};
use thiserror::Error;

use crate::parsers::FileRecord;

#[derive(Debug, Error)]
enum PromptError {
    #[error("standard input closed before the update was confirmed")]
    InputClosed,
}

/// Prints each candidate as `path: version`, then the count line. The
/// count is printed even when nothing matched.
pub fn print_candidates(candidates: &[FileRecord]) {
    for record in candidates {
        if let Some(version) = record.current_version.as_deref() {
            println!("{}: {}", record.path.display(), version.yellow());
        }
    }
    println!("{} file(s) to update", candidates.len().to_string().bold());
}

/// Blocks for a yes/no answer, re-prompting on anything unrecognized.
/// Returns `false` when the user declines; a closed stdin is an error,
/// since re-prompting would loop forever.
pub fn confirm_update(target: &Version) -> Result<bool> {
    loop {
        print!(
            "Do you want to update the files above to use golang {}? {} ",
            target.to_string().green().bold(),
            "[y/n]".bold()
        );
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err(PromptError::InputClosed.into());
        }
        match parse_answer(&input) {
            Some(answer) => return Ok(answer),
            None => println!("{}", "Please answer y or n.".red()),
        }
    }
}

fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
