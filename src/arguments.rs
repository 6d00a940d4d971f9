use clap::Parser;

use crate::selector::UpdatePolicy;

#[derive(Debug, Parser)]
#[command(version, about, bin_name = "gobump")]
pub struct Arguments {
    /// Golang version to update the pinned files to (e.g. 1.22.4)
    pub new_version: String,
    /// Do not maintain minor versions, force update all pinned files
    #[arg(long, conflicts_with = "minor")]
    pub all: bool,
    /// Also move pins from the minor version below the target (1.19.x to 1.20)
    #[arg(long, conflicts_with = "all")]
    pub minor: bool,
    /// Debug logs to help
    #[arg(long)]
    pub debug: bool,
    /// Root directory to scan
    #[arg(long, short, default_value = "./")]
    pub path: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

impl Arguments {
    /// The single policy in force. Clap has already rejected
    /// `--all --minor` at parse time, so the order here never decides.
    pub fn policy(&self) -> UpdatePolicy {
        if self.all {
            UpdatePolicy::All
        } else if self.minor {
            UpdatePolicy::MinorBump
        } else {
            UpdatePolicy::SameMajorMinor
        }
    }
}
