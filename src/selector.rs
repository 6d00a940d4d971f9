use log::{debug, warn};
use semver::Version;
use std::fmt;

use crate::parsers::FileRecord;

/// Which discovered files a run is allowed to touch. Exactly one policy
/// is in force; the CLI layer rejects conflicting flags before any file
/// is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Only files already pinned to the target's major.minor family.
    #[default]
    SameMajorMinor,
    /// Every file with a pinned version, regardless of family.
    All,
    /// The target's family plus files pinned to the minor version
    /// immediately preceding it (moving 1.19.x pins to a 1.20 target).
    MinorBump,
}

/// The first two components of a version, the granularity at which pins
/// are considered the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorMinor {
    pub major: u64,
    pub minor: u64,
}

impl MajorMinor {
    pub fn of(version: &Version) -> Self {
        MajorMinor {
            major: version.major,
            minor: version.minor,
        }
    }

    /// Lenient truncation of a pinned token: the first two dotted numeric
    /// components, or `None` when the token has no such prefix.
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some(MajorMinor { major, minor })
    }

    /// The family one minor below this one; `None` at minor 0.
    pub fn previous_minor(self) -> Option<Self> {
        let minor = self.minor.checked_sub(1)?;
        Some(MajorMinor {
            major: self.major,
            minor,
        })
    }
}

impl fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Returns the records that require a rewrite: pinned files matching the
/// policy whose exact version differs from the target. Records without a
/// pin are never selected.
pub fn select_updates(
    records: Vec<FileRecord>,
    target: &Version,
    policy: UpdatePolicy,
) -> Vec<FileRecord> {
    let target_family = MajorMinor::of(target);
    let source_epoch = match policy {
        UpdatePolicy::MinorBump => match target_family.previous_minor() {
            Some(epoch) => {
                debug!("minor-bump: also matching files pinned to {epoch}");
                Some(epoch)
            }
            None => {
                warn!("minor-bump: target minor version is 0, no earlier minor to match");
                None
            }
        },
        _ => None,
    };
    let target_token = target.to_string();

    records
        .into_iter()
        .filter(|record| {
            let Some(current) = record.current_version.as_deref() else {
                return false;
            };
            if current == target_token {
                return false;
            }
            let family = MajorMinor::parse(current);
            match policy {
                UpdatePolicy::All => true,
                UpdatePolicy::SameMajorMinor => family == Some(target_family),
                UpdatePolicy::MinorBump => {
                    family == Some(target_family)
                        || source_epoch.is_some_and(|epoch| family == Some(epoch))
                }
            }
        })
        .collect()
}
