use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use semver::Version;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub mod jetbrains_workspace_parser;
pub mod tool_versions_parser;

use jetbrains_workspace_parser::JetbrainsWorkspaceParser;
use tool_versions_parser::ToolVersionsParser;

/// Per-kind hooks for recognizing a file, locating its golang pin and
/// rewriting it.
///
/// `version_match_regex` must expose two named capture groups: `marker`
/// (the literal text anchoring the pin) and `version` (the dotted version
/// token). `replacement_format` re-emits the marker around the new
/// version, so a single first-occurrence `Regex::replace` performs the
/// whole rewrite.
pub trait Parser {
    fn filename_match_regex() -> Result<Regex>;
    fn version_match_regex() -> Result<Regex>;
    fn replacement_format(target: &Version) -> Result<String>;

    /// Scans the file line by line and returns the first pinned version,
    /// or `None` when no line carries the pin.
    fn extract_version(path: impl AsRef<Path>) -> Result<Option<String>> {
        let path = path.as_ref();
        let version_regex = Self::version_match_regex()?;
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if let Some(captures) = version_regex.captures(&line) {
                if let Some(version) = captures.name("version") {
                    debug!("found golang {} in {}", version.as_str(), path.display());
                    return Ok(Some(version.as_str().to_string()));
                }
            }
        }
        Ok(None)
    }

    /// Replaces the first occurrence of the pin with the target version
    /// and writes the file back in place.
    fn rewrite(path: impl AsRef<Path>, target: &Version) -> Result<()> {
        let path = path.as_ref();
        let version_regex = Self::version_match_regex()?;
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let replacement = Self::replacement_format(target)?;
        match version_regex.replace(&contents, replacement.as_str()) {
            Cow::Owned(updated) => {
                fs::write(path, updated)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                debug!("rewrote {} to golang {}", path.display(), target);
            }
            Cow::Borrowed(_) => {
                warn!("no golang pin left to rewrite in {}", path.display());
            }
        }
        Ok(())
    }
}

/// The two recognized file kinds, assigned during enumeration and carried
/// on each record so extraction and rewriting dispatch without re-probing
/// the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileKind {
    ToolVersions,
    JetbrainsWorkspace,
}

impl FileKind {
    pub fn extract_version(self, path: &Path) -> Result<Option<String>> {
        match self {
            FileKind::ToolVersions => ToolVersionsParser::extract_version(path),
            FileKind::JetbrainsWorkspace => JetbrainsWorkspaceParser::extract_version(path),
        }
    }

    pub fn rewrite(self, path: &Path, target: &Version) -> Result<()> {
        match self {
            FileKind::ToolVersions => ToolVersionsParser::rewrite(path, target),
            FileKind::JetbrainsWorkspace => JetbrainsWorkspaceParser::rewrite(path, target),
        }
    }
}

/// One discovered file and the golang version currently pinned in it.
/// `current_version` is `None` when the file carries no pin; such records
/// are never selected for update.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub kind: FileKind,
    pub current_version: Option<String>,
}

impl FileRecord {
    /// Builds the record for an enumerated file by extracting its pin.
    pub fn read(path: PathBuf, kind: FileKind) -> Result<Self> {
        let current_version = kind.extract_version(&path)?;
        Ok(FileRecord {
            path,
            kind,
            current_version,
        })
    }

    pub fn rewrite(&self, target: &Version) -> Result<()> {
        self.kind.rewrite(&self.path, target)
    }
}
