use anyhow::{Context, Result};
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::parsers::jetbrains_workspace_parser::JetbrainsWorkspaceParser;
use crate::parsers::tool_versions_parser::ToolVersionsParser;
use crate::parsers::{FileKind, FileRecord, Parser};

/// Directory names never descended into.
const SKIPPED_DIR_NAMES: [&str; 3] = [".git", "vendor", "node_modules"];

/// Environment-derived skip paths, resolved once at startup and passed
/// explicitly into the walk.
#[derive(Debug, Clone)]
pub struct ScanRules {
    pub home: PathBuf,
    pub gopath: Option<PathBuf>,
}

impl ScanRules {
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().context("could not determine the user's home directory")?;
        let gopath = env::var_os("GOPATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Ok(ScanRules { home, gopath })
    }

    fn prunes(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        if let Some(name) = entry.file_name().to_str() {
            if SKIPPED_DIR_NAMES.contains(&name) {
                return true;
            }
        }
        let path = entry.path();
        if self.gopath.as_deref() == Some(path) {
            return true;
        }
        path == self.home.join("Library")
    }

    /// The manifest sitting directly in the home directory pins the
    /// user's machine-wide default, not a project.
    fn is_global_tool_versions(&self, path: &Path) -> bool {
        path == self.home.join(".tool-versions")
    }
}

/// Walks the tree once, pruning skipped directories entirely, and returns
/// every path recognized as one of the two file kinds, in walk order.
/// The root is canonicalized first, so returned paths are absolute even
/// when the caller passes a relative root.
pub fn enumerate(root: &Path, rules: &ScanRules) -> Result<Vec<(PathBuf, FileKind)>> {
    // Rule paths are absolute; a relative root would never compare equal.
    let root = fs::canonicalize(root)
        .with_context(|| format!("cannot read the scan root {}", root.display()))?;
    let tool_versions = ToolVersionsParser::filename_match_regex()?;
    let workspace = JetbrainsWorkspaceParser::filename_match_regex()?;

    let mut found = Vec::new();
    let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
        if rules.prunes(entry) {
            debug!("skipping {} and contents", entry.path().display());
            return false;
        }
        true
    });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let text = path.to_string_lossy();
        if tool_versions.is_match(text.as_ref()) {
            if rules.is_global_tool_versions(path) {
                debug!("skipping global tool-versions file: {}", path.display());
                continue;
            }
            found.push((path.to_path_buf(), FileKind::ToolVersions));
        } else if workspace.is_match(text.as_ref()) {
            found.push((path.to_path_buf(), FileKind::JetbrainsWorkspace));
        }
    }
    debug!("found {} candidate file(s)", found.len());
    Ok(found)
}

/// Enumerates the tree, then extracts the pinned version from every
/// candidate. Extraction I/O failures abort the run; files without a pin
/// stay in the result with no version and are never selected.
pub fn discover(root: &Path, rules: &ScanRules) -> Result<Vec<FileRecord>> {
    let found = enumerate(root, rules)?;
    let mut records = Vec::with_capacity(found.len());
    for (path, kind) in found {
        let record = FileRecord::read(path, kind)?;
        if record.current_version.is_none() {
            debug!("no golang pin in {}", record.path.display());
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rules_for(temp: &TempDir) -> ScanRules {
        // A home outside the walked tree so no home-derived rule fires.
        ScanRules {
            home: temp.path().join("no-such-home"),
            gopath: None,
        }
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_enumerate_finds_both_kinds() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("proj/.tool-versions");
        let workspace = temp.path().join("proj/.idea/workspace.xml");
        write(&manifest, "golang 1.19.3\n");
        write(&workspace, "<project />\n");
        write(&temp.path().join("proj/README.md"), "not a candidate\n");

        let mut found = enumerate(temp.path(), &rules_for(&temp)).unwrap();
        found.sort();
        assert_eq!(
            found,
            vec![
                (workspace, FileKind::JetbrainsWorkspace),
                (manifest, FileKind::ToolVersions),
            ]
        );
    }

    #[test]
    fn test_enumerate_prunes_dev_directories() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("vendor/.tool-versions"), "golang 1.19.3\n");
        write(&temp.path().join(".git/.tool-versions"), "golang 1.19.3\n");
        write(
            &temp.path().join("node_modules/dep/.tool-versions"),
            "golang 1.19.3\n",
        );
        write(&temp.path().join("kept/.tool-versions"), "golang 1.19.3\n");

        let found = enumerate(temp.path(), &rules_for(&temp)).unwrap();
        assert_eq!(
            found,
            vec![(temp.path().join("kept/.tool-versions"), FileKind::ToolVersions)]
        );
    }

    #[test]
    fn test_enumerate_prunes_gopath() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("go/src/.tool-versions"), "golang 1.19.3\n");
        write(&temp.path().join("proj/.tool-versions"), "golang 1.19.3\n");

        let rules = ScanRules {
            home: temp.path().join("no-such-home"),
            gopath: Some(temp.path().join("go")),
        };
        let found = enumerate(temp.path(), &rules).unwrap();
        assert_eq!(
            found,
            vec![(temp.path().join("proj/.tool-versions"), FileKind::ToolVersions)]
        );
    }

    #[test]
    fn test_enumerate_prunes_home_library() {
        let temp = TempDir::new().unwrap();
        write(
            &temp.path().join("Library/Caches/.tool-versions"),
            "golang 1.19.3\n",
        );
        write(&temp.path().join("proj/.tool-versions"), "golang 1.19.3\n");

        let rules = ScanRules {
            home: temp.path().to_path_buf(),
            gopath: None,
        };
        let found = enumerate(temp.path(), &rules).unwrap();
        assert_eq!(
            found,
            vec![(temp.path().join("proj/.tool-versions"), FileKind::ToolVersions)]
        );
    }

    #[test]
    fn test_enumerate_skips_global_tool_versions() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join(".tool-versions"), "golang 1.19.3\n");
        write(&temp.path().join("proj/.tool-versions"), "golang 1.19.3\n");

        let rules = ScanRules {
            home: temp.path().to_path_buf(),
            gopath: None,
        };
        let found = enumerate(temp.path(), &rules).unwrap();
        assert_eq!(
            found,
            vec![(temp.path().join("proj/.tool-versions"), FileKind::ToolVersions)]
        );
    }

    #[test]
    fn test_enumerate_applies_env_rules_from_relative_root() {
        let temp = TempDir::new().unwrap();
        // Default-invocation shape: scanning "./" from inside the home
        // directory, with every environment-derived rule armed.
        let home = temp.path().canonicalize().unwrap();
        write(&home.join(".tool-versions"), "golang 1.19.3\n");
        write(&home.join("Library/Caches/.tool-versions"), "golang 1.19.3\n");
        write(&home.join("go/pkg/mod/.tool-versions"), "golang 1.19.3\n");
        write(&home.join("proj/.tool-versions"), "golang 1.19.3\n");

        let rules = ScanRules {
            home: home.clone(),
            gopath: Some(home.join("go")),
        };
        let previous = env::current_dir().unwrap();
        env::set_current_dir(&home).unwrap();
        let found = enumerate(Path::new("./"), &rules);
        env::set_current_dir(previous).unwrap();

        assert_eq!(
            found.unwrap(),
            vec![(home.join("proj/.tool-versions"), FileKind::ToolVersions)]
        );
    }

    #[test]
    fn test_enumerate_empty_tree() {
        let temp = TempDir::new().unwrap();
        let found = enumerate(temp.path(), &rules_for(&temp)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_enumerate_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nowhere");
        assert!(enumerate(&missing, &rules_for(&temp)).is_err());
    }

    #[test]
    fn test_discover_extracts_versions() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("a/.tool-versions"), "golang 1.19.3\n");
        write(&temp.path().join("b/.tool-versions"), "nodejs 18.16.0\n");

        let mut records = discover(temp.path(), &rules_for(&temp)).unwrap();
        records.sort_by(|left, right| left.path.cmp(&right.path));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].current_version.as_deref(), Some("1.19.3"));
        assert_eq!(records[1].current_version, None);
    }
}
