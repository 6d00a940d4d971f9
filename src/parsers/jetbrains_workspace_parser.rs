use crate::parsers::Parser;
use regex::Regex;
use semver::Version;

/// JetBrains `.idea/workspace.xml` files whose GOROOT component points at
/// a mise-managed toolchain, e.g.
/// `<component name="GOROOT" url="file://$USER_HOME$/.local/share/mise/installs/go/1.22.4/go" />`.
pub struct JetbrainsWorkspaceParser;

/// Component prefix GoLand writes for a home-relative GOROOT.
const JETBRAINS_GOROOT_MARKER: &str = r#"<component name="GOROOT" url="file://$USER_HOME$/"#;

/// Install prefix used by mise; the pinned version is the path segment
/// between this prefix and the `/go` distribution directory.
const MISE_GO_INSTALL_PATH: &str = ".local/share/mise/installs/go/";

impl Parser for JetbrainsWorkspaceParser {
    fn filename_match_regex() -> anyhow::Result<Regex> {
        Ok(Regex::new(r"[/\\]\.idea[/\\](?:.*[/\\])?workspace\.xml$")?)
    }

    fn version_match_regex() -> anyhow::Result<Regex> {
        let marker = format!(
            "{}{}",
            regex::escape(JETBRAINS_GOROOT_MARKER),
            regex::escape(MISE_GO_INSTALL_PATH)
        );
        Ok(Regex::new(&format!(
            r"(?P<marker>{marker})(?P<version>\d+(?:\.\d+)+)/go"
        ))?)
    }

    fn replacement_format(target: &Version) -> anyhow::Result<String> {
        Ok(format!("${{marker}}{target}/go"))
    }
}
