use crate::parsers::Parser;
use regex::Regex;
use semver::Version;

/// `.tool-versions` manifests as written by asdf and mise: one
/// `tool version` pair per line.
pub struct ToolVersionsParser;

impl Parser for ToolVersionsParser {
    fn filename_match_regex() -> anyhow::Result<Regex> {
        Ok(Regex::new(r"[/\\]\.tool-versions$")?)
    }

    fn version_match_regex() -> anyhow::Result<Regex> {
        // The pin is the whole dotted token after the line-start marker;
        // `rest` keeps trailing text (comments, CR) intact on rewrite.
        Ok(Regex::new(
            r"(?m)^(?P<marker>golang[ \t]+)(?P<version>\d+(?:\.\d+)+)(?P<rest>$|[ \t\r][^\n]*)",
        )?)
    }

    fn replacement_format(target: &Version) -> anyhow::Result<String> {
        Ok(format!("${{marker}}{target}${{rest}}"))
    }
}
