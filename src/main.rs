use anyhow::{Context, Result};
use clap::Parser;
use gobump::{
    arguments::Arguments,
    prompt,
    scanner::{self, ScanRules},
    selector,
};
use log::{LevelFilter, info};
use semver::Version;
use std::path::Path;

fn main() -> Result<()> {
    let args = Arguments::parse();
    pretty_env_logger::env_logger::builder()
        .filter_level(if args.debug { LevelFilter::Debug } else { LevelFilter::Info })
        .format_timestamp(None)
        .init();

    let target = Version::parse(&args.new_version)
        .context("the version argument must be a valid semantic version, e.g. 1.22.4")?;
    let policy = args.policy();
    info!("version: {target}, policy: {policy:?}");

    let rules = ScanRules::from_env()?;
    let root: &Path = args.path.as_ref();
    let records = scanner::discover(root, &rules)?;
    let candidates = selector::select_updates(records, &target, policy);

    prompt::print_candidates(&candidates);
    if candidates.is_empty() {
        return Ok(());
    }
    if !args.yes && !prompt::confirm_update(&target)? {
        info!("update declined, leaving all files untouched");
        return Ok(());
    }
    for record in &candidates {
        record.rewrite(&target)?;
    }
    info!("updated {} file(s) to golang {}", candidates.len(), target);
    Ok(())
}
