//! Scans a directory tree for pinned golang toolchain versions
//! (`.tool-versions` manifests and JetBrains `.idea/workspace.xml`
//! files) and rewrites them in place to a new target version.

pub mod arguments;
pub mod parsers;
pub mod prompt;
pub mod scanner;
pub mod selector;
