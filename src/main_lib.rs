// Library module containing testable functions behind the CLI subcommands

use std::io::Write;
use std::path::Path;

use crate::dashboard::RepoDashboard;
use crate::error::Result;
use crate::summary;
use crate::tree::PathTree;

/// Write the collapsed tree for `paths`, as an indented outline or as JSON
pub fn write_tree<W: Write>(out: &mut W, paths: &[String], json: bool) -> Result<()> {
    let tree = PathTree::build(paths);

    if json {
        serde_json::to_writer_pretty(&mut *out, &tree)?;
        writeln!(out)?;
    } else if tree.is_empty() {
        writeln!(out, "/")?;
    } else {
        write!(out, "{}", tree.to_text())?;
    }

    Ok(())
}

/// Write the plain-text dashboard outline for a summary file
pub fn write_outline<W: Write>(out: &mut W, summary_path: &Path, repo: &str) -> Result<()> {
    let summary = summary::load_summary(summary_path)?;
    let dashboard = RepoDashboard::new(repo, summary);
    write!(out, "{}", dashboard.outline())?;
    Ok(())
}
