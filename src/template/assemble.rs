// file: src/template/assemble.rs
// version: 1.0.0
// guid: 7969aa82-c00f-4b5e-a332-ac8442bf7aae

//! Line and template reassembly

use super::{
    extract::ExtractedPartitionImage, flags::UnknownFlagWarning, grammar::IntervalToken,
    spacing::Spacers,
};
use serde::Serialize;
use std::path::PathBuf;

/// Rebuild a report line around an interval token.
///
/// The source is always emitted single-quoted.
pub fn render_line(token: &IntervalToken) -> String {
    let spacers = Spacers::between(&token.prefix, &token.suffix);
    format!(
        "{prefix}{space_before}--interval:{flags}:{interval}:{zeroizers}:'{source}'{space_after}{suffix}",
        prefix = token.prefix,
        space_before = spacers.before,
        flags = token.flags,
        interval = token.interval,
        zeroizers = token.zeroizers,
        source = token.source,
        space_after = spacers.after,
        suffix = token.suffix,
    )
}

/// Join processed lines into one flat template, skipping empty ones
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut template = String::new();
    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }
        if !template.is_empty() {
            template.push(' ');
        }
        template.push_str(line);
    }
    template
}

/// Output of a report-to-template pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenTemplate {
    /// Single-line xorriso argument string
    pub text: String,
    /// Partition images referenced by `text`, in index order
    pub images: Vec<ExtractedPartitionImage>,
    pub warnings: Vec<UnknownFlagWarning>,
}

impl RewrittenTemplate {
    /// Paths of the extracted images; the caller removes them after the build
    pub fn image_paths(&self) -> Vec<PathBuf> {
        self.images.iter().map(|image| image.path.clone()).collect()
    }
}

impl std::fmt::Display for RewrittenTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
