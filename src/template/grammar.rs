// file: src/template/grammar.rs
// version: 1.0.0
// guid: 1e56ab7a-2d18-4aab-bd1b-a31eea37ce9f

//! Boot report line grammar
//!
//! An interval descriptor in an `xorriso -report_el_torito as_mkisofs` report has the shape
//!
//! ```text
//! <prefix> --interval:<flags>:<interval>:<zeroizers>:<source> <suffix>
//! ```
//!
//! where `<source>` is either a single-quoted string or a whitespace-free bare token.
//! Parsing happens in stages (marker, three colon fields, source, suffix) so that each
//! failure surfaces as its own [`GrammarError`] variant.

use std::borrow::Cow;
use thiserror::Error;

/// Marker that introduces an interval descriptor
pub const INTERVAL_MARKER: &str = "--interval:";

/// Lines starting with this option carry a build timestamp and are dropped
pub const MODIFICATION_DATE: &str = "--modification-date";

/// Partition flag emitted by xorriso that must not be replayed verbatim
pub const PART_LIKE_ISOHYBRID: &str = "-part_like_isohybrid";

/// Replacement for [`PART_LIKE_ISOHYBRID`]
pub const APPENDED_PART_AS_GPT: &str = "-appended_part_as_gpt";

/// Stage-level failures while splitting an interval descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("missing '{0}' field after --interval:")]
    MissingField(&'static str),

    #[error("whitespace inside the '{0}' field")]
    WhitespaceInField(&'static str),

    #[error("unterminated quote in source field")]
    UnterminatedQuote,

    #[error("stray quote inside unquoted source '{0}'")]
    StrayQuote(String),

    #[error("source field is empty")]
    EmptySource,
}

/// A parsed `--interval:` descriptor together with the text surrounding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalToken {
    /// Text before the marker, trimmed
    pub prefix: String,
    /// Flags field (`local_fs`, `appended_partition_<N>...`, or anything else)
    pub flags: String,
    /// Raw interval descriptor such as `16s-31s`
    pub interval: String,
    /// Zeroizer list, passed through untouched
    pub zeroizers: String,
    /// Source path with surrounding quotes removed
    pub source: String,
    /// Text after the source, leading whitespace removed
    pub suffix: String,
}

impl IntervalToken {
    /// Parse a single line.
    ///
    /// Returns `Ok(None)` when the line has no interval marker at all.
    pub fn parse(line: &str) -> Result<Option<Self>, GrammarError> {
        let Some(marker_at) = line.find(INTERVAL_MARKER) else {
            return Ok(None);
        };

        let prefix = line[..marker_at].trim().to_string();
        let mut rest = &line[marker_at + INTERVAL_MARKER.len()..];

        let flags = take_colon_field(&mut rest, "flags")?;
        let interval = take_colon_field(&mut rest, "interval")?;
        let zeroizers = take_colon_field(&mut rest, "zeroizers")?;
        let (source, suffix) = split_source(rest)?;

        Ok(Some(Self {
            prefix,
            flags: flags.to_string(),
            interval: interval.to_string(),
            zeroizers: zeroizers.to_string(),
            source: source.to_string(),
            suffix: suffix.to_string(),
        }))
    }
}

fn take_colon_field<'a>(rest: &mut &'a str, name: &'static str) -> Result<&'a str, GrammarError> {
    let (field, tail) = rest
        .split_once(':')
        .ok_or(GrammarError::MissingField(name))?;

    if field.chars().any(char::is_whitespace) {
        return Err(GrammarError::WhitespaceInField(name));
    }

    *rest = tail;
    Ok(field)
}

/// Split the remainder after the zeroizers field into `(source, suffix)`
fn split_source(rest: &str) -> Result<(&str, &str), GrammarError> {
    if let Some(quoted) = rest.strip_prefix('\'') {
        let close = quoted.find('\'').ok_or(GrammarError::UnterminatedQuote)?;
        let source = &quoted[..close];
        if source.is_empty() {
            return Err(GrammarError::EmptySource);
        }
        return Ok((source, quoted[close + 1..].trim_start()));
    }

    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let source = &rest[..end];
    if source.is_empty() {
        return Err(GrammarError::EmptySource);
    }
    if source.contains('\'') {
        return Err(GrammarError::StrayQuote(source.to_string()));
    }

    Ok((source, rest[end..].trim_start()))
}

/// One line of a boot report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// 1-based position in the report
    pub number: usize,
    pub raw: String,
    pub trimmed: String,
    pub token: Option<IntervalToken>,
}

impl ReportLine {
    /// Classify a raw report line. Timestamp lines are never tokenized.
    pub fn parse(number: usize, raw: &str) -> Result<Self, GrammarError> {
        let trimmed = raw.trim();
        let token = if trimmed.starts_with(MODIFICATION_DATE) {
            None
        } else {
            IntervalToken::parse(trimmed)?
        };

        Ok(Self {
            number,
            raw: raw.to_string(),
            trimmed: trimmed.to_string(),
            token,
        })
    }

    /// Whether the line must be left out of the template entirely
    pub fn is_dropped(&self) -> bool {
        self.trimmed.is_empty() || self.trimmed.starts_with(MODIFICATION_DATE)
    }
}

/// Swap `-part_like_isohybrid` for `-appended_part_as_gpt`, leaving the rest of the line alone
pub fn replace_part_like_isohybrid(line: &str) -> Cow<'_, str> {
    if line.contains(PART_LIKE_ISOHYBRID) {
        Cow::Owned(line.replace(PART_LIKE_ISOHYBRID, APPENDED_PART_AS_GPT))
    } else {
        Cow::Borrowed(line)
    }
}
