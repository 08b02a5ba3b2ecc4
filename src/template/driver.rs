// file: src/template/driver.rs
// version: 1.0.0
// guid: 22047403-d8f2-4914-a828-23c0baa099dd

//! Report-to-template driver
//!
//! A pass runs in three steps. Planning walks the report in document order, parses every
//! line, numbers each `local_fs` interval and renders the final text of each line; no file
//! is touched yet, so a malformed report fails without side effects. Extraction then copies
//! the planned byte ranges, sequentially or concurrently. Assembly joins the rendered lines.
//! Image numbers come from the plan, never from extraction completion order.

use super::{
    assemble::{join_lines, render_line, RewrittenTemplate},
    extract::{partition_image_name, remove_partition_images, ExtractedPartitionImage, ExtractionJob},
    flags::{BootFlag, UnknownFlagWarning},
    grammar::{replace_part_like_isohybrid, IntervalToken, ReportLine, MODIFICATION_DATE},
    units::{ParsedInterval, UnitError},
};
use crate::{
    error::IsoError,
    logging::logger::{operation_span, with_operation_span},
    Result,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Instrument, Span};

/// Fully parsed report awaiting extraction
#[derive(Debug, Clone, Default)]
pub struct TemplatePlan {
    /// Rendered template lines, in report order
    pub lines: Vec<String>,
    /// Extractions, in index order
    pub jobs: Vec<ExtractionJob>,
    pub warnings: Vec<UnknownFlagWarning>,
}

impl TemplatePlan {
    fn finish(self, images: Vec<ExtractedPartitionImage>) -> RewrittenTemplate {
        RewrittenTemplate {
            text: join_lines(&self.lines),
            images,
            warnings: self.warnings,
        }
    }

    fn destinations(&self) -> Vec<PathBuf> {
        self.jobs.iter().map(|job| job.destination.clone()).collect()
    }
}

/// Turns a boot report into an xorriso template, extracting referenced ranges on the way
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    work_dir: PathBuf,
    source_iso: PathBuf,
}

impl TemplateGenerator {
    /// `work_dir` receives `partition-<N>.img`; `source_iso` is the medium the report describes
    pub fn new(work_dir: impl Into<PathBuf>, source_iso: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            source_iso: source_iso.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn source_iso(&self) -> &Path {
        &self.source_iso
    }

    /// Parse and render every line without touching the disk
    pub fn plan(&self, report: &str) -> Result<TemplatePlan> {
        let mut plan = TemplatePlan::default();

        for (offset, raw) in report.lines().enumerate() {
            let number = offset + 1;
            let line = ReportLine::parse(number, raw)
                .map_err(|e| IsoError::format(number, raw.trim(), e.to_string()))?;

            if line.is_dropped() {
                if line.trimmed.starts_with(MODIFICATION_DATE) {
                    debug!("Dropping timestamp line {}", number);
                }
                continue;
            }

            let rendered = match line.token {
                Some(token) => self.rewrite(token, &line.trimmed, number, &mut plan)?,
                None => line.trimmed,
            };

            plan.lines
                .push(replace_part_like_isohybrid(&rendered).into_owned());
        }

        debug!(
            "Planned {} template lines with {} extractions",
            plan.lines.len(),
            plan.jobs.len()
        );
        Ok(plan)
    }

    fn rewrite(
        &self,
        mut token: IntervalToken,
        line: &str,
        number: usize,
        plan: &mut TemplatePlan,
    ) -> Result<String> {
        debug!("Interval descriptor at line {}: {}", number, line);

        let flag = BootFlag::classify(&token.flags)
            .map_err(|e| IsoError::format(number, line, e.to_string()))?;

        match flag {
            BootFlag::LocalFs => {
                let interval = ParsedInterval::parse(&token.interval)
                    .map_err(|e| lift_unit_error(e, number, line))?;

                let index = plan.jobs.len() + 1;
                let destination = self.work_dir.join(partition_image_name(index));
                let destination_text = destination.to_str().ok_or_else(|| {
                    IsoError::config(format!(
                        "Work directory is not valid UTF-8: {}",
                        self.work_dir.display()
                    ))
                })?;
                if destination_text.contains('\'') {
                    return Err(IsoError::config(format!(
                        "Work directory contains a single quote and cannot be quoted in the template: {}",
                        self.work_dir.display()
                    )));
                }

                if Path::new(&token.source) != self.source_iso {
                    debug!(
                        "Report names source {} but extracting from {}",
                        token.source,
                        self.source_iso.display()
                    );
                }

                plan.jobs.push(ExtractionJob {
                    index,
                    source: self.source_iso.clone(),
                    destination: destination.clone(),
                    block_size: interval.block_size_bytes,
                    start_block: interval.start_block,
                    block_count: interval.block_count,
                });

                token.interval = interval.rebased();
                token.source = destination_text.to_string();
            }
            BootFlag::AppendedPartition { .. } => {
                token.flags = flag.canonical();
            }
            BootFlag::Unknown(flags) => {
                warn!(
                    "Unknown interval flags '{}' at line {}; passing the line through unchanged",
                    flags, number
                );
                plan.warnings.push(UnknownFlagWarning {
                    line_number: number,
                    flags,
                });
                return Ok(line.to_string());
            }
        }

        let rendered = render_line(&token);
        debug!("Rewritten line {}: {}", number, rendered);
        Ok(rendered)
    }

    /// Run a full pass, extracting images one after another
    pub fn generate(&self, report: &str) -> Result<RewrittenTemplate> {
        with_operation_span("generate_template", || {
            let plan = self.plan(report)?;
            self.prepare_work_dir(&plan)?;

            let mut images = Vec::with_capacity(plan.jobs.len());
            for job in &plan.jobs {
                match job.run() {
                    Ok(image) => images.push(image),
                    Err(e) => {
                        discard(&plan);
                        return Err(e);
                    }
                }
            }

            info!("Generated template with {} partition images", images.len());
            Ok(plan.finish(images))
        })
    }

    /// Run a full pass with extractions dispatched to the blocking pool concurrently
    pub async fn generate_parallel(&self, report: &str) -> Result<RewrittenTemplate> {
        async {
            let plan = self.plan(report)?;
            self.prepare_work_dir(&plan)?;

            let span = Span::current();
            let handles: Vec<_> = plan
                .jobs
                .iter()
                .cloned()
                .map(|job| {
                    let destination = job.destination.clone();
                    let span = span.clone();
                    (
                        destination,
                        tokio::task::spawn_blocking(move || span.in_scope(|| job.run())),
                    )
                })
                .collect();

            // Await every task before cleaning up so no copy is still writing afterwards
            let mut outcomes = Vec::with_capacity(handles.len());
            for (destination, handle) in handles {
                let outcome = match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(lift_join_error(destination, e)),
                };
                outcomes.push(outcome);
            }

            let mut images = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                match outcome {
                    Ok(image) => images.push(image),
                    Err(e) => {
                        discard(&plan);
                        return Err(e);
                    }
                }
            }

            info!(
                "Generated template with {} partition images (parallel)",
                images.len()
            );
            Ok(plan.finish(images))
        }
        .instrument(operation_span("generate_template"))
        .await
    }

    /// Run [`generate`](Self::generate) on the blocking pool from async code
    pub async fn generate_blocking(&self, report: String) -> Result<RewrittenTemplate> {
        let generator = self.clone();
        tokio::task::spawn_blocking(move || generator.generate(&report))
            .await
            .map_err(|e| lift_join_error(self.work_dir.clone(), e))?
    }

    fn prepare_work_dir(&self, plan: &TemplatePlan) -> Result<()> {
        if !plan.jobs.is_empty() {
            fs::create_dir_all(&self.work_dir)?;
        }
        Ok(())
    }
}

/// Run a sequential pass over `report`
pub fn generate_template(
    report: &str,
    work_dir: impl Into<PathBuf>,
    source_iso: impl Into<PathBuf>,
) -> Result<RewrittenTemplate> {
    TemplateGenerator::new(work_dir, source_iso).generate(report)
}

/// A panicked or cancelled blocking task surfaces as an extraction failure at `path`
fn lift_join_error(path: PathBuf, error: tokio::task::JoinError) -> IsoError {
    IsoError::extraction(path, format!("extraction task failed: {}", error))
}

fn lift_unit_error(error: UnitError, number: usize, line: &str) -> IsoError {
    if error.is_format() {
        IsoError::format(number, line, error.to_string())
    } else {
        IsoError::arithmetic(format!("line {}: {}", number, error))
    }
}

/// Drop every image a failed pass may have written
fn discard(plan: &TemplatePlan) {
    if let Err(e) = remove_partition_images(&plan.destinations()) {
        warn!("Failed to remove partition images after error: {}", e);
    }
}
