//! Batch processing: one JSON outline per input PDF.
//!
//! Per-document extraction failures are logged and recorded; they never stop
//! the batch. Failing to write output does.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect;
use crate::error::{Error, Result};
use crate::outline::{HeuristicConfig, OutlinePipeline};
use crate::parser::{extract_file, ExtractOptions};
use crate::render::{to_json, JsonFormat};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Where JSON records are written (created if missing)
    pub output_dir: PathBuf,
    /// JSON layout
    pub format: JsonFormat,
    /// Process documents on the rayon pool
    pub parallel: bool,
    /// Extraction options
    pub extract: ExtractOptions,
    /// Heading thresholds
    pub heuristics: HeuristicConfig,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: JsonFormat::default(),
            parallel: true,
            extract: ExtractOptions::default(),
            heuristics: HeuristicConfig::default(),
        }
    }
}

impl BatchOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the JSON layout.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set heading thresholds.
    pub fn with_heuristics(mut self, config: HeuristicConfig) -> Self {
        self.heuristics = config;
        self
    }
}

/// What happened to one input.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// Outline written to this path
    Written(PathBuf),
    /// No text found; nothing written
    Empty,
    /// Extraction failed; nothing written
    Failed(Error),
}

/// One input and its outcome.
#[derive(Debug)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub outcome: DocumentOutcome,
}

/// Outcomes of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Number of outlines written.
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Written(_)))
    }

    /// Number of documents without text.
    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Empty))
    }

    /// Number of documents that failed to extract.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed(_)))
    }

    /// Inputs that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.documents.iter().filter_map(|d| match &d.outcome {
            DocumentOutcome::Failed(e) => Some((d.input.as_path(), e)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Resolve an input path to the PDFs to process.
///
/// A file is returned as-is. A directory yields its `.pdf` files (any case,
/// not recursive) in sorted order.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        // Surfaces NotFound for missing paths
        fs::metadata(input)?;
        return Ok(vec![input.to_path_buf()]);
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && detect::has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();

    log::debug!("Found {} PDFs in {}", inputs.len(), input.display());
    Ok(inputs)
}

/// Output path for an input: `<output_dir>/<stem>.json`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Output {
        path: dir.to_path_buf(),
        source,
    })
}

/// Extract, analyze and write one document.
///
/// Extraction errors become [`DocumentOutcome::Failed`]; only output errors
/// are returned as `Err`.
pub fn process_document(
    input: &Path,
    pipeline: &OutlinePipeline,
    options: &BatchOptions,
) -> Result<DocumentOutcome> {
    let doc = match extract_file(input, &options.extract) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("{}: {}", input.display(), e);
            return Ok(DocumentOutcome::Failed(e));
        }
    };

    let Some(outline) = pipeline.run(&doc) else {
        log::info!("{}: no text found, skipping", input.display());
        return Ok(DocumentOutcome::Empty);
    };

    let json = to_json(&outline, options.format)?;
    let path = output_path_for(input, &options.output_dir);
    fs::write(&path, json).map_err(|source| Error::Output {
        path: path.clone(),
        source,
    })?;

    log::info!(
        "{}: {} headings, title {:?} -> {}",
        input.display(),
        outline.len(),
        outline.title,
        path.display()
    );

    Ok(DocumentOutcome::Written(path))
}

/// Process every PDF under `input`.
pub fn run_batch(input: &Path, options: &BatchOptions) -> Result<BatchReport> {
    let inputs = collect_inputs(input)?;
    run_batch_with_progress(&inputs, options, |_, _| {})
}

/// Process a list of inputs, calling `progress` after each document.
///
/// The report keeps the order of `inputs` even when running in parallel.
pub fn run_batch_with_progress<F>(
    inputs: &[PathBuf],
    options: &BatchOptions,
    progress: F,
) -> Result<BatchReport>
where
    F: Fn(&Path, &DocumentOutcome) + Sync,
{
    let pipeline = OutlinePipeline::new(options.heuristics.clone())?;
    ensure_output_dir(&options.output_dir)?;

    let process = |input: &PathBuf| -> Result<DocumentReport> {
        let outcome = process_document(input, &pipeline, options)?;
        progress(input, &outcome);
        Ok(DocumentReport {
            input: input.clone(),
            outcome,
        })
    };

    let documents = if options.parallel {
        inputs.par_iter().map(process).collect::<Result<Vec<_>>>()?
    } else {
        inputs.iter().map(process).collect::<Result<Vec<_>>>()?
    };

    let report = BatchReport { documents };
    log::info!(
        "Batch done: {} written, {} empty, {} failed",
        report.written(),
        report.empty(),
        report.failed()
    );

    Ok(report)
}
