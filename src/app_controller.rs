use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::analysis::{AnalysisReport, LevelAnalyzer};
use crate::app_config::{Config, OutputFormat};
use crate::errors::GENERIC_FAILURE_MESSAGE;
use crate::file_utils::FileManager;
use crate::lemmatizer::RuleLemmatizer;
use crate::lexicon::{CefrLevel, ReferenceLexicon};
use crate::predictor::NaiveBayesModel;

// @module: Application controller for subtitle level analysis

const BAR_WIDTH: usize = 20;

/// Outcome of one file in a folder run
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Path of the subtitle file
    pub file: String,
    /// Report when the analysis succeeded
    pub report: Option<AnalysisReport>,
    /// User-facing failure message; details are only logged
    pub error: Option<String>,
}

/// Summary of a folder run
#[derive(Debug, Clone, Serialize, Default)]
pub struct FolderSummary {
    pub files: Vec<FileOutcome>,
    pub analyzed: usize,
    pub failed: usize,
    /// Number of files predicted at each level
    pub by_level: BTreeMap<CefrLevel, usize>,
}

/// Main application controller for subtitle level analysis
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Pipeline with loaded resources
    analyzer: LevelAnalyzer,
}

impl Controller {
    // @method: Create a new controller, loading lexicon, lemmatizer exceptions and model once
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let resources = &config.resources;
        let lexicon = ReferenceLexicon::load(&resources.lexicon_path)
            .with_context(|| format!("Failed to load lexicon from {}", resources.lexicon_path))?;
        if lexicon.is_empty() {
            warn!("Lexicon at {} contains no words; every count will be zero", resources.lexicon_path);
        }

        let mut lemmatizer = RuleLemmatizer::for_lexicon(&lexicon);
        if let Some(exceptions_path) = &resources.exceptions_path {
            lemmatizer = lemmatizer
                .with_exceptions_file(exceptions_path)
                .with_context(|| format!("Failed to load lemmatizer exceptions from {}", exceptions_path))?;
        }

        let model = NaiveBayesModel::load(&resources.model_path)
            .with_context(|| format!("Failed to load model from {}", resources.model_path))?;

        info!(
            "Loaded lexicon ({} words) and model ({} features)",
            lexicon.len(),
            model.features().len()
        );

        let analyzer = LevelAnalyzer::new(
            Arc::new(lexicon),
            Arc::new(lemmatizer),
            Arc::new(model),
            config.subtitles.clone(),
        );

        Ok(Self { config, analyzer })
    }

    /// Create a controller around an already-built analyzer
    pub fn with_analyzer(config: Config, analyzer: LevelAnalyzer) -> Self {
        Self { config, analyzer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analyzer(&self) -> &LevelAnalyzer {
        &self.analyzer
    }

    /// Analyse one subtitle file
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisReport> {
        analyze_path(&self.analyzer, path)
    }

    /// Analyse a file or every subtitle file below a directory and print the results
    pub async fn run(&self, input: PathBuf, report_path: Option<PathBuf>) -> Result<()> {
        if FileManager::file_exists(&input) {
            let report = self.run_file(&input)?;
            println!("{}", Self::render_report(&report, self.config.output_format)?);
            if let Some(report_path) = report_path {
                Self::write_json(&report_path, &report)?;
            }
        } else if FileManager::dir_exists(&input) {
            let summary = self.run_folder(input).await?;
            println!("{}", Self::render_summary(&summary, self.config.output_format)?);
            if let Some(report_path) = report_path {
                Self::write_json(&report_path, &summary)?;
            }
        } else {
            return Err(anyhow!("Input path does not exist: {:?}", input));
        }

        Ok(())
    }

    /// Analyse one file behind a spinner
    fn run_file(&self, input: &Path) -> Result<AnalysisReport> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Determining difficulty level...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.analyze_file(input);
        spinner.finish_and_clear();

        result
    }

    /// Analyse every subtitle file below `input_dir`, several at a time
    pub async fn run_folder(&self, input_dir: PathBuf) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(&input_dir, &self.config.batch.extension)?;
        if files.is_empty() {
            return Err(anyhow!(
                "No .{} files found in directory: {:?}",
                self.config.batch.extension.trim_start_matches('.'),
                input_dir
            ));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("#>-"));
        folder_pb.set_message("Analysing files");

        let semaphore = Arc::new(Semaphore::new(self.config.batch.concurrent_files));
        let mut tasks = JoinSet::new();

        for path in files {
            let semaphore = Arc::clone(&semaphore);
            let analyzer = self.analyzer.clone();
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        let task_path = path.clone();
                        tokio::task::spawn_blocking(move || analyze_path(&analyzer, &task_path))
                            .await
                            .unwrap_or_else(|e| Err(anyhow!("Analysis task panicked: {}", e)))
                    }
                    Err(e) => Err(anyhow!("Analysis slots closed: {}", e)),
                };
                (path, result)
            });
        }

        let mut summary = FolderSummary::default();
        while let Some(joined) = tasks.join_next().await {
            let (path, result) = joined.context("Analysis task failed to complete")?;
            let file = path.display().to_string();

            match result {
                Ok(report) => {
                    debug!("{}: {}", file, report.level);
                    summary.analyzed += 1;
                    *summary.by_level.entry(report.level).or_insert(0) += 1;
                    summary.files.push(FileOutcome { file, report: Some(report), error: None });
                }
                Err(e) => {
                    error!("Error analysing file {}: {:#}", file, e);
                    summary.failed += 1;
                    summary.files.push(FileOutcome {
                        file,
                        report: None,
                        error: Some(GENERIC_FAILURE_MESSAGE.to_string()),
                    });
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder analysis complete");
        summary.files.sort_by(|a, b| a.file.cmp(&b.file));

        info!(
            "Folder analysis completed: {} analysed, {} errors in {:.1}s",
            summary.analyzed,
            summary.failed,
            start_time.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    /// Render a single report in the requested format
    pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(report).context("Failed to serialize report"),
            OutputFormat::Text => Ok(Self::render_text(report)),
        }
    }

    /// Render a folder summary in the requested format
    pub fn render_summary(summary: &FolderSummary, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Json {
            return serde_json::to_string_pretty(summary).context("Failed to serialize summary");
        }

        let mut out = String::new();
        for outcome in &summary.files {
            match (&outcome.report, &outcome.error) {
                (Some(report), _) => out.push_str(&format!("{}: {}\n", outcome.file, report.level)),
                (None, Some(message)) => out.push_str(&format!("{}: {}\n", outcome.file, message)),
                (None, None) => {}
            }
        }

        let levels = summary
            .by_level
            .iter()
            .map(|(level, count)| format!("{}={}", level, count))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{} analysed, {} failed ({})",
            summary.analyzed, summary.failed, levels
        ));
        Ok(out)
    }

    fn render_text(report: &AnalysisReport) -> String {
        let mut out = format!("Difficulty level for {}: {}\n", report.source, report.level);

        match &report.ratios {
            Some(ratios) => {
                out.push_str("Unique lexicon words of each level found in the dialogue:\n");
                for level in CefrLevel::ALL {
                    let ratio = ratios.get(level);
                    out.push_str(&format!(
                        "  {} words: {:>5}  [{}]  {:5.1}%\n",
                        level,
                        report.counts.get(level),
                        Self::bar(ratio),
                        ratio * 100.0
                    ));
                }
            }
            None => out.push_str("No lexicon words found in the dialogue.\n"),
        }

        out
    }

    fn bar(ratio: f64) -> String {
        let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
        FileManager::write_to_file(path, &json)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

fn analyze_path(analyzer: &LevelAnalyzer, path: &Path) -> Result<AnalysisReport> {
    let bytes = FileManager::read_bytes(path)?;
    let name = FileManager::display_name(path);
    analyzer
        .analyze_bytes(&name, &bytes)
        .with_context(|| format!("Failed to analyse {}", path.display()))
}
