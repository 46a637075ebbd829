use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::GraderConfig;
use crate::grading::EmptyHypothesisPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "recitation",
    version,
    about = "Grade a transcribed Quran recitation against its reference text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade one transcription and print the response JSON.
    Grade(GradeArgs),
    /// Grade every case in a JSON file in parallel.
    Batch(BatchArgs),
    /// Print the normalized form and tokens of a text.
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to a JSON grader configuration file.
    #[arg(long, env = "RECITATION_CONFIG")]
    pub config: Option<PathBuf>,
    /// Minimum grade (0-100) required to pass.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Reject transcriptions with no recognizable words instead of grading them 0.
    #[arg(long = "reject-empty")]
    pub reject_empty: bool,
}

impl ConfigArgs {
    /// Layers CLI overrides on top of the configuration file.
    pub fn resolve(&self) -> Result<GraderConfig> {
        let policy = self.reject_empty.then_some(EmptyHypothesisPolicy::Reject);
        let config = GraderConfig::from_override(self.config.as_deref())?
            .with_threshold(self.threshold)
            .with_empty_hypothesis(policy);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct GradeArgs {
    /// Canonical reference text.
    #[arg(long)]
    pub reference: String,
    /// Transcribed recitation text.
    #[arg(long, conflicts_with = "transcript_file", required_unless_present = "transcript_file")]
    pub transcript: Option<String>,
    /// File holding the transcribed recitation text.
    #[arg(long = "transcript-file", value_name = "PATH")]
    pub transcript_file: Option<PathBuf>,
    /// Include the per-step alignment breakdown.
    #[arg(long)]
    pub verbose: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl GradeArgs {
    pub fn transcript(&self) -> Result<String> {
        match (&self.transcript, &self.transcript_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read transcript file {:?}", path)),
            (None, None) => anyhow::bail!("provide --transcript or --transcript-file"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// JSON array of {"reference", "transcript"} cases.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Text to normalize.
    pub text: String,
}
