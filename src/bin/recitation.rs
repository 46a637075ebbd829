use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use recitation_grader::config::GraderConfig;
use recitation_grader::grading::alignment::phonetics::PhoneticTable;
use recitation_grader::grading::cli::{BatchArgs, Cli, Command, GradeArgs, NormalizeArgs};
use recitation_grader::grading::text::{normalize, tokenize};
use recitation_grader::grading::Grader;
use recitation_grader::types::{parse_batch, BatchCase, BatchOutcome, GradeResponse};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Grade(args) => handle_grade(&args),
        Command::Batch(args) => handle_batch(&args),
        Command::Normalize(args) => handle_normalize(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_grade(args: &GradeArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let transcript = args.transcript()?;
    let custom_table = config.load_table()?;
    let grader = build_grader(&config, custom_table.as_ref())?;

    let started = Instant::now();
    let response = if args.verbose {
        let report = grader
            .grade_detailed(&args.reference, &transcript)
            .context("grading failed")?;
        GradeResponse::detailed(report, started.elapsed())
    } else {
        let result = grader
            .grade(&args.reference, &transcript)
            .context("grading failed")?;
        GradeResponse::new(result, started.elapsed())
    };
    info!(
        grade = response.grade,
        is_passed = response.is_passed,
        processing_time_ms = response.processing_time_ms,
        "grading complete"
    );
    print_json(&response)
}

fn handle_batch(args: &BatchArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read batch file {:?}", args.input))?;
    let cases = parse_batch(&raw)?;
    let custom_table = config.load_table()?;
    let grader = build_grader(&config, custom_table.as_ref())?;

    info!(cases = cases.len(), "grading batch");
    let outcomes: Vec<BatchOutcome> = cases
        .par_iter()
        .map(|case| grade_case(&grader, case))
        .collect();
    print_json(&outcomes)
}

fn grade_case(grader: &Grader<'_>, case: &BatchCase) -> BatchOutcome {
    let started = Instant::now();
    match grader.grade(&case.reference, &case.transcript) {
        Ok(result) => BatchOutcome::Graded(GradeResponse::new(result, started.elapsed())),
        Err(err) => {
            warn!(error = %err, "batch case rejected");
            BatchOutcome::Rejected {
                error: err.to_string(),
            }
        }
    }
}

#[derive(Serialize)]
struct NormalizedView {
    normalized: String,
    tokens: Vec<TokenView>,
}

#[derive(Serialize)]
struct TokenView {
    text: String,
    position: usize,
    single_letter: bool,
}

fn handle_normalize(args: &NormalizeArgs) -> Result<()> {
    let normalized = normalize(&args.text);
    let tokens = tokenize(&normalized)
        .into_iter()
        .map(|token| TokenView {
            single_letter: token.is_single_letter(),
            text: token.text,
            position: token.position,
        })
        .collect();
    print_json(&NormalizedView { normalized, tokens })
}

fn build_grader<'t>(
    config: &GraderConfig,
    custom_table: Option<&'t PhoneticTable>,
) -> Result<Grader<'t>> {
    let table = custom_table.unwrap_or_else(|| PhoneticTable::shared());
    Grader::with_table(table, config.settings()).context("invalid grading settings")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}
