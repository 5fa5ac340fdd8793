mod document;
mod model;
mod parser;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "vplan", about = "Weekly class schedule extraction from Vorlesungsplan page dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract stacked calendar events as JSON
    Events {
        /// Page dumps produced by the document extractor
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (single input) or directory (multiple); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Legacy grouped view: one plan of modules per document
    Plan {
        input: PathBuf,
        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Summary table of a document's stacked events
    Overview {
        input: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Events { inputs, output, pretty } => {
            if inputs.len() == 1 {
                extract_single(&inputs[0], output.as_deref(), pretty)
            } else {
                extract_batch(&inputs, output.as_deref(), pretty)
            }
        }
        Commands::Plan { input, output, pretty } => {
            let doc = document::load(&input)?;
            let outcome = parser::process_document(&doc);
            let plan = parser::stack::build_plan(
                &outcome.header.title,
                outcome.header.semester,
                outcome.header.group,
                &outcome.events,
            );
            emit(&plan, output.as_deref(), pretty)?;
            if output.is_some() {
                println!(
                    "Wrote plan \"{}\" with {} modules.",
                    plan.title,
                    plan.modules.len()
                );
            }
            Ok(())
        }
        Commands::Overview { input, limit } => overview(&input, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn extract_single(input: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let doc = document::load(input)?;
    let outcome = parser::process_document(&doc);
    let stacked = parser::stack::stack_events(&outcome.events);
    emit(&stacked, output, pretty)?;
    if output.is_some() {
        println!(
            "{}: {} events stacked into {} entries ({} pages failed).",
            input.display(),
            outcome.events.len(),
            stacked.len(),
            outcome.errors.len()
        );
    }
    Ok(())
}

fn extract_batch(inputs: &[PathBuf], out_dir: Option<&Path>, pretty: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    // documents are independent; each pipeline owns its own collections
    let results: Vec<Result<ExtractCounts>> = inputs
        .par_iter()
        .map(|input| {
            let res = extract_to_file(input, out_dir, pretty);
            pb.inc(1);
            res
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = ExtractCounts::default();
    let mut failed = 0usize;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(c) => counts.add(&c),
            Err(e) => {
                eprintln!("{}: {:#}", input.display(), e);
                failed += 1;
            }
        }
    }
    counts.print();
    if failed > 0 {
        println!("{} of {} documents failed.", failed, inputs.len());
    }
    Ok(())
}

fn extract_to_file(input: &Path, out_dir: Option<&Path>, pretty: bool) -> Result<ExtractCounts> {
    let doc = document::load(input)?;
    let outcome = parser::process_document(&doc);
    let stacked = parser::stack::stack_events(&outcome.events);

    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("plan");
    let name = format!("{stem}.events.json");
    let path = match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    };
    fs::write(&path, to_json(&stacked, pretty)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(ExtractCounts {
        documents: 1,
        events: outcome.events.len(),
        stacked: stacked.len(),
        failed_pages: outcome.errors.len(),
    })
}

fn overview(input: &Path, limit: usize) -> Result<()> {
    let doc = document::load(input)?;
    let outcome = parser::process_document(&doc);
    let stacked = parser::stack::stack_events(&outcome.events);

    println!(
        "{} — Sem. {} Gruppe {}",
        outcome.header.title, outcome.header.semester, outcome.header.group
    );
    if stacked.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<30} | {:<9} | {:<24} | {:<16} | {:>5}",
        "#", "Title", "Type", "Lecturer", "Rooms", "Dates"
    );
    println!("{}", "-".repeat(102));

    for (i, s) in stacked.iter().take(limit).enumerate() {
        let lecturers = s
            .lecturers
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let rooms = s
            .rooms
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:>3} | {:<30} | {:<9} | {:<24} | {:<16} | {:>5}",
            i + 1,
            truncate(&s.title, 30),
            s.kind.to_string(),
            truncate(&lecturers, 24),
            truncate(&rooms, 16),
            s.occurrences.len()
        );
    }

    println!(
        "\n{} stacked events from {} dated sessions ({} pages failed).",
        stacked.len(),
        outcome.events.len(),
        outcome.errors.len()
    );
    Ok(())
}

#[derive(Default)]
struct ExtractCounts {
    documents: usize,
    events: usize,
    stacked: usize,
    failed_pages: usize,
}

impl ExtractCounts {
    fn add(&mut self, other: &ExtractCounts) {
        self.documents += other.documents;
        self.events += other.events;
        self.stacked += other.stacked;
        self.failed_pages += other.failed_pages;
    }

    fn print(&self) {
        println!(
            "Extracted {} documents: {} events stacked into {} entries ({} pages failed).",
            self.documents, self.events, self.stacked, self.failed_pages,
        );
    }
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = to_json(value, pretty)?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
