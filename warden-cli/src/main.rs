use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use warden_state::{
    read_snapshot, AnalysisWorker, AnalyzerConfig, SafetyAnalyzer, SafetyResult, Snapshot,
    WardenError,
};

const DEFAULT_SNAPSHOT: &str = "sample.txt";

#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(about = "Resource-allocation safety analysis for program snapshots", long_about = None)]
struct Cli {
    /// Path to the program snapshot file
    #[arg(default_value = DEFAULT_SNAPSHOT)]
    snapshot: PathBuf,

    /// Run the analysis on a pipe-connected worker thread
    #[arg(short, long)]
    worker: bool,

    /// Report the partial completion ordering when the snapshot is unsafe
    #[arg(short, long)]
    partial: bool,

    /// Output the result in JSON format
    #[arg(short, long)]
    json: bool,
}

fn main() {
    let args = Cli::parse();
    let config = AnalyzerConfig {
        report_partial_on_unsafe: args.partial,
    };

    let snapshot = match read_snapshot(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
    };

    let result = match run_analysis(&snapshot, config, args.worker) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        report(&args.snapshot, &result);
    }

    // Safe and unsafe are both successful analyses; only failures above
    // exit non-zero
}

fn run_analysis(
    snapshot: &Snapshot,
    config: AnalyzerConfig,
    on_worker: bool,
) -> Result<SafetyResult, WardenError> {
    if on_worker {
        let worker = AnalysisWorker::spawn(config)?;
        let result = worker.analyze(snapshot)?;
        worker.shutdown();
        Ok(result)
    } else {
        Ok(SafetyAnalyzer::with_config(config).find_safe_sequence(snapshot))
    }
}

fn report(path: &PathBuf, result: &SafetyResult) {
    println!("{} {}", "Analyzed snapshot:".cyan(), path.display());

    match result {
        SafetyResult::Safe { sequence } => {
            println!(
                "{} {}",
                "Safe sequence found:".green().bold(),
                format_sequence(sequence)
            );
        }
        SafetyResult::Unsafe { partial } => {
            println!(
                "{}",
                "Oops! Looks like we're stuck in a deadlock!".red().bold()
            );
            if let Some(partial) = partial {
                println!(
                    "Processes that could still finish: {}",
                    format_sequence(partial)
                );
            }
        }
    }
}

/// Render a process ordering as "(1, 3, 4, 0, 2)"
fn format_sequence(sequence: &[usize]) -> String {
    let rendered: Vec<String> = sequence.iter().map(|p| p.to_string()).collect();
    format!("({})", rendered.join(", "))
}
