//! spritegraph CLI: run attribute event logs through a filter.
//!
//! Usage:
//!   spritegraph filter --config filter.yaml [--events events.jsonl]
//!   spritegraph check <config>

use clap::{Parser, Subcommand};
use spritegraph::stream::shared;
use spritegraph::{AttributeEvent, AttributeFilter, EventRecorder, FilterConfig, FilterSlot};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "spritegraph",
    version,
    about = "Filter graph attribute event streams"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pass JSON-lines attribute events through a filter, printing survivors
    Filter {
        /// Filter config (YAML or JSON)
        #[arg(long)]
        config: PathBuf,
        /// Event log to read; stdin when omitted
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Validate a filter config and list its active slots
    Check {
        /// Filter config (YAML or JSON)
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<FilterConfig, String> {
    FilterConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn open_events(path: Option<&Path>) -> Result<Box<dyn BufRead>, String> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

fn cmd_filter(config: &Path, events: Option<&Path>) -> i32 {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let reader = match open_events(events) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut filter = AttributeFilter::from_config(&config);
    let recorder = shared(EventRecorder::new());
    filter.add_sink(recorder.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let (mut read, mut forwarded) = (0usize, 0usize);

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: reading line {}: {}", line_no, e);
                return 1;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let event: AttributeEvent = match serde_json::from_str(&line) {
            Ok(ev) => ev,
            Err(e) => {
                eprintln!("Error: line {}: {}", line_no, e);
                return 1;
            }
        };
        read += 1;

        if let Err(e) = event.deliver(&mut filter) {
            eprintln!("Error: line {}: {}", line_no, e);
            return 1;
        }
        for survivor in recorder.borrow_mut().take() {
            forwarded += 1;
            let json = match serde_json::to_string(&survivor) {
                Ok(j) => j,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return 1;
                }
            };
            if let Err(e) = writeln!(out, "{}", json) {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
        debug!(line = line_no, attribute = event.attribute(), "event processed");
    }

    info!(read, forwarded, dropped = read - forwarded, "filter finished");
    0
}

fn cmd_check(config: &Path) -> i32 {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let slots: Vec<_> = config.slots().collect();
    if slots.is_empty() {
        println!("No filters configured; every event passes.");
        return 0;
    }
    println!("{:<8}  {:>5}  {:>8}  {:<8}", "SLOT", "NAMES", "PREFIXES", "REMOVALS");
    println!("{}", "-".repeat(36));
    for (slot, spec) in slots {
        let name = match slot {
            FilterSlot::Global => "global",
            FilterSlot::Graph => "graph",
            FilterSlot::Node => "node",
            FilterSlot::Edge => "edge",
        };
        println!(
            "{:<8}  {:>5}  {:>8}  {:<8}",
            name,
            spec.names.len(),
            spec.prefixes.len(),
            if spec.removals { "drop" } else { "keep" }
        );
    }
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let code = match cli.command {
        Commands::Filter { config, events } => cmd_filter(&config, events.as_deref()),
        Commands::Check { config } => cmd_check(&config),
    };
    std::process::exit(code);
}
