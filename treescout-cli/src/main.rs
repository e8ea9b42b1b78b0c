use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::{num::NonZeroUsize, path::PathBuf};
use tracing_subscriber::EnvFilter;
use treescout::{
    config::ConfigOverrides, find, results::SkippedEntry, Node, SearchConfig, SearchOutput,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search in
    #[arg(short = 'd', long)]
    dir: PathBuf,

    /// Literal text to search for
    #[arg(short = 's', long)]
    search: String,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Match case exactly
    #[arg(long)]
    match_case: bool,

    /// Match whole words, or the whole phrase for multi-word searches
    #[arg(short = 'w', long)]
    full_word: bool,

    /// File extensions to scan (e.g. .go,.md)
    #[arg(short = 'e', long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Directory names to exclude (can be specified multiple times)
    #[arg(long = "exclude-dir")]
    exclude_dirs: Vec<String>,

    /// File names to exclude (can be specified multiple times)
    #[arg(long = "exclude-file")]
    exclude_files: Vec<String>,

    /// Number of threads to use
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Stop at the first unreadable directory or file
    #[arg(long)]
    fail_fast: bool,

    /// Print the result tree as JSON
    #[arg(long)]
    json: bool,

    /// Show only statistics, not matches
    #[arg(long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.search.trim().is_empty() {
        bail!("Provide a valid folder and search text");
    }

    let config = SearchConfig::load_or_default(cli.config.as_deref()).merge_with_cli(
        ConfigOverrides {
            exclude_directories: cli.exclude_dirs,
            exclude_files: cli.exclude_files,
            allowed_extensions: cli.extensions,
            match_case: cli.match_case,
            match_full_word: cli.full_word,
            thread_count: cli.threads,
            fail_fast: cli.fail_fast,
            log_level: cli.log_level,
        },
    );

    init_tracing(&config.log_level);

    let output = find(&cli.dir, &cli.search, &config)?;
    print_skipped(&output.skipped);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if cli.stats {
        print_stats(&output);
    } else {
        print_tree(&output);
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn indent(level: usize) -> String {
    "   ".repeat(level)
}

fn print_tree(output: &SearchOutput) {
    let total = output.total_matches();
    if total == 0 {
        println!("{}", "No matches found".red());
        return;
    }

    println!("{}", format!("Total matches : {}", total).bright_cyan());

    let mut in_matches = false;
    for node in output.root.iter() {
        if in_matches && !matches!(node, Node::Match { .. }) {
            println!();
        }
        in_matches = false;

        match node {
            Node::Directory { dir, depth } => {
                println!("{}", format!("{}{}", indent(depth + 1), dir.name).yellow());
            }
            Node::File { file, depth } => {
                println!("{}", format!("{} {}", indent(depth), file.name).green());
            }
            Node::Match { m, depth } => {
                println!("{} {} {}", indent(depth - 1), m.text, m.line);
                in_matches = true;
            }
        }
    }
    if in_matches {
        println!();
    }
}

fn print_stats(output: &SearchOutput) {
    println!(
        "Found {} matches in {} files",
        output.total_matches(),
        output.root.total_files()
    );
    println!(
        "Scanned {} files ({} lines) in {} directories",
        output.stats.files_scanned, output.stats.lines_read, output.stats.directories_visited
    );
}

fn print_skipped(skipped: &[SkippedEntry]) {
    for entry in skipped {
        eprintln!(
            "{} {}: {}",
            "Skipped".yellow(),
            entry.path.display(),
            entry.reason
        );
    }
}
