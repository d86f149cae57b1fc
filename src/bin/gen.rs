//! sbrule-gen: CLI tool for generating sing-box rule sets from rule lists.

use clap::{Parser, Subcommand};
use sbrule::document::DEFAULT_OUTPUT_DIR;
use sbrule::{
    parse_list, ClassifyOptions, DocumentWriter, GroupConfig, HttpFetcher, Pipeline, RuleDocument,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sbrule-gen")]
#[command(version)]
#[command(about = "Generate sing-box rule sets from Surge and plain rule lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every configured group and write one JSON file per group
    Download {
        /// Output directory for rule set files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// YAML group table (defaults to the built-in table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Drop trailing modifiers such as ",no-resolve" from typed rules
        #[arg(long)]
        strip_modifiers: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert a local rule list file
    Convert {
        /// Input rule list
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Drop trailing modifiers such as ",no-resolve" from typed rules
        #[arg(long)]
        strip_modifiers: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the group table
    Groups {
        /// YAML group table (defaults to the built-in table)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Download {
        output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        config: None,
        strip_modifiers: false,
        verbose: false,
    });

    let verbose = match &command {
        Commands::Download { verbose, .. } | Commands::Convert { verbose, .. } => *verbose,
        Commands::Groups { .. } => false,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbose)))
        .init();

    let result = match command {
        Commands::Download {
            output_dir,
            config,
            strip_modifiers,
            ..
        } => download_and_generate(&output_dir, config.as_deref(), strip_modifiers),
        Commands::Convert {
            input,
            output,
            strip_modifiers,
            ..
        } => convert_file(&input, &output, strip_modifiers),
        Commands::Groups { config } => print_groups(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Default log filter. Verbose output is limited to this crate so the HTTP
/// stack stays at `info`.
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,sbrule=debug,sbrule_gen=debug"
    } else {
        "info"
    }
}

fn load_config(path: Option<&Path>) -> sbrule::Result<GroupConfig> {
    match path {
        Some(path) => GroupConfig::load(path),
        None => Ok(GroupConfig::default()),
    }
}

fn download_and_generate(
    output_dir: &Path,
    config: Option<&Path>,
    strip_modifiers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config)?;
    if strip_modifiers {
        config = config.with_strip_modifiers(true);
    }

    let pipeline = Pipeline::new(HttpFetcher::new()?, config);
    let writer = DocumentWriter::new(output_dir);
    let summary = pipeline.run(&writer)?;

    println!(
        "Generated {} rule sets in {:?} ({} empty, {} failed)",
        summary.written(),
        output_dir,
        summary.empty(),
        summary.failed()
    );
    Ok(())
}

fn convert_file(
    input: &Path,
    output: &Path,
    strip_modifiers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Reading input file: {:?}", input);

    let content = fs::read_to_string(input)?;
    let parsed = parse_list(&content, ClassifyOptions { strip_modifiers });
    log::debug!(
        "Parsed {} rules, skipped {} lines",
        parsed.rules.len(),
        parsed.skipped
    );

    if parsed.rules.is_empty() {
        log::warn!("No rules found in {:?}, skipping file creation", input);
        return Ok(());
    }

    let document = RuleDocument::new(parsed.rules);
    fs::write(output, document.to_json()?)?;

    println!("Successfully converted {:?} -> {:?}", input, output);
    Ok(())
}

fn print_groups(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    for group in config.iter() {
        println!("{}", group.name);
        for url in &group.urls {
            println!("  {}", url);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(false), "info");

        let verbose = log_filter(true);
        assert!(verbose.starts_with("info,"));
        assert!(verbose.split(',').any(|d| d == "sbrule=debug"));
        assert!(!verbose.split(',').any(|d| d == "debug"));
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["sbrule-gen"]).unwrap();
        assert!(cli.command.is_none());
    }
}
