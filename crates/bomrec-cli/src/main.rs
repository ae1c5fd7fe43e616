//! bomrec CLI - reconcile a BOM against the master DB

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bomrec::layout::EXPORT_COLUMNS;
use bomrec::{
    list_directory, open_sheet, read_file_list, reconcile, save_script, save_sheet, OutputNames,
    ReconcileOptions, ReconcileStats, Reconciliation, WriteOptions,
};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "bomrec")]
#[command(
    author,
    version,
    about = "Reconcile a bill of materials against the master DB and plan drawing copies"
)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG also applies
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: <config dir>/bomrec/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a BOM and write the annotated BOM, missing extract and copy script
    Run(RunArgs),

    /// Show or change the saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Master DB spreadsheet (xlsx, xlsm, xls, csv)
    #[arg(long)]
    db: PathBuf,

    /// BOM spreadsheet to reconcile (xlsx, xlsm, xls, csv)
    #[arg(long)]
    bom: PathBuf,

    /// Folder holding the drawings; its files make up the listing
    #[arg(long, conflicts_with = "file_list")]
    files_dir: Option<PathBuf>,

    /// Text file with one available file name per line
    #[arg(long)]
    file_list: Option<PathBuf>,

    /// Source folder written into the copy script (default: saved setting, then --files-dir)
    #[arg(long)]
    source: Option<String>,

    /// Destination root written into the copy script (default: saved setting)
    #[arg(long)]
    target: Option<String>,

    /// Output directory (default: the BOM's directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Copy the DB description into an extra BOM column
    #[arg(long)]
    with_description: bool,

    /// Export only the first 12 columns, with a styled header
    #[arg(long)]
    export_only_12_cols: bool,

    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings and where they are stored
    Show,

    /// Update saved settings
    Set {
        /// Source folder of the drawings
        #[arg(long)]
        source: Option<String>,

        /// Destination root
        #[arg(long)]
        target: Option<String>,

        /// Copy the DB description into the BOM by default
        #[arg(long)]
        with_description: Option<bool>,

        /// Export 12 columns by default
        #[arg(long)]
        export_only_12_cols: Option<bool>,
    },
}

/// JSON report of a run
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    stats: &'a ReconcileStats,
    processed: PathBuf,
    missing: Option<PathBuf>,
    script: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path().context("Cannot determine the configuration directory")?,
    };

    match cli.command {
        Commands::Run(args) => run(&args, &config_path),
        Commands::Config { action } => match action {
            ConfigAction::Show => show_config(&config_path),
            ConfigAction::Set {
                source,
                target,
                with_description,
                export_only_12_cols,
            } => {
                let mut config = Config::load(&config_path)?;
                if let Some(source) = source {
                    config.source_path = source;
                }
                if let Some(target) = target {
                    config.target_path = target;
                }
                if let Some(enabled) = with_description {
                    config.with_description = enabled;
                }
                if let Some(enabled) = export_only_12_cols {
                    config.export_only_12_cols = enabled;
                }
                config.save(&config_path)?;
                show_config(&config_path)
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &RunArgs, config_path: &Path) -> Result<()> {
    let mut config = Config::load(config_path)?;

    let source_path = match (&args.source, &args.files_dir) {
        (Some(source), _) => source.clone(),
        (None, Some(dir)) if config.source_path.trim().is_empty() => dir.display().to_string(),
        (None, _) => config.source_path.clone(),
    };
    let target_path = args.target.clone().unwrap_or_else(|| config.target_path.clone());
    let with_description = args.with_description || config.with_description;
    let export_only_12_cols = args.export_only_12_cols || config.export_only_12_cols;

    let listing = match (&args.files_dir, &args.file_list) {
        (Some(dir), _) => list_directory(dir)?,
        (None, Some(list)) => read_file_list(list)?,
        (None, None) => Vec::new(),
    };

    let db = open_sheet(&args.db)?;
    let bom = open_sheet(&args.bom)?;

    let options = ReconcileOptions::new(source_path.clone(), target_path.clone())
        .with_description(with_description);
    let result = reconcile(&db, &bom, &listing, &options)?;

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => match args.bom.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };
    let bom_name = match args.bom.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => bail!("'{}' is not a file", args.bom.display()),
    };
    let report = write_outputs(&result, &out_dir, &bom_name, export_only_12_cols)?;

    config.source_path = source_path;
    config.target_path = target_path;
    if let Err(err) = config.save(config_path) {
        log::warn!("settings not saved: {:#}", err);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize stats")?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn write_outputs<'a>(
    result: &'a Reconciliation,
    out_dir: &Path,
    bom_name: &str,
    export_only_12_cols: bool,
) -> Result<RunReport<'a>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    let names = OutputNames::for_bom(bom_name);
    let export = if export_only_12_cols {
        WriteOptions::styled().with_max_columns(EXPORT_COLUMNS)
    } else {
        WriteOptions::default()
    };

    let processed = out_dir.join(&names.processed);
    save_sheet(result.annotated(), &processed, &export)?;

    let missing = match result.missing_records() {
        Some(extract) => {
            let path = out_dir.join(&names.missing);
            save_sheet(&extract, &path, &WriteOptions::default())?;
            Some(path)
        }
        None => None,
    };

    let script = out_dir.join(&names.script);
    save_script(result.script(), &script)?;

    log::info!("outputs written to {}", out_dir.display());

    Ok(RunReport {
        stats: result.stats(),
        processed,
        missing,
        script,
    })
}

fn print_summary(report: &RunReport<'_>) {
    let stats = report.stats;

    println!("Rows reconciled:   {}", stats.total_rows);
    if stats.skipped_rows > 0 {
        println!("Rows skipped:      {} (no code)", stats.skipped_rows);
    }
    println!("Found in DB:       {}", stats.matches);
    println!("Missing from DB:   {}", stats.missing);
    println!("  wrong revision:  {}", stats.revision_mismatch);
    println!("Files found:       {}", stats.files_found);
    for family in stats.family_summary() {
        println!("  {:<5}            {}", family.label, family.count);
    }

    println!();
    println!("Annotated BOM:     {}", report.processed.display());
    if let Some(missing) = &report.missing {
        println!("To add to DB:      {}", missing.display());
    }
    println!("Copy script:       {}", report.script.display());
}

fn show_config(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let content = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;

    println!("# {}", config_path.display());
    print!("{}", content);
    Ok(())
}
