//! sheet-stencil CLI - prepares XLSX templates for expansion

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stencil_preprocess::{PreprocessOptions, Preprocessor, WorkbookIndex};
use stencil_xlsx::Package;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(author, version, about = "Injects template directives into XLSX packages")]
struct Cli {
    /// Log pass details (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a template so the expansion engine can repeat its rows
    Preprocess {
        /// Input template (xlsx)
        input: PathBuf,

        /// Output file (default: <input stem>.prepared.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder of the workbook parts inside the package
        #[arg(long, default_value = "xl/")]
        xml_root: String,

        /// Longest expression accepted in a {{#each ...}} marker
        #[arg(long, default_value = "500")]
        max_loop_expression_len: usize,

        /// Leave the sheet dimension alone
        #[arg(long)]
        no_dimension: bool,
    },

    /// List the worksheets of a template with their declared identity
    Sheets {
        /// Input template (xlsx)
        input: PathBuf,

        /// Folder of the workbook parts inside the package
        #[arg(long, default_value = "xl/")]
        xml_root: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Preprocess {
            input,
            output,
            xml_root,
            max_loop_expression_len,
            no_dimension,
        } => {
            let options = PreprocessOptions {
                xml_root,
                max_loop_expression_len,
                update_dimension: !no_dimension,
            };
            let output = output.unwrap_or_else(|| prepared_path(&input));
            preprocess(&input, &output, options)
        }
        Commands::Sheets { input, xml_root } => list_sheets(
            &input,
            &PreprocessOptions {
                xml_root,
                ..Default::default()
            },
        ),
    }
}

/// `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prepared_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    input.with_file_name(format!("{stem}.prepared.xlsx"))
}

fn open(input: &Path) -> Result<Package> {
    Package::read_file(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn preprocess(input: &Path, output: &Path, options: PreprocessOptions) -> Result<()> {
    let mut package = open(input)?;
    debug!(parts = package.len(), "package loaded");

    let report = Preprocessor::new(options)
        .run(&mut package)
        .with_context(|| format!("Failed to preprocess '{}'", input.display()))?;

    package
        .write_file(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    eprintln!("Preprocessed {report}");
    eprintln!("Wrote '{}'", output.display());
    Ok(())
}

fn list_sheets(input: &Path, options: &PreprocessOptions) -> Result<()> {
    let package = open(input)?;
    package
        .require_document(&options.workbook_part())
        .with_context(|| format!("'{}' is not a workbook", input.display()))?;
    let workbook = WorkbookIndex::from_package(&package, options);

    let worksheet_parts: Vec<&str> = package
        .parts()
        .iter()
        .filter(|part| options.is_worksheet_part(&part.name))
        .map(|part| part.name.as_str())
        .collect();

    if worksheet_parts.is_empty() {
        eprintln!("Warning: no worksheet parts under '{}'", options.xml_root);
        return Ok(());
    }

    for part in worksheet_parts {
        match workbook.resolve(part) {
            Some(sheet) => println!(
                "{}\tid={}\t{}\t{}",
                sheet.name, sheet.id, sheet.relationship_id, part
            ),
            None => println!("(undeclared)\t-\t-\t{part}"),
        }
    }

    Ok(())
}
