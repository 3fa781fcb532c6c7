//! pdfblocks CLI - PDF page content classifier

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfblocks::{
    detect_format_from_path, parse_extracted_file, parse_file_with_options, BlockKind, Document,
    JsonFormat, PageSelection, ParseOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfblocks")]
#[command(version)]
#[command(about = "Classify PDF page content into paragraphs, tables, and charts", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file (defaults to <FILE stem>.json)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    parse: ParseArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Classify pre-extracted pages from a JSON file
    Replay {
        /// Pre-extracted pages: {"pages": [{"lines": [...], "images": [...]}]}
        #[arg(value_name = "EXTRACTED")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show page and block statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Options shared by the commands that parse a PDF.
#[derive(Args, Clone, Default)]
struct ParseArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Stop at the first page that fails to extract
    #[arg(long)]
    strict: bool,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Worker threads for page assembly
    #[arg(long, env = "PDFBLOCKS_THREADS")]
    threads: Option<usize>,
}

impl ParseArgs {
    fn to_options(&self) -> CliResult<ParseOptions> {
        let mut options = ParseOptions::new();
        if let Some(p) = self.pages.as_deref() {
            options = options.with_pages(PageSelection::parse(p)?);
        }
        if self.strict {
            options = options.strict();
        }
        if self.sequential {
            options = options.sequential();
        }
        if let Some(threads) = self.threads {
            options = options.with_threads(threads);
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Json {
            input,
            output,
            compact,
            parse,
        }) => cmd_json(&input, output.as_deref(), compact, &parse),
        Some(Commands::Replay {
            input,
            output,
            compact,
        }) => cmd_replay(&input, output.as_deref(), compact),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.parse)
            } else {
                println!("{}", "Usage: pdfblocks <FILE> [OUTPUT]".yellow());
                println!("       pdfblocks --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Fail before any processing if the input is absent.
fn ensure_input(input: &Path) -> CliResult<()> {
    if !input.exists() {
        return Err(pdfblocks::Error::MissingInput(input.to_path_buf()).into());
    }
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}.json", stem))
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn spinner(message: &'static str) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn report_failures(doc: &Document) {
    for failure in &doc.failures {
        eprintln!("{} {}", "Warning:".yellow().bold(), failure);
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, parse: &ParseArgs) -> CliResult<()> {
    ensure_input(input)?;
    let options = parse.to_options()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let pb = spinner("Parsing PDF...")?;
    let doc = parse_file_with_options(input, options)?;
    pb.set_message("Writing JSON...");
    pdfblocks::render::write_json(&doc, &output, JsonFormat::Pretty)?;
    pb.finish_and_clear();

    report_failures(&doc);
    println!(
        "{} {}",
        "JSON saved successfully to".green(),
        output.display()
    );
    Ok(())
}

fn write_or_print(doc: &Document, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let format = json_format(compact);
    if let Some(path) = output {
        pdfblocks::render::write_json(doc, path, format)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", pdfblocks::render::to_json(doc, format)?);
    }
    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool, parse: &ParseArgs) -> CliResult<()> {
    ensure_input(input)?;
    let doc = parse_file_with_options(input, parse.to_options()?)?;
    report_failures(&doc);
    write_or_print(&doc, output, compact)
}

fn cmd_replay(input: &Path, output: Option<&Path>, compact: bool) -> CliResult<()> {
    ensure_input(input)?;
    let doc = parse_extracted_file(input, ParseOptions::new())?;
    write_or_print(&doc, output, compact)
}

fn cmd_info(input: &Path, as_json: bool) -> CliResult<()> {
    ensure_input(input)?;
    let format = detect_format_from_path(input)?;
    let doc = parse_file_with_options(input, ParseOptions::new())?;

    let paragraphs = doc.count(BlockKind::Paragraph);
    let tables = doc.count(BlockKind::Table);
    let charts = doc.count(BlockKind::Chart);

    if as_json {
        let failures: Vec<String> = doc.failures.iter().map(ToString::to_string).collect();
        let summary = serde_json::json!({
            "file": input.display().to_string(),
            "version": format.version,
            "pages": doc.page_count(),
            "paragraphs": paragraphs,
            "tables": tables,
            "charts": charts,
            "failures": failures,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Content Blocks".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), paragraphs);
    println!("{}: {}", "Tables".bold(), tables);
    println!("{}: {}", "Charts".bold(), charts);

    if doc.has_failures() {
        println!();
        println!("{}", "Page Failures".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for failure in &doc.failures {
            println!("  {} {}", "•".dimmed(), failure);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfblocks".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF page content classifier");
    println!();
    println!("License: MIT");
}
