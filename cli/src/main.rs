//! canvasmark CLI - LMS HTML to Markdown conversion tool

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use canvasmark::{
    convert_str, detect_format_from_str, format_from_extension, ConvertOptions, ConvertResult,
    HtmlOptions, MarkdownOptions, SourceFormat,
};

#[derive(Parser)]
#[command(name = "canvasmark")]
#[command(version)]
#[command(about = "Convert LMS rich-text HTML to Markdown and back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HTML to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input HTML file ("-" for stdin)
        #[arg(value_name = "FILE", default_value = "-")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Flatten tables instead of keeping them as raw HTML
        #[arg(long)]
        no_tables: bool,

        /// Bullet character for list items
        #[arg(long, default_value = "-")]
        list_marker: char,

        /// Print conversion statistics as JSON to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Convert Markdown to HTML
    Html {
        /// Input Markdown file ("-" for stdin)
        #[arg(value_name = "FILE", default_value = "-")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Treat raw tables like any other text
        #[arg(long)]
        no_tables: bool,

        /// Do not wrap prose lines in <p>
        #[arg(long)]
        no_paragraphs: bool,

        /// Print conversion statistics as JSON to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Convert a file in whichever direction its format implies
    Convert {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Source format (detected from extension or content if omitted)
        #[arg(long, value_enum, env = "CANVASMARK_FROM")]
        from: Option<FormatArg>,

        /// Print conversion statistics as JSON to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// LMS rich-text HTML
    Html,
    /// Markdown with raw table islands
    Markdown,
}

impl From<FormatArg> for SourceFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Html => SourceFormat::Html,
            FormatArg::Markdown => SourceFormat::Markdown,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Markdown {
            input,
            output,
            no_tables,
            list_marker,
            stats,
        } => {
            let markdown = MarkdownOptions::new()
                .with_tables(!no_tables)
                .with_list_marker(list_marker);
            let options = ConvertOptions::new()
                .with_markdown_options(markdown)
                .with_source(SourceFormat::Html)
                .with_stats(stats);
            cmd_convert(&input, output.as_deref(), &options)
        }
        Commands::Html {
            input,
            output,
            no_tables,
            no_paragraphs,
            stats,
        } => {
            let html = HtmlOptions::new()
                .with_tables(!no_tables)
                .with_paragraphs(!no_paragraphs);
            let options = ConvertOptions::new()
                .with_html_options(html)
                .with_source(SourceFormat::Markdown)
                .with_stats(stats);
            cmd_convert(&input, output.as_deref(), &options)
        }
        Commands::Convert {
            input,
            output,
            from,
            stats,
        } => {
            let mut options = ConvertOptions::new().with_stats(stats);
            if let Some(format) = from {
                options = options.with_source(format.into());
            }
            cmd_convert(&input, output.as_deref(), &options)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = convert_input(input, options)?;

    if options.collect_stats {
        eprintln!("{}", serde_json::to_string_pretty(&result.stats)?);
    }

    write_output(output, &result.content)
}

/// Read the input and convert it, resolving the source format from the
/// options, the file extension, then the content.
fn convert_input(
    input: &Path,
    options: &ConvertOptions,
) -> Result<ConvertResult, Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let source = match options.source.or_else(|| format_from_extension(input)) {
        Some(source) => source,
        None => detect_format_from_str(&text)?,
    };
    log::debug!("{} -> {}", source, source.target());
    Ok(convert_str(&text, source, options))
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(input)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", content)?;
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "canvasmark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("LMS rich-text HTML <-> Markdown converter");
    println!();
    println!("License: MIT");
}
