//! unwiki CLI - wiki structure recovery and report tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;

use unwiki::export::{build_export_payload, export_filename, ExportFormat, ExportOptions};
use unwiki::render::{to_json, CleanupPipeline};
use unwiki::{
    load_page_contents, parser, CleanupPreset, Context, JsonFormat, ReportOptions, ReportWriter,
    StructuredDocument,
};

#[derive(Parser)]
#[command(name = "unwiki")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Recover wiki structures from AI responses and write llms.txt reports", long_about = None)]
struct Cli {
    /// Repository used as the log target (owner/name)
    #[arg(long, global = true, value_name = "REPO")]
    repo: Option<String>,

    /// Log raw responses at debug level
    #[arg(long, global = true)]
    dump_responses: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the <wiki_structure> fragment from a response
    Extract {
        /// Response file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Parse a response into a JSON wiki structure
    Parse {
        /// Response file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Strip markup from page content
    Clean {
        /// Content file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep blank-line paragraph breaks
        #[arg(long)]
        paragraphs: bool,
    },

    /// Write an llms.txt report from generated page contents
    Report {
        /// Page contents JSON ("-" for stdin)
        #[arg(value_name = "CONTENTS")]
        input: PathBuf,

        /// Report file (repo_wiki_generations/llms.txt if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render sections on the current thread
        #[arg(long)]
        sequential: bool,

        /// Keep blank-line paragraph breaks in page content
        #[arg(long)]
        paragraphs: bool,
    },

    /// Build the export request body for a parsed structure
    Payload {
        /// Response file with the wiki structure ("-" for stdin)
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,

        /// Generated page contents JSON ("-" for stdin)
        #[arg(value_name = "CONTENTS")]
        contents: PathBuf,

        /// Repository URL sent with the request
        #[arg(long, value_name = "URL")]
        repo_url: String,

        /// Export format
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Export service base URL
        #[arg(long, env = "API_BASE_URL", value_name = "URL")]
        api_base_url: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show wiki structure information
    Info {
        /// Response file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let ctx = build_context(cli.repo.as_deref(), cli.dump_responses);

    let result = match cli.command {
        Some(Commands::Extract { input, output }) => cmd_extract(&input, output.as_deref(), &ctx),
        Some(Commands::Parse {
            input,
            output,
            compact,
        }) => cmd_parse(&input, output.as_deref(), compact, &ctx),
        Some(Commands::Clean {
            input,
            output,
            paragraphs,
        }) => cmd_clean(&input, output.as_deref(), paragraphs),
        Some(Commands::Report {
            input,
            output,
            sequential,
            paragraphs,
        }) => cmd_report(&input, output.as_deref(), sequential, paragraphs, &ctx),
        Some(Commands::Payload {
            response,
            contents,
            repo_url,
            format,
            api_base_url,
            output,
        }) => cmd_payload(
            &response,
            &contents,
            cli.repo.as_deref(),
            &repo_url,
            format,
            api_base_url,
            output.as_deref(),
            &ctx,
        ),
        Some(Commands::Info { input }) => cmd_info(&input, &ctx),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: unwiki <COMMAND> <FILE>".yellow());
            println!("       unwiki --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_context(repo: Option<&str>, dump_responses: bool) -> Context {
    let ctx = match repo {
        Some(repo) => Context::for_repo(repo),
        None => Context::new(),
    };
    ctx.with_response_dumps(dump_responses)
}

/// Read a file, or stdin when the path is "-".
fn read_input(input: &Path) -> io::Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input)
    }
}

fn write_output(output: Option<&Path>, text: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn parse_input(input: &Path, ctx: &Context) -> Result<StructuredDocument, Box<dyn std::error::Error>> {
    let response = read_input(input)?;
    debug!(target: ctx.target(), "Read {} bytes from {}", response.len(), input.display());
    Ok(parser::parse_response(&response, ctx)?)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    ctx: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = read_input(input)?;
    let fragment = parser::extract_structure(&response, ctx)?;
    write_output(output, &fragment)?;
    Ok(())
}

fn cmd_parse(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    ctx: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_input(input, ctx)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&doc, format)?;
    write_output(output, &json)?;
    Ok(())
}

fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    paragraphs: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let preset = if paragraphs {
        CleanupPreset::Paragraphs
    } else {
        CleanupPreset::Flat
    };

    let cleaned = CleanupPipeline::from_preset(preset).process(&text);
    write_output(output, &cleaned)?;
    Ok(())
}

fn cmd_report(
    input: &Path,
    output: Option<&Path>,
    sequential: bool,
    paragraphs: bool,
    ctx: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_page_contents(&read_input(input)?, ctx)?;

    let mut options = ReportOptions::new();
    if sequential {
        options = options.sequential();
    }
    if paragraphs {
        options = options.with_cleanup_preset(CleanupPreset::Paragraphs);
    }

    let writer = ReportWriter::new(options);
    let summary = match output {
        Some(path) => writer.write(&pages, path, ctx)?,
        None => writer.write_default(&pages, ctx)?,
    };

    println!(
        "{} {} pages to {}",
        "Wrote".green(),
        summary.page_count,
        summary.path.display()
    );
    if summary.pages_with_defaults > 0 {
        println!(
            "{} {} pages used default values",
            "Note:".yellow(),
            summary.pages_with_defaults
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_payload(
    response: &Path,
    contents: &Path,
    repo: Option<&str>,
    repo_url: &str,
    format: FormatArg,
    api_base_url: Option<String>,
    output: Option<&Path>,
    ctx: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_input(response, ctx)?;
    let generated = load_page_contents(&read_input(contents)?, ctx)?;

    let mut options = ExportOptions::new().with_format(format.into());
    if let Some(url) = api_base_url {
        options = options.with_api_base_url(url);
    }

    let payload = build_export_payload(&doc, &generated, repo_url, &options, ctx)?;
    let json = serde_json::to_string_pretty(&payload)?;
    write_output(output, &json)?;

    let repo_name = repo.unwrap_or_else(|| repo_name_from_url(repo_url));
    eprintln!("{}: {}", "Endpoint".bold(), options.endpoint());
    eprintln!(
        "{}: {}",
        "Filename".bold(),
        export_filename(repo_name, options.format, None)
    );

    Ok(())
}

/// Last two path segments of a repository URL ("owner/name").
fn repo_name_from_url(repo_url: &str) -> &str {
    let trimmed = repo_url.trim_end_matches('/');
    let mut slashes = trimmed.rmatch_indices('/').map(|(i, _)| i);
    match (slashes.next(), slashes.next()) {
        (Some(_), Some(start)) => &trimmed[start + 1..],
        _ => trimmed,
    }
}

fn cmd_info(input: &Path, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_input(input, ctx)?;

    println!("{}", "Wiki Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), doc.title);
    if !doc.description.is_empty() {
        println!("{}: {}", "Description".bold(), doc.description);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Page Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for level in ["high", "medium", "low"] {
        let count = doc.pages.iter().filter(|p| p.importance == level).count();
        println!("{}: {}", format!("Importance {}", level).bold(), count);
    }

    let files: usize = doc.pages.iter().map(|p| p.file_paths.len()).sum();
    println!("{}: {}", "Relevant files".bold(), files);

    let dangling: Vec<&str> = doc
        .pages
        .iter()
        .flat_map(|p| p.related_page_ids.iter())
        .filter(|id| doc.get_page(id).is_none())
        .map(String::as_str)
        .collect();
    if !dangling.is_empty() {
        println!(
            "{}: {}",
            "Unknown related pages".yellow().bold(),
            dangling.join(", ")
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unwiki".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Wiki structure recovery and report tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unwiki".dimmed());
    println!("License: MIT");
}
