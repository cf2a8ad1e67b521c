//! CLI tool for generating PowerPoint decks.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Args as ClapArgs, Parser, Subcommand};
use deck_core::{
    ApiResponse, Error, GenerateRequest, MasterTemplateRequest, TableRequest, TextGenerator,
};
use deck_pptx::{inspect_package, respond_to_table, respond_to_template, DeckGenerator};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as Process, Stdio};

/// Generate PowerPoint decks from prompts, HTML tables and master templates.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deck from a topic prompt
    Generate(GenerateArgs),
    /// Build a one-slide deck from the first table in an HTML file
    Table(TableArgs),
    /// Build a master template with a demonstration slide
    Template(TemplateArgs),
    /// Summarize a .pptx file
    Inspect {
        /// The .pptx file to read
        input: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct Output {
    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the response envelope as JSON instead of writing a file
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// Topic of the deck
    prompt: String,

    /// Number of slides (clamped to 1..=20)
    #[arg(short = 'n', long, default_value = "5")]
    slides: usize,

    /// Canvas: 16x9, 16x10, 4x3 or wide
    #[arg(long)]
    layout: Option<String>,

    /// JSON theme override, or @path to a file containing one
    #[arg(long)]
    theme: Option<String>,

    /// Section title (repeatable); replaces generated sections
    #[arg(long = "section")]
    sections: Vec<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    company: Option<String>,

    /// Contact email stored in the document description
    #[arg(long)]
    email: Option<String>,

    /// Leave out charts
    #[arg(long)]
    no_charts: bool,

    /// Leave out image placeholders
    #[arg(long)]
    no_images: bool,

    /// Use the text in this file as the generation service answer
    #[arg(long, conflicts_with = "generator")]
    response_file: Option<PathBuf>,

    /// Shell command acting as the generation service: it receives the
    /// instruction on stdin and answers on stdout
    #[arg(long)]
    generator: Option<String>,

    #[command(flatten)]
    output: Output,
}

#[derive(ClapArgs, Debug)]
struct TableArgs {
    /// HTML file containing a <table>
    input: PathBuf,

    #[arg(short, long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    company: Option<String>,

    #[command(flatten)]
    output: Output,
}

#[derive(ClapArgs, Debug)]
struct TemplateArgs {
    /// Template (and master) name
    title: Option<String>,

    /// JSON file holding a full template request
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Footer text
    #[arg(long)]
    footer: Option<String>,

    #[command(flatten)]
    output: Output,
}

/// Where generation text comes from.
enum Source {
    /// No service configured; every call fails and the template deck is used.
    Offline,
    File(PathBuf),
    Shell(String),
}

impl TextGenerator for Source {
    fn generate(&self, instruction: &str) -> deck_core::Result<String> {
        match self {
            Source::Offline => Err(Error::Upstream("no generation service configured".into())),
            Source::File(path) => fs::read_to_string(path)
                .map_err(|e| Error::Upstream(format!("{}: {}", path.display(), e))),
            Source::Shell(command) => run_generator(command, instruction)
                .map_err(|e| Error::Upstream(format!("{:#}", e))),
        }
    }
}

fn run_generator(command: &str, instruction: &str) -> Result<String> {
    let mut child = Process::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start '{}'", command))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(instruction.as_bytes())
            .context("Failed to send instruction")?;
    }
    let output = child.wait_with_output().context("Generator did not finish")?;
    if !output.status.success() {
        bail!("'{}' exited with {}", command, output.status);
    }
    String::from_utf8(output.stdout).context("Generator output is not UTF-8")
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Generate(generate) => run_generate(generate, args.verbose),
        Command::Table(table) => run_table(table, args.verbose),
        Command::Template(template) => run_template(template, args.verbose),
        Command::Inspect { input, json } => run_inspect(&input, json),
    }
}

fn run_generate(args: GenerateArgs, verbose: bool) -> Result<()> {
    let theme = match args.theme {
        Some(theme) => match theme.strip_prefix('@') {
            Some(path) => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read theme from {}", path))?,
            ),
            None => Some(theme),
        },
        None => None,
    };

    let mut request = GenerateRequest::new(args.prompt).with_slide_count(args.slides);
    request.layout = args.layout;
    request.theme = theme;
    request.author = args.author;
    request.company = args.company;
    request.contact_email = args.email;
    request.include_charts = !args.no_charts;
    request.include_images = !args.no_images;
    if !args.sections.is_empty() {
        request = request.with_sections(args.sections);
    }

    let source = match (args.response_file, args.generator) {
        (Some(path), _) => Source::File(path),
        (None, Some(command)) => Source::Shell(command),
        (None, None) => Source::Offline,
    };

    let response = DeckGenerator::new(source).respond(&request);
    if let Some(deck) = response.data() {
        if verbose {
            eprintln!(
                "  {} slides{}",
                deck.slide_count,
                if deck.used_fallback { " (fallback content)" } else { "" }
            );
        }
    }
    finish(&response, &args.output, verbose, |d| (&d.presentation, &d.filename))
}

fn run_table(args: TableArgs, verbose: bool) -> Result<()> {
    let mut html = String::new();
    File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?
        .read_to_string(&mut html)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut request = TableRequest::new(html);
    request.title = args.title;
    request.author = args.author;
    request.company = args.company;

    let response = respond_to_table(&request);
    finish(&response, &args.output, verbose, |d| (&d.presentation, &d.filename))
}

fn run_template(args: TemplateArgs, verbose: bool) -> Result<()> {
    let mut request = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<MasterTemplateRequest>(&text)
                .with_context(|| format!("Invalid template request in {}", path.display()))?
        }
        None => MasterTemplateRequest::new(""),
    };
    if let Some(title) = args.title {
        request.title = title;
    }
    if args.footer.is_some() {
        request.footer_text = args.footer;
    }

    let response = respond_to_template(&request);
    finish(&response, &args.output, verbose, |d| (&d.template, &d.filename))
}

fn run_inspect(input: &Path, json: bool) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let summary = inspect_package(&bytes).map_err(|e| anyhow::anyhow!("{}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if let Some(name) = &summary.master_name {
        println!("Master: {}", name);
    }
    for section in &summary.sections {
        println!("Section '{}': {} slides", section.name, section.slide_count);
    }
    for slide in &summary.slides {
        println!(
            "Slide {}: {} paragraphs, {} charts, {} tables{}",
            slide.number,
            slide.paragraphs.len(),
            slide.charts.len(),
            slide.tables.len(),
            if slide.notes.is_some() { ", notes" } else { "" }
        );
        for paragraph in &slide.paragraphs {
            println!("  {}", paragraph);
        }
    }
    Ok(())
}

/// Print the envelope or write the decoded package; failures become errors.
fn finish<T: Serialize>(
    response: &ApiResponse<T>,
    output: &Output,
    verbose: bool,
    payload: impl Fn(&T) -> (&String, &String),
) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(response)?);
    }

    let data = match response {
        ApiResponse::Success { data, .. } => data,
        ApiResponse::Failure { message, .. } => bail!("{}", message),
    };
    if output.json {
        return Ok(());
    }

    let (encoded, filename) = payload(data);
    let bytes = STANDARD.decode(encoded).context("Invalid package encoding")?;
    let path = output_path(filename, output.output.as_ref())?;
    write_output(&path, &bytes)?;
    if verbose {
        eprintln!("Written to: {}", path.display());
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

/// Determine the output path for a generated file.
fn output_path(filename: &str, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let output_path = match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(filename)
        }
        None => PathBuf::from(filename),
    };
    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("a.pptx", None).unwrap(), PathBuf::from("a.pptx"));
    }

    #[test]
    fn test_offline_source_fails() {
        assert!(matches!(Source::Offline.generate("x"), Err(Error::Upstream(_))));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "deckgen", "generate", "Bees", "-n", "3", "--section", "A", "--section", "B",
            "--no-charts",
        ])
        .unwrap();
        match args.command {
            Command::Generate(g) => {
                assert_eq!(g.prompt, "Bees");
                assert_eq!(g.slides, 3);
                assert_eq!(g.sections, vec!["A", "B"]);
                assert!(g.no_charts);
                assert!(!g.no_images);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
