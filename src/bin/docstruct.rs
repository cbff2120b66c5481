//! Reconstruct document structure from extracted pages.
//!
//! Usage:
//!   docstruct pages.json [--config cfg.json] [--output out.json]
//!   docstruct ocr_pages.json --ocr-text
//!   docstruct pages.json --outline
//!   docstruct pages.json --chunks 50000
//!
//! `pages.json` is an array of pages, each either an array of line objects
//! (`{"text", "x0", "y0", "x1", "y1", "font_size", "is_bold"}`) or a
//! `{"lines": [...]}` object. With `--ocr-text` it is an array of page
//! strings.

use std::fs;
use std::path::PathBuf;
use std::process;

use serde::Deserialize;

use docstruct::layout::{Line, Page};
use docstruct::{Error, Result, StructureConfig, StructurePipeline};

#[derive(Deserialize)]
#[serde(untagged)]
enum PageInput {
    Lines(Vec<Line>),
    Page(Page),
}

impl From<PageInput> for Page {
    fn from(input: PageInput) -> Self {
        match input {
            PageInput::Lines(lines) => Page::new(lines),
            PageInput::Page(page) => page,
        }
    }
}

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    chunks: Option<usize>,
    ocr_text: bool,
    outline: bool,
    verbose: bool,
}

impl CliArgs {
    fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args)
    }

    fn parse(args: &[String]) -> Result<Self> {
        let mut cli = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    cli.config = args.get(i).map(PathBuf::from);
                },
                "--output" | "-o" => {
                    i += 1;
                    cli.output = args.get(i).map(PathBuf::from);
                },
                "--chunks" => {
                    i += 1;
                    let value = args.get(i).ok_or_else(|| {
                        Error::InvalidConfig("--chunks needs a character count".to_string())
                    })?;
                    let max_chars = value.parse::<usize>().map_err(|e| {
                        Error::InvalidConfig(format!("--chunks value '{}': {}", value, e))
                    })?;
                    cli.chunks = Some(max_chars);
                },
                "--ocr-text" => cli.ocr_text = true,
                "--outline" => cli.outline = true,
                "--verbose" | "-v" => cli.verbose = true,
                other if other.starts_with('-') => {
                    return Err(Error::InvalidConfig(format!("unknown option '{}'", other)));
                },
                other => cli.input = Some(PathBuf::from(other)),
            }
            i += 1;
        }
        Ok(cli)
    }
}

fn load_config(cli: &CliArgs) -> Result<StructureConfig> {
    let mut config = match &cli.config {
        Some(path) => StructureConfig::from_file(path)?,
        None => StructureConfig::default(),
    };
    if let Some(max_chars) = cli.chunks {
        let soft_limit = config.chunker.soft_limit.min(max_chars);
        config = config.with_chunk_limits(max_chars, soft_limit);
        config.validate()?;
    }
    Ok(config)
}

fn run(cli: &CliArgs) -> Result<String> {
    let input = cli
        .input
        .as_ref()
        .ok_or_else(|| Error::InvalidConfig("missing input file".to_string()))?;
    let config = load_config(cli)?;
    let pipeline = StructurePipeline::new(config);

    let source_file = input.to_string_lossy().to_string();
    let data = fs::read_to_string(input)?;
    log::info!("Reading {}", source_file);

    if cli.ocr_text {
        let pages: Vec<String> = serde_json::from_str(&data)?;
        let document = pipeline.structure_ocr_text(&source_file, &pages);
        return render_document(&pipeline, &document, cli);
    }

    let pages: Vec<PageInput> = serde_json::from_str(&data)?;
    let mut pages: Vec<Page> = pages.into_iter().map(Page::from).collect();
    if let Some(max) = pipeline.config().max_pages {
        pages.truncate(max);
    }

    if cli.outline {
        let tree = pipeline.structure_outline(&source_file, pages);
        return Ok(serde_json::to_string_pretty(&tree)?);
    }

    let document = pipeline.structure_pages(&source_file, pages);
    render_document(&pipeline, &document, cli)
}

fn render_document(
    pipeline: &StructurePipeline,
    document: &docstruct::Document,
    cli: &CliArgs,
) -> Result<String> {
    if cli.chunks.is_some() {
        let chunks = pipeline.chunk(document)?;
        log::info!("{} chunks", chunks.len());
        return Ok(serde_json::to_string_pretty(&chunks)?);
    }
    document.to_json_pretty()
}

fn main() {
    let cli = match CliArgs::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: docstruct <input.json> [--ocr-text] [--config cfg.json] [--output out.json] [--chunks N] [--outline] [--verbose]"
            );
            process::exit(2);
        },
    };

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let json = match run(&cli) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => println!("{}", json),
    }
}
