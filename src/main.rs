//! Spritepad CLI - batch icon and sprite preparation
//!
//! Console front end for the Spritepad library: reads a batch description
//! from a TOML file and/or flags, runs it on a worker thread, and prints
//! per-item progress and a final summary.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use spritepad::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "spritepad", version, about = "Download images and pad them onto fixed-size transparent canvases")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download and normalize a batch of images
    Run(RunArgs),
    /// Print an example configuration file
    ExampleConfig,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Batch configuration file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL pattern with a {name} placeholder
    #[arg(short, long)]
    template: Option<String>,

    /// File with one item per line
    #[arg(long)]
    items_file: Option<PathBuf>,

    /// Items to download (replace the configured list)
    items: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Canvas size, e.g. 350x350
    #[arg(long)]
    canvas: Option<Size>,

    /// Bounding box for the content, e.g. 250x250
    #[arg(long)]
    max_size: Option<Size>,

    /// Padding color: r,g,b,a or #RRGGBBAA
    #[arg(long)]
    padding: Option<Color>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// User-Agent header value
    #[arg(long)]
    user_agent: Option<String>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let outcome = match cli.command {
        Command::ExampleConfig => {
            print!("{}", BatchConfig::example_toml());
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run(args),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(args: &RunArgs) -> anyhow::Result<BatchConfig> {
    let mut config = match (&args.config, &args.template) {
        (Some(path), _) => BatchConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, Some(template)) => BatchConfig::new(UrlTemplate::new(template.clone()), Vec::new()),
        (None, None) => bail!("either --config or --template is required"),
    };

    if let Some(template) = &args.template {
        config.url_template = UrlTemplate::new(template.clone());
    }

    let mut items = Vec::new();
    if let Some(path) = &args.items_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        items.extend(parse_item_list(&text));
    }
    items.extend(
        args.items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(ItemRequest::new),
    );
    if !items.is_empty() {
        config.items = items;
    }

    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(canvas) = args.canvas {
        config.composition.canvas_size = canvas;
    }
    if let Some(max_size) = args.max_size {
        config.composition.max_content_size = max_size;
    }
    if let Some(padding) = args.padding {
        config.composition.padding_color = padding;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            bail!("--timeout must be greater than zero");
        }
        config.fetch.timeout = Duration::from_secs(timeout);
    }
    if let Some(user_agent) = &args.user_agent {
        config.fetch.user_agent = user_agent.clone();
    }

    Ok(config)
}

fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let config = resolve_config(&args)?;

    println!("🖼  Spritepad v{}", spritepad::VERSION);
    println!("   Source: {}", config.url_template);
    println!("   Output: {}", config.output_dir.display());
    println!(
        "   Canvas: {} (content up to {}, padding {})",
        config.composition.canvas_size,
        config.composition.max_content_size,
        config.composition.padding_color
    );
    println!();

    let report = validate_batch(&config.items, &config.url_template, &config.composition);
    for warning in &report.warnings {
        println!("⚠️  {}", warning.message);
        if let Some(suggestion) = &warning.suggestion {
            println!("   → {}", suggestion);
        }
    }
    if !report.can_run() {
        eprintln!("{}", report.summary());
        for line in report.detailed_errors() {
            eprintln!("   {}", line);
        }
        return Ok(ExitCode::FAILURE);
    }

    let handle = spawn_batch(BatchJob {
        runner: BatchRunner::new(HttpFetcher::new(config.fetch.clone())),
        items: config.items.clone(),
        template: config.url_template.clone(),
        config: config.composition,
        storage: DirectoryStorage::new(config.output_dir.clone()),
    });

    for event in handle.events().iter() {
        match event {
            BatchEvent::Started { total } => println!("--- Downloading {} item(s) ---", total),
            BatchEvent::Item(progress) => print_progress(&progress),
            BatchEvent::Finished(_) | BatchEvent::Aborted(_) => {}
        }
    }

    let result = handle.join()?;

    println!();
    println!("--- Download Summary ---");
    println!("Total: {}", result.total_count);
    println!("Success: {}", result.success_count);
    println!("Failed: {}", result.failure_count);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(if result.failure_count == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn print_progress(event: &ProgressEvent) {
    let position = format!("[{}/{}]", event.completed(), event.total);
    match &event.outcome {
        ItemOutcome::Saved { path } => {
            println!("{} ✅ {} → {}", position, event.identifier, path.display())
        }
        outcome => println!(
            "{} ❌ {}: {}",
            position,
            event.identifier,
            outcome.error_detail().unwrap_or_default()
        ),
    }
}
