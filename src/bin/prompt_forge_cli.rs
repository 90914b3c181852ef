//! prompt-forge CLI: run a text operation or check provider connectivity.
//!
//! Usage:
//!   prompt-forge generate <operation> [--tone <tone>] [--settings <file>] [<text>|-]
//!   prompt-forge probe [--settings <file>]
//!   prompt-forge operations

use anyhow::{bail, Context};
use prompt_forge::{Dispatcher, Operation, ProviderId, Settings};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]).await,
        "probe" => cmd_probe(&args[2..]).await,
        "operations" => {
            cmd_operations();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("prompt-forge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"prompt-forge: rewrite text through Gemini, OpenAI-compatible backends or a relay

USAGE:
    prompt-forge <COMMAND> [OPTIONS]

COMMANDS:
    generate <operation> [--tone <tone>] [--settings <file>] [<text>|-]
                                Run an operation; reads stdin when text is '-' or absent
    probe [--settings <file>]   Check every configured provider slot
    operations                  List available operations
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    PROMPT_FORGE_SETTINGS       Settings file (.json, .yaml or .yml)
    GEMINI_API_KEY              Fallback key for the Gemini provider
    PROMPT_FORGE_HTTP_TIMEOUT_SECS
                                Optional request timeout (none by default)
    RUST_LOG                    Log filter, e.g. prompt_forge=debug"#
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments, skipping `--flag value` pairs.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn load_settings(args: &[String]) -> anyhow::Result<Settings> {
    let path = flag_value(args, "--settings")
        .map(PathBuf::from)
        .or_else(|| std::env::var("PROMPT_FORGE_SETTINGS").ok().map(PathBuf::from));

    match path {
        Some(p) => Settings::load(&p).with_context(|| format!("loading {}", p.display())),
        None => Ok(Settings::default()),
    }
}

async fn cmd_generate(args: &[String]) -> anyhow::Result<()> {
    let rest = positionals(args);
    let Some(op) = rest.first() else {
        bail!("missing operation; run `prompt-forge operations` for the list");
    };
    let operation: Operation = op.parse()?;
    let tone = flag_value(args, "--tone");

    let input = match rest.get(1) {
        Some(text) if *text != "-" => text.to_string(),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading input from stdin")?;
            buf
        }
    };
    if input.trim().is_empty() {
        bail!("input text is empty");
    }

    let settings = load_settings(args)?;
    let dispatcher = Dispatcher::new()?;
    let variants = dispatcher
        .generate_with(&settings, operation, input.trim(), tone)
        .await?;

    for (i, variant) in variants.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[{}] {}", i + 1, variant);
    }
    Ok(())
}

async fn cmd_probe(args: &[String]) -> anyhow::Result<()> {
    let settings = load_settings(args)?;
    let dispatcher = Dispatcher::new()?;

    let selections: Vec<_> = ProviderId::ALL
        .iter()
        .map(|p| settings.selection_for(*p))
        .collect();
    let results = dispatcher.probe_all(&selections).await;

    for (provider, alive) in results {
        let marker = if provider == settings.provider { "*" } else { " " };
        let status = if alive { "ready" } else { "unavailable" };
        println!("{marker} {:<11} {status}", provider.id());
    }
    Ok(())
}

fn cmd_operations() {
    for op in Operation::ALL {
        println!("{:<10} {:<15} {}", op.id(), op.name(), op.description());
    }
}
