//! Command-line interface for lagda
//! This binary lexes / highlights Agda sources and renders literate Agda pages.
//!
//! Usage:
//!   lagda tokens `<path>` [--format `<format>`]        - Dump the token stream
//!   lagda highlight `<path>` [--bare]                 - Highlighted HTML
//!   lagda render `<root>` `<page>`...                   - Type-check and link literate pages
//!   lagda list-formats                              - List available output formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::ConfigError;
use lagda::agda::config::{LagdaConfig, Loader};
use lagda::agda::error::RenderError;
use lagda::agda::literate::{AgdaRenderer, Page};
use lagda::agda::processor::{
    process_file, OutputFormat, ProcessingOptions, ProcessingSpec, ProcessingStage,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("lagda")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lex, highlight and render literate Agda")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
        .arg(
            Arg::new("agda")
                .long("agda")
                .global(true)
                .help("Agda executable to run"),
        )
        .arg(
            Arg::new("stdlib-root")
                .long("stdlib-root")
                .global(true)
                .help("URL that library links are rewritten against"),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of an Agda file")
                .arg(
                    Arg::new("path")
                        .help("Path to the Agda file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'token-simple', 'raw-json')")
                        .default_value("token-simple"),
                ),
        )
        .subcommand(
            Command::new("highlight")
                .about("Print an Agda file as highlighted HTML")
                .arg(
                    Arg::new("path")
                        .help("Path to the Agda file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("bare")
                        .long("bare")
                        .help("Do not wrap the output in <pre><code>")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Type-check literate Agda pages and rewrite their links")
                .arg(
                    Arg::new("root")
                        .help("Site root the page paths are relative to")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("pages")
                        .help("Literate pages (*.lagda.md), relative to the root")
                        .required(true)
                        .num_args(1..)
                        .index(2),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(sub),
        Some(("highlight", sub)) => handle_highlight_command(sub, &load_config(sub, ".")),
        Some(("render", sub)) => {
            let root = required(sub, "root");
            handle_render_command(sub, &load_config(sub, root))
        }
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer the site's `lagda.toml`, then `--config`, then individual flags.
fn load_config(matches: &ArgMatches, site_root: &str) -> LagdaConfig {
    build_config(matches, site_root).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    })
}

fn build_config(matches: &ArgMatches, site_root: &str) -> Result<LagdaConfig, ConfigError> {
    let mut loader = Loader::new().with_site(site_root);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader
        .with_agda(matches.get_one::<String>("agda").map(String::as_str))?
        .with_stdlib_root(matches.get_one::<String>("stdlib-root").map(String::as_str))?
        .build()
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) {
    let path = required(matches, "path");
    let format = required(matches, "format");

    let spec = ProcessingSpec::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available formats: {}", ProcessingSpec::available().join(", "));
        process::exit(1);
    });

    run_processing(path, &spec, &ProcessingOptions::default());
}

/// Handle the highlight command
fn handle_highlight_command(matches: &ArgMatches, config: &LagdaConfig) {
    let path = required(matches, "path");
    let stage = if config.highlight.coalesce {
        ProcessingStage::Token
    } else {
        ProcessingStage::Raw
    };
    let spec = ProcessingSpec::new(stage, OutputFormat::Html);
    let options = ProcessingOptions {
        wrap_pre: config.highlight.wrap_pre && !matches.get_flag("bare"),
    };

    run_processing(path, &spec, &options);
}

fn run_processing(path: &str, spec: &ProcessingSpec, options: &ProcessingOptions) {
    let output = process_file(path, spec, options).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    print!("{}", output);
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches, config: &LagdaConfig) {
    let root = PathBuf::from(required(matches, "root"));
    let renderer = AgdaRenderer::new(&root, config.render.clone());

    let mut failures = 0;
    let mut pages = Vec::new();
    for relative in matches.get_many::<String>("pages").into_iter().flatten() {
        match Page::load(&root, relative) {
            Ok(page) => pages.push(page),
            Err(e) => {
                failures += 1;
                report_failure(relative, &e);
            }
        }
    }

    for outcome in renderer.render_pages(&pages) {
        let relative = outcome.relative_path.display();
        match outcome.result.and_then(|rendered| renderer.publish(&rendered)) {
            Ok(path) => println!("{:>6} {} -> {}", "OK", relative, path.display()),
            Err(e) => {
                failures += 1;
                report_failure(&relative, &e);
            }
        }
    }

    if failures > 0 {
        process::exit(2);
    }
}

fn report_failure(page: &dyn std::fmt::Display, error: &RenderError) {
    println!("{:>6} {}", "KO", page);
    eprintln!("{}", error);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for name in ProcessingSpec::available() {
        println!("  {}", name);
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_else(|| {
            eprintln!("Missing argument: {}", id);
            process::exit(1);
        })
}
