use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use promgraph::{prepare, GraphDescription, GraphRegistry, PreparedQuery, Settings};
use promgraph_types::{format_interval, parse_interval};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "promgraph", version)]
#[command(about = "Inspect and render Prometheus graph descriptions")]
struct Args {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file with additional graphs (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip the built-in Kafka graphs
    #[arg(long, global = true)]
    no_defaults: bool,

    /// Accept graphs whose params and query placeholders disagree
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all graphs in the catalogue
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single graph
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Load the catalogue and report whether every graph is valid
    Check,

    /// Render a graph's query with parameter values
    Render {
        id: String,

        /// Parameter value as name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Override the window of a range query (e.g. "1h", "30m")
        #[arg(long)]
        range: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {:?}", s))
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let registry = load_registry(&args)?;

    match args.command {
        Command::List { json } => list(&registry, json),
        Command::Show { id, json } => show(&registry, &id, json),
        Command::Check => {
            println!(
                "{} graphs OK ({} range, {} instant)",
                registry.len(),
                registry.ranged().count(),
                registry.instant().count()
            );
            Ok(())
        }
        Command::Render {
            id,
            params,
            range,
            json,
        } => render(&registry, &id, params, range.as_deref(), json),
    }
}

/// Build the catalogue from settings and command line overrides
fn load_registry(args: &Args) -> Result<GraphRegistry> {
    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if args.no_defaults {
        settings.include_defaults = false;
    }
    if args.lenient {
        settings.strict_params = false;
    }
    settings
        .into_registry()
        .context("Invalid graph catalogue")
}

fn describe_mode(graph: &GraphDescription) -> (&'static str, String) {
    match graph.default_interval() {
        Some(interval) => ("range", format_interval(interval)),
        None => ("instant", "-".to_string()),
    }
}

fn list(registry: &GraphRegistry, json: bool) -> Result<()> {
    if json {
        let graphs: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&graphs)?);
        return Ok(());
    }

    println!("{:<32} {:<8} {:<8} PARAMS", "ID", "MODE", "INTERVAL");
    for graph in registry.iter() {
        let (mode, interval) = describe_mode(graph);
        let params: Vec<_> = graph.params().iter().map(String::as_str).collect();
        println!(
            "{:<32} {:<8} {:<8} {}",
            graph.id(),
            mode,
            interval,
            params.join(",")
        );
    }
    Ok(())
}

fn show(registry: &GraphRegistry, id: &str, json: bool) -> Result<()> {
    let graph = registry.require(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(graph)?);
        return Ok(());
    }

    let (mode, interval) = describe_mode(graph);
    let params: Vec<_> = graph.params().iter().map(String::as_str).collect();
    println!("id:       {}", graph.id());
    println!("mode:     {}", mode);
    println!("interval: {}", interval);
    println!("params:   {}", params.join(", "));
    println!("query:    {}", graph.prometheus_query());
    Ok(())
}

fn render(
    registry: &GraphRegistry,
    id: &str,
    params: Vec<(String, String)>,
    range: Option<&str>,
    json: bool,
) -> Result<()> {
    let graph = registry.require(id)?;
    let values: BTreeMap<String, String> = params.into_iter().collect();

    let prepared = prepare(graph, &values)?;
    let prepared = apply_range(graph, prepared, range)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prepared)?);
    } else {
        match prepared.range() {
            Some(range) => println!("range[{}] {}", format_interval(range), prepared.query()),
            None => println!("instant {}", prepared.query()),
        }
    }
    Ok(())
}

/// Apply a `--range` override; only range graphs accept one.
fn apply_range(
    graph: &GraphDescription,
    prepared: PreparedQuery,
    range: Option<&str>,
) -> Result<PreparedQuery> {
    let Some(range) = range else {
        return Ok(prepared);
    };
    if !graph.is_range() {
        bail!(
            "Graph '{}' is an instant query; --range does not apply",
            graph.id()
        );
    }
    let range = parse_interval(range).with_context(|| format!("Invalid range {:?}", range))?;
    Ok(prepared.with_range(range))
}
