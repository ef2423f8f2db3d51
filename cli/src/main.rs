//! Warmpath CLI: warm-introduction searches over a graph snapshot file
//!
//! Loads a JSON snapshot (`{"entities": [...], "edges": [...]}`) and runs the
//! same searches the HTTP API serves.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use warmpath::{
    build_view, strongest_path, Config, EdgeKind, EdgeStore, EntityId, EntityStore, InMemoryGraph,
    IntroFinder, IntroPath, IntroPaths, JobState, PathfindingConfig,
};

#[derive(Parser)]
#[command(name = "warmpath-cli", version, about = "Warm-introduction path discovery")]
struct Cli {
    /// Graph snapshot (JSON)
    #[arg(long, global = true, env = "WARMPATH_GRAPH")]
    graph: Option<PathBuf>,

    /// YAML config providing pathfinding defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Search parameter overrides shared by the search commands
#[derive(clap::Args)]
struct SearchArgs {
    /// Maximum hops per path
    #[arg(long)]
    max_hops: Option<usize>,

    /// Discard paths weaker than this
    #[arg(long)]
    min_strength: Option<f64>,

    /// Maximum number of paths to return
    #[arg(long)]
    max_results: Option<usize>,

    /// Traverse edges in both directions
    #[arg(long)]
    bidirectional: bool,

    /// Only traverse these edge kinds (repeatable)
    #[arg(long = "kind")]
    kinds: Vec<String>,
}

impl SearchArgs {
    fn apply(&self, base: &PathfindingConfig) -> PathfindingConfig {
        let mut config = base.clone();
        if let Some(max_hops) = self.max_hops {
            config.max_hops = max_hops;
        }
        if let Some(min_strength) = self.min_strength {
            config.min_strength = min_strength;
        }
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if self.bidirectional {
            config.bidirectional = true;
        }
        if !self.kinds.is_empty() {
            config.kinds = Some(self.kinds.iter().map(|k| EdgeKind::new(k.as_str())).collect());
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find paths from explicit sources to a target
    Paths {
        /// Source entity id (repeatable)
        #[arg(long = "from", required = true)]
        sources: Vec<String>,

        /// Target entity id
        #[arg(long = "to")]
        target: String,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Find paths from every internal owner to a target
    Intros {
        /// Target entity id
        #[arg(long = "to")]
        target: String,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Warm introductions for many targets
    Batch {
        /// Target entity ids (repeatable)
        #[arg(long = "to")]
        targets: Vec<String>,

        /// Use every pipeline company as a target
        #[arg(long)]
        pipeline: bool,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Single strongest path, no hop bound
    Strongest {
        #[arg(long = "from")]
        source: String,

        #[arg(long = "to")]
        target: String,

        /// Traverse edges in both directions
        #[arg(long)]
        bidirectional: bool,
    },
    /// Graph statistics
    Stats,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let defaults = match &cli.config {
        Some(path) => {
            Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?
                .pathfinding
        }
        None => PathfindingConfig::default(),
    };
    let graph_path = cli
        .graph
        .clone()
        .context("no graph snapshot given (use --graph or WARMPATH_GRAPH)")?;
    let graph = InMemoryGraph::load_json_file(&graph_path)
        .with_context(|| format!("loading graph {}", graph_path.display()))?;

    match cli.command {
        Commands::Paths { sources, target, search } => {
            let finder = IntroFinder::new(graph, search.apply(&defaults));
            let sources: Vec<EntityId> = sources.into_iter().map(EntityId::from).collect();
            let found = finder.find_intro_paths(&sources, &EntityId::from(target))?;
            print_found(&found, &cli.format)?;
        }
        Commands::Intros { target, search } => {
            let finder = IntroFinder::new(graph, search.apply(&defaults));
            let found = finder.warm_introductions(&EntityId::from(target))?;
            print_found(&found, &cli.format)?;
        }
        Commands::Batch { targets, pipeline, search } => {
            let mut targets: Vec<EntityId> = targets.into_iter().map(EntityId::from).collect();
            if pipeline {
                targets.extend(graph.entities().filter(|e| e.is_pipeline).map(|e| e.id.clone()));
            }
            let finder = IntroFinder::new(graph, search.apply(&defaults));
            let job = JobState::new();
            let results = finder.batch_warm_introductions(&targets, &job)?;

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({ "job": job.snapshot(), "results": results });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => {
                    for result in &results {
                        println!("== {}", result.target);
                        if let Some(error) = &result.error {
                            println!("error: {}", error);
                            continue;
                        }
                        print_paths(&result.paths, &cli.format)?;
                    }
                    let progress = job.snapshot();
                    println!(
                        "{} target(s), {} path(s), {} failed",
                        progress.total, progress.paths_found, progress.failed
                    );
                }
            }
        }
        Commands::Strongest { source, target, bidirectional } => {
            let filter = warmpath::EdgeFilter { kinds: None, bidirectional };
            let view = build_view(&graph.all_edges()?, &filter);
            match strongest_path(&view, &source, &target) {
                Some(path) => match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&path)?),
                    _ => println!(
                        "{}  (strength {:.3}, {} hop(s))",
                        path.nodes.join(" -> "),
                        path.strength,
                        path.length
                    ),
                },
                None => println!("(no path)"),
            }
        }
        Commands::Stats => {
            let stats = graph.statistics();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    println!("Entities:        {}", graph.entity_count()?);
                    println!("Edges:           {}", stats.edge_count);
                    println!("Internal owners: {}", stats.internal_owner_count);
                    for (kind, count) in &stats.kinds {
                        println!("  {:<32} {}", kind, count);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Ranked paths, then a note on stderr when a budget cut the search short
fn print_found(found: &IntroPaths, format: &OutputFormat) -> anyhow::Result<()> {
    print_paths(&found.paths, format)?;
    if let Some(note) = truncation_note(found) {
        eprintln!("{}", note);
    }
    Ok(())
}

fn truncation_note(found: &IntroPaths) -> Option<String> {
    found
        .truncated
        .then(|| format!("(search stopped early after {} expansions)", found.expansions))
}

fn route(path: &IntroPath) -> String {
    path.path
        .iter()
        .map(|node| node.name.clone().unwrap_or_else(|| node.id.to_string()))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn print_paths(paths: &[IntroPath], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(paths)?);
        }
        OutputFormat::Csv => {
            println!("rank,route,kinds,strength,length");
            for (i, path) in paths.iter().enumerate() {
                let kinds: Vec<&str> = path.kinds.iter().map(|k| k.as_str()).collect();
                println!(
                    "{},{},{},{:.4},{}",
                    i + 1,
                    format_csv_value(&route(path)),
                    format_csv_value(&kinds.join(" ")),
                    path.strength,
                    path.length
                );
            }
        }
        OutputFormat::Table => {
            if paths.is_empty() {
                println!("(no paths)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["#", "Route", "Kinds", "Strength", "Hops"]);

            for (i, path) in paths.iter().enumerate() {
                let kinds: Vec<&str> = path.kinds.iter().map(|k| k.as_str()).collect();
                table.add_row(vec![
                    (i + 1).to_string(),
                    route(path),
                    kinds.join(", "),
                    format!("{:.3}", path.strength),
                    path.length.to_string(),
                ]);
            }

            println!("{}", table);
            println!("{} path(s)", paths.len());
        }
    }

    Ok(())
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
