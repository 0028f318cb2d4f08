//! Larder CLI - recipe graph construction and recommendations.
//!
//! # Usage
//!
//! ```bash
//! # Build the graph and the triple file the embedding model trains on
//! larder --recipes recipes.csv build --triples triples.csv --graph graph.bin
//!
//! # Graph statistics (binary graph or triple CSV)
//! larder stats --graph graph.bin
//!
//! # Recommend desserts with sugar, at least one criterion matching
//! larder recommend --meal-type dessert --ingredient sugar --weight ingredients=2 --flexible
//!
//! # Same, from a JSON request
//! larder recommend --request request.json
//!
//! # One JSON request per line in, one result per line out
//! larder batch requests.jsonl -o results.jsonl
//!
//! # Recipe details and the ingredient vocabulary
//! larder recipe 10
//! larder ingredients
//! ```
//!
//! Artifact paths fall back to `RECIPES_DF`, `MODEL_PATH` and `TRIPLES_PATH`.
//! Logs go to stderr (`RUST_LOG`, or `-v` for debug); results go to stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use larder_core::formats::TriplesCsv;
use larder_core::{GraphBuilder, RecipeGraph, RecipeStore};
use larder_kge::EmbeddingModel;
use larder_rec::{RecommendationRequest, Recommender, DEFAULT_TOP_K};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Recipe knowledge graph recommender", long_about = None)]
struct Cli {
    /// Recipe table (CSV)
    #[arg(long, global = true, env = "RECIPES_DF", default_value = "recipes.csv")]
    recipes: PathBuf,

    /// Trained embedding model (JSON)
    #[arg(long, global = true, env = "MODEL_PATH", default_value = "model.json")]
    model: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the recipe graph and write its triples
    Build {
        /// Output triple file (Head,Relation,Tail)
        #[arg(long, env = "TRIPLES_PATH", default_value = "triples.csv")]
        triples: PathBuf,

        /// Output binary graph
        #[arg(long, default_value = "graph.bin")]
        graph: PathBuf,
    },

    /// Show statistics about a built graph
    Stats {
        /// Binary graph (.bin) or triple file (.csv)
        #[arg(long, default_value = "graph.bin")]
        graph: PathBuf,
    },

    /// Recommend recipes for one request
    Recommend(RecommendArgs),

    /// Recommend for many requests (JSON lines), in parallel
    Batch {
        /// Input file, one JSON request per line (`-` for stdin)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a recipe by identifier
    Recipe {
        /// Recipe identifier
        id: String,
    },

    /// List every known ingredient
    Ingredients,
}

#[derive(Args)]
struct RecommendArgs {
    /// Read the whole request from a JSON file
    #[arg(long, conflicts_with_all = [
        "cooking_method", "servings_bin", "cook_time", "cuisine_region",
        "diet_type", "meal_type", "health_type", "ingredient", "weight",
    ])]
    request: Option<PathBuf>,

    #[arg(long)]
    cooking_method: Option<String>,

    #[arg(long)]
    servings_bin: Option<String>,

    #[arg(long)]
    cook_time: Option<String>,

    #[arg(long)]
    cuisine_region: Option<String>,

    /// Diet type (repeatable)
    #[arg(long)]
    diet_type: Vec<String>,

    /// Meal type (repeatable)
    #[arg(long)]
    meal_type: Vec<String>,

    /// Health attribute (repeatable)
    #[arg(long)]
    health_type: Vec<String>,

    /// Ingredient (repeatable)
    #[arg(long)]
    ingredient: Vec<String>,

    /// Category weight as key=value, e.g. ingredients=2.0 (repeatable)
    #[arg(long, value_parser = parse_weight)]
    weight: Vec<(String, f32)>,

    /// Number of recipes to return
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Match any criterion instead of all of them
    #[arg(long)]
    flexible: bool,

    /// Print full recipe records instead of identifiers
    #[arg(long)]
    details: bool,
}

impl RecommendArgs {
    fn to_request(&self) -> Result<RecommendationRequest> {
        let mut request = match &self.request {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Failed to parse request {}", path.display()))?
            }
            None => RecommendationRequest {
                cooking_method: self.cooking_method.clone(),
                servings_bin: self.servings_bin.clone(),
                cook_time: self.cook_time.clone(),
                cuisine_region: self.cuisine_region.clone(),
                diet_types: self.diet_type.clone(),
                meal_type: self.meal_type.clone(),
                health_types: self.health_type.clone(),
                ingredients: self.ingredient.clone(),
                weights: self.weight.iter().cloned().collect::<HashMap<_, _>>(),
                top_k: DEFAULT_TOP_K,
                flexible: false,
            },
        };
        if let Some(k) = self.top_k {
            request.top_k = k;
        }
        request.flexible |= self.flexible;
        Ok(request)
    }
}

fn parse_weight(s: &str) -> std::result::Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let weight = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid weight '{value}': {e}"))?;
    Ok((key.trim().to_string(), weight))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Build { triples, graph } => cmd_build(&cli.recipes, triples, graph),
        Commands::Stats { graph } => cmd_stats(graph),
        Commands::Recommend(args) => cmd_recommend(&cli, args),
        Commands::Batch { input, output } => cmd_batch(&cli, input, output.as_deref()),
        Commands::Recipe { id } => cmd_recipe(&cli.recipes, id),
        Commands::Ingredients => cmd_ingredients(&cli.recipes),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb
}

fn load_store(path: &Path) -> Result<RecipeStore> {
    let start = Instant::now();
    let pb = spinner(format!("Loading {}...", path.display()));
    let store = RecipeStore::from_path(path)
        .with_context(|| format!("Failed to load recipes from {}", path.display()))?;
    pb.finish_with_message(format!("Loaded {} recipes in {:.2?}", store.len(), start.elapsed()));
    Ok(store)
}

fn load_recommender(cli: &Cli) -> Result<Recommender> {
    let store = load_store(&cli.recipes)?;

    let start = Instant::now();
    let pb = spinner(format!("Loading {}...", cli.model.display()));
    let model = EmbeddingModel::from_file(&cli.model)
        .with_context(|| format!("Failed to load model from {}", cli.model.display()))?;
    pb.finish_with_message(format!("Loaded model in {:.2?}", start.elapsed()));

    Ok(Recommender::new(store, model))
}

/// Load a binary graph, or rebuild one from a triple file.
fn load_graph(path: &Path) -> Result<RecipeGraph> {
    let start = Instant::now();
    let pb = spinner(format!("Loading {}...", path.display()));

    let graph = if path.extension().is_some_and(|ext| ext == "csv") {
        let rows = TriplesCsv::read_path(path)
            .with_context(|| format!("Failed to parse triples {}", path.display()))?;
        let mut graph = RecipeGraph::with_capacity(rows.len(), rows.len());
        for (i, row) in rows.iter().enumerate() {
            let triple = row
                .to_triple()
                .with_context(|| format!("Bad triple on row {}", i + 1))?;
            let label = triple.tail.value.clone();
            graph.add_fact(triple.head, triple.relation, triple.tail, label);
        }
        graph
    } else {
        RecipeGraph::from_binary_file(path)
            .with_context(|| format!("Failed to load binary graph {}", path.display()))?
    };

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    Ok(graph)
}

fn cmd_build(recipes: &Path, triples: &Path, graph_path: &Path) -> Result<()> {
    let store = load_store(recipes)?;

    let start = Instant::now();
    let pb = spinner("Building graph...".to_string());
    let graph = GraphBuilder::build(&store);
    pb.finish_with_message(format!("Built in {:.2?}", start.elapsed()));

    ensure_parent(triples)?;
    ensure_parent(graph_path)?;
    TriplesCsv::write_path(triples, graph.triples())
        .with_context(|| format!("Failed to write {}", triples.display()))?;
    graph
        .to_binary_file(graph_path)
        .with_context(|| format!("Failed to write {}", graph_path.display()))?;

    println!(
        "Wrote {} triples to {} and {} nodes to {}",
        graph.triple_count(),
        triples.display(),
        graph.node_count(),
        graph_path.display()
    );
    Ok(())
}

fn cmd_stats(path: &Path) -> Result<()> {
    let graph = load_graph(path)?;
    let stats = graph.stats();

    println!("Recipe Graph Statistics");
    println!("=======================");
    println!("Nodes:          {}", stats.node_count);
    println!("Edges:          {}", stats.edge_count);
    println!("Recipes:        {}", stats.recipe_count);
    println!("Facts/recipe:   {:.2}", stats.avg_facts_per_recipe);
    println!();
    println!("Nodes by type:");
    for (node_type, count) in &stats.nodes_by_type {
        println!("  {:<20} {}", node_type.as_str(), count);
    }
    println!("Edges by relation:");
    for (relation, count) in &stats.edges_by_relation {
        println!("  {:<20} {}", relation.as_str(), count);
    }
    Ok(())
}

fn cmd_recommend(cli: &Cli, args: &RecommendArgs) -> Result<()> {
    let request = args.to_request()?;
    let recommender = load_recommender(cli)?;
    let ids = recommender.recommend(&request)?;

    let out = if args.details {
        let records: Vec<_> = ids.iter().filter_map(|id| recommender.recipe(id)).collect();
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&ids)?
    };
    println!("{out}");
    Ok(())
}

fn cmd_batch(cli: &Cli, input: &Path, output: Option<&Path>) -> Result<()> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file =
            File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut requests = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request: RecommendationRequest = serde_json::from_str(&line)
            .with_context(|| format!("Bad request on line {}", i + 1))?;
        requests.push(request);
    }

    let recommender = load_recommender(cli)?;
    let start = Instant::now();
    let results = recommender.recommend_batch(&requests);
    tracing::info!(requests = requests.len(), elapsed = ?start.elapsed(), "batch complete");

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    for result in results {
        let line = match result {
            Ok(ids) => serde_json::json!({ "recommendations": ids }),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

fn cmd_recipe(recipes: &Path, id: &str) -> Result<()> {
    let store = load_store(recipes)?;
    let Some(record) = store.lookup(id) else {
        bail!("Recipe not found: {id}");
    };
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn cmd_ingredients(recipes: &Path) -> Result<()> {
    let store = load_store(recipes)?;
    let mut out = io::stdout().lock();
    for name in store.unique_ingredients() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
