use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use social_network_analyzer::config::{Config, LoadPolicy};
use social_network_analyzer::data::InputFormat;
use social_network_analyzer::{storage, Query, QueryKind, Session};

#[derive(Parser, Debug)]
#[clap(
    name = "social-network-analyzer",
    about = "Load a social network edge list and run graph analyses on it"
)]
struct Cli {
    /// Path to the input edge list or CSV file
    #[clap(long)]
    input: PathBuf,

    /// Input format (inferred from the file extension when omitted)
    #[clap(long, value_enum)]
    format: Option<InputFormat>,

    /// Analysis to run
    #[clap(long, value_enum, default_value = "summary")]
    query: QueryKind,

    /// Start node for BFS (defaults to the first node in the file)
    #[clap(long)]
    start: Option<String>,

    /// Minimum degree for highlight-nodes
    #[clap(long, default_value = "50")]
    min_degree: usize,

    /// Fraction of the maximum degree centrality for high-centrality
    #[clap(long, default_value = "0.8")]
    ratio: f64,

    /// Integer value to look for with bst-search
    #[clap(long)]
    target: Option<String>,

    /// Skip malformed lines instead of failing
    #[clap(long)]
    lenient: bool,

    /// Write the result as JSON to this file
    #[clap(long)]
    output: Option<PathBuf>,

    /// Export the graph, coloured by the query's highlight, as GraphML
    #[clap(long)]
    graphml: Option<PathBuf>,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let policy = if args.lenient {
        LoadPolicy::Lenient
    } else {
        LoadPolicy::Strict
    };
    let config = Config {
        min_degree: args.min_degree,
        centrality_ratio: args.ratio,
        load_policy: policy,
        ..Config::default()
    };

    log::info!("Input: {}", args.input.display());
    log::info!("Query: {:?}", args.query);

    let query = Query::build(args.query, &config, args.start, args.target)?;

    let mut session = Session::new(config);
    session.load_with(&args.input, args.format)?;

    let result = session.run(&query)?;
    print!("{}", result);

    if let (Some(path), Some(graph)) = (&args.output, session.graph()) {
        storage::save_result(query.kind(), &result, graph, path)?;
    }

    if let Some(path) = &args.graphml {
        session.render(path)?;
    }

    log::info!("Analysis complete");

    Ok(())
}
