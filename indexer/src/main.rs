use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use termindex_core::persist::{load_table, IndexPaths};
use termindex_core::tokenizer::{self, Normalizer, Stopwords};
use termindex_core::{build, BuildOptions, DirectorySource, EncodingPolicy, Indexes, InvertedIndex, QueryEngine};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

mod repl;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build forward and inverted term indexes and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build both indexes from a directory of documents and write them out
    Build(BuildArgs),
    /// Build and write both indexes, then answer queries interactively
    Run(BuildArgs),
    /// Answer queries against a previously written inverted index
    Query {
        /// Inverted index file written by `build`
        #[arg(long, default_value = "inverted_index.txt")]
        index: PathBuf,
        /// Answer this query and exit instead of prompting
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Directory of documents; every file in it is one document
    #[arg(long, env = "INDEXER_INPUT")]
    input: PathBuf,
    /// Whitespace-separated stopword file (built-in English list when omitted)
    #[arg(long, env = "INDEXER_STOPWORDS")]
    stopwords: Option<PathBuf>,
    /// Directory receiving forward_index.txt and inverted_index.txt
    #[arg(long, env = "INDEXER_OUTPUT", default_value = ".")]
    output: PathBuf,
    /// Write outer keys in map order instead of sorting them
    #[arg(long, default_value_t = false)]
    no_sort: bool,
    /// Skip documents that are not valid UTF-8 instead of failing the run
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
    let cli = Cli::parse();

    tokenizer::bootstrap();
    match cli.command {
        Commands::Build(args) => {
            build_and_save(&args)?;
            Ok(())
        }
        Commands::Run(args) => {
            let (normalizer, indexes) = build_and_save(&args)?;
            let engine = QueryEngine::new(&indexes.inverted, &normalizer);
            repl::run(io::stdin().lock(), &mut io::stdout().lock(), &engine)?;
            Ok(())
        }
        Commands::Query { index, query } => {
            let table = load_table(&index).with_context(|| format!("loading inverted index {}", index.display()))?;
            let inverted = InvertedIndex::from_table(table);
            tracing::info!(num_terms = inverted.len(), "inverted index loaded");
            // Queries never consult the stopword set.
            let normalizer = Normalizer::new(Stopwords::empty());
            let engine = QueryEngine::new(&inverted, &normalizer);
            let mut out = io::stdout().lock();
            match query {
                Some(q) => repl::write_results(&mut out, &engine.search(&q))?,
                None => {
                    repl::run(io::stdin().lock(), &mut out, &engine)?;
                }
            }
            out.flush()?;
            Ok(())
        }
    }
}

fn build_and_save(args: &BuildArgs) -> Result<(Normalizer, Indexes)> {
    let stopwords = match &args.stopwords {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading stopwords");
            Stopwords::load(path)?
        }
        None => Stopwords::english(),
    };
    let normalizer = Normalizer::new(stopwords);

    let start = Instant::now();
    let encoding = if args.skip_invalid { EncodingPolicy::Skip } else { EncodingPolicy::Strict };
    let source = DirectorySource::new(&args.input, encoding);
    let indexes = build(&source, &normalizer)?;

    let options = BuildOptions { sort_forward: !args.no_sort, sort_inverted: !args.no_sort };
    let report = indexes
        .save(&IndexPaths::new(&args.output), options)
        .with_context(|| format!("writing indexes to {}", args.output.display()))?;
    let elapsed = start.elapsed();

    println!("Indexing Time: {:.2} seconds", elapsed.as_secs_f64());
    println!("Forward Index Size: {:.2} MB", report.forward.size_mib);
    println!("Inverted Index Size: {:.2} MB", report.inverted.size_mib);
    tracing::info!(
        forward = %report.forward.path.display(),
        inverted = %report.inverted.path.display(),
        "index build complete"
    );
    Ok((normalizer, indexes))
}
