use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use termvec_core::persist::{IndexDir, IndexMeta};
use termvec_core::tokenizer::tokenize;
use termvec_core::{Corpus, EngineConfig};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build term-frequency vectors and rank documents against a query", long_about = None)]
struct Cli {
    #[command(flatten)]
    tables: TableArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TableArgs {
    /// JSON file with table settings; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Buckets in the vocabulary table
    #[arg(long, global = true)]
    vocab_capacity: Option<usize>,
    /// Buckets in each document vector
    #[arg(long, global = true)]
    doc_capacity: Option<usize>,
    /// Enable rehashing above this load factor
    #[arg(long, global = true)]
    max_load_factor: Option<f32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count distinct tokens in the corpus
    Vocab {
        /// Input path (file or directory of .txt files)
        #[arg(long)]
        input: String,
    },
    /// Build the corpus and save its vocabulary
    Build {
        /// Input path (file or directory of .txt files)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
    /// Rank corpus lines against a query
    Search {
        /// Input path (file or directory of .txt files)
        #[arg(long)]
        input: String,
        /// Query text, split on whitespace
        #[arg(long)]
        query: String,
        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        k: usize,
        /// Reuse the vocabulary saved by `build` instead of rebuilding it
        #[arg(long)]
        index: Option<PathBuf>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = load_config(&cli.tables)?;

    match cli.command {
        Commands::Vocab { input } => {
            let corpus = load_corpus(&input, config)?;
            println!("Vocabulary size: {}", corpus.vocabulary().len());
            Ok(())
        }
        Commands::Build { input, output } => build_index(&input, &output, config),
        Commands::Search { input, query, k, index, json } => {
            search(&input, &query, k, index.as_deref(), json, config)
        }
    }
}

fn load_config(args: &TableArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(c) = args.vocab_capacity { config.vocabulary_capacity = c; }
    if let Some(c) = args.doc_capacity { config.document_capacity = c; }
    if args.max_load_factor.is_some() { config.max_load_factor = args.max_load_factor; }
    config.validate()?;
    tracing::debug!(?config, "table settings");
    Ok(config)
}

fn input_files(input: &str) -> Result<Vec<PathBuf>> {
    let input_path = Path::new(input);
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input path {input} does not exist");
    }
    Ok(files)
}

/// Every line of every input file is one document.
fn read_input(input: &str) -> Result<String> {
    let mut text = String::new();
    for file in input_files(input)? {
        let body = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        text.push_str(&body);
        if !body.ends_with('\n') { text.push('\n'); }
    }
    Ok(text)
}

fn load_corpus(input: &str, config: EngineConfig) -> Result<Corpus> {
    let corpus = Corpus::from_lines(&read_input(input)?, config)?;
    tracing::info!(num_docs = corpus.len(), num_terms = corpus.vocabulary().len(), "ingested documents");
    Ok(corpus)
}

fn build_index(input: &str, output: &str, config: EngineConfig) -> Result<()> {
    let corpus = load_corpus(input, config)?;
    let dir = IndexDir::new(output);

    let stored: usize = corpus.documents().iter().map(|d| d.len()).sum();
    let longest = corpus.documents().iter().map(|d| d.table().longest_chain()).max().unwrap_or(0);
    tracing::info!(stored_terms = stored, longest_chain = longest, "document vectors built");

    dir.write_vocabulary(corpus.vocabulary())?;
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    dir.write_meta(&IndexMeta::new(
        u32::try_from(corpus.len())?,
        u32::try_from(corpus.vocabulary().len())?,
        created_at,
    ))?;

    tracing::info!(output, "index build complete");
    Ok(())
}

/// Vectorize the input against a saved vocabulary. Terms absent from it are
/// ignored on both the document and the query side.
fn load_indexed_corpus(input: &str, index: &Path, config: EngineConfig) -> Result<Corpus> {
    let dir = IndexDir::new(index);
    let meta = dir.read_meta()?;
    let vocabulary = dir.read_vocabulary(config.vocabulary_capacity)?;
    if vocabulary.len() != meta.vocabulary_size as usize {
        anyhow::bail!(
            "index {} lists {} terms but its vocabulary holds {}",
            index.display(),
            meta.vocabulary_size,
            vocabulary.len()
        );
    }
    let text = read_input(input)?;
    let documents: Vec<Vec<&str>> = text.lines().map(|line| tokenize(line).collect()).collect();
    let corpus = Corpus::with_vocabulary::<Vec<&str>, &str>(vocabulary, &documents, config)?;
    if corpus.len() != meta.num_docs as usize {
        tracing::warn!(indexed = meta.num_docs, current = corpus.len(), "input differs from the indexed corpus");
    }
    tracing::info!(num_docs = corpus.len(), built_at = %meta.created_at, "loaded index vocabulary");
    Ok(corpus)
}

fn search(input: &str, query: &str, k: usize, index: Option<&Path>, json: bool, config: EngineConfig) -> Result<()> {
    let corpus = match index {
        Some(dir) => load_indexed_corpus(input, dir, config)?,
        None => load_corpus(input, config)?,
    };
    let hits = corpus.query(tokenize(query))?;
    if json {
        println!("{}", serde_json::to_string_pretty(hits.top(k))?);
        return Ok(());
    }
    for record in hits.top(k) {
        println!("{}\t{:.4}", record.doc, record.score);
    }
    Ok(())
}
