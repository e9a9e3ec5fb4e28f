//! Artjoin CLI - join, index and browse artist/artwork CSV datasets
//!
//! # Commands
//!
//! ```bash
//! artjoin serve                      # Start HTTP server (port 3000)
//! artjoin search albers              # Search artists with artworks
//! artjoin artist 1                   # Artist profile and artwork cards
//! artjoin artworks 1 --format csv    # Raw artworks of an artist
//! artjoin stats                      # Load statistics
//! artjoin preview artworks -l 10     # First rows of a dataset
//! artjoin parse Artists.csv          # Just parse a CSV to JSON
//! ```
//!
//! Dataset paths default to `Artists.csv` and `artworks_sampled.csv`, or the
//! `ARTJOIN_ARTISTS` / `ARTJOIN_ARTWORKS` environment variables.

use artjoin::{load_files, parse_file, Catalog, Dataset, ViewerConfig, PREVIEW_ROWS};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "artjoin")]
#[command(about = "Join, index and browse artist and artwork CSV datasets", long_about = None)]
struct Cli {
    /// Artists CSV (default: $ARTJOIN_ARTISTS or Artists.csv)
    #[arg(long, global = true)]
    artists: Option<PathBuf>,

    /// Artworks CSV (default: $ARTJOIN_ARTWORKS or artworks_sampled.csv)
    #[arg(long, global = true)]
    artworks: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of front-end assets served at /
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Search artists that have artworks in the collection
    Search {
        /// Free-text query (at least 2 characters)
        query: String,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show an artist and the cards of their artworks
    Artist {
        /// Artist ConstituentID
        id: String,
    },

    /// Output the raw artwork records of an artist
    Artworks {
        /// Artist ConstituentID
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show load statistics
    Stats,

    /// Show the first rows of a dataset
    Preview {
        /// artists or artworks
        dataset: Dataset,

        /// Number of rows
        #[arg(short, long, default_value_t = PREVIEW_ROWS)]
        limit: usize,
    },

    /// Parse a single CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ViewerConfig::from_env()
        .with_artists(cli.artists)
        .with_artworks(cli.artworks);

    let result = match cli.command {
        Commands::Serve { port, static_dir } => {
            cmd_serve(config.with_port(port).with_static_dir(static_dir)).await
        }

        Commands::Search { query, json } => cmd_search(&config, &query, json),

        Commands::Artist { id } => cmd_artist(&config, &id),

        Commands::Artworks { id, format, output } => {
            cmd_artworks(&config, &id, format, output.as_deref())
        }

        Commands::Stats => cmd_stats(&config),

        Commands::Preview { dataset, limit } => cmd_preview(&config, dataset, limit),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load(config: &ViewerConfig) -> Result<Catalog, Box<dyn std::error::Error>> {
    Ok(load_files(&config.artists_path, &config.artworks_path)?)
}

async fn cmd_serve(config: ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    artjoin::server::start_server(config).await
}

fn cmd_search(
    config: &ViewerConfig,
    query: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(config)?;

    if json {
        let response = artjoin::api::SearchResponse::for_query(&catalog, query);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let artists = match catalog.search_summaries(query) {
        None => {
            eprintln!(
                "🔎 Query must be at least {} characters",
                artjoin::catalog::MIN_QUERY_CHARS
            );
            return Ok(());
        }
        Some(artists) => artists,
    };

    if artists.is_empty() {
        eprintln!("🔎 {}", artjoin::api::NO_MATCHES_MESSAGE);
        return Ok(());
    }

    for summary in artists {
        let mut details = Vec::new();
        if let Some(n) = &summary.nationality {
            details.push(n.clone());
        }
        if let Some(l) = &summary.lifespan {
            details.push(l.clone());
        }
        let plural = if summary.artwork_count == 1 { "" } else { "s" };
        details.push(format!("{} artwork{}", summary.artwork_count, plural));

        println!("{:>8}  {}  ({})", summary.id, summary.name, details.join(" • "));
    }

    Ok(())
}

fn cmd_artist(config: &ViewerConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(config)?;
    let detail = catalog
        .artist_detail(id)
        .ok_or_else(|| format!("Artist not found: {}", id))?;

    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

fn cmd_artworks(
    config: &ViewerConfig,
    id: &str,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(config)?;
    let artworks = catalog.artworks_for(id);
    eprintln!("🖼️  {} artwork(s) for artist {}", artworks.len(), id);

    let sink: Box<dyn Write> = match output {
        Some(p) => Box::new(fs::File::create(p)?),
        None => Box::new(io::stdout()),
    };

    match format {
        OutputFormat::Json => {
            let mut sink = sink;
            serde_json::to_writer_pretty(&mut sink, artworks)?;
            writeln!(sink)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(sink);
            writer.write_record(catalog.artwork_columns())?;
            for artwork in artworks {
                writer.write_record(artwork.values())?;
            }
            writer.flush()?;
        }
    }

    if let Some(p) = output {
        eprintln!("💾 Output written to: {}", p.display());
    }
    Ok(())
}

fn cmd_stats(config: &ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(config)?;
    println!("{}", serde_json::to_string_pretty(catalog.stats())?);
    Ok(())
}

fn cmd_preview(
    config: &ViewerConfig,
    dataset: Dataset,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(config)?;
    let preview = catalog.preview(dataset, limit);

    if preview.rows.is_empty() {
        eprintln!("📋 No data available");
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(&preview.columns)?;
    for row in &preview.rows {
        writer.write_record(row.values())?;
    }
    writer.flush()?;

    if preview.total > preview.rows.len() {
        eprintln!("📋 Showing first {} of {} rows", preview.rows.len(), preview.total);
    }
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let table = parse_file(input)?;
    eprintln!("   Columns: {}", table.schema.columns().join(", "));
    if table.dropped_rows > 0 {
        eprintln!("   ⚠️  Skipped {} malformed rows", table.dropped_rows);
    }
    eprintln!("✅ Parsed {} records", table.records.len());

    let json = serde_json::to_string_pretty(&table.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
