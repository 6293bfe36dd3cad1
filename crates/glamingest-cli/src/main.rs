//! glamingest CLI
//!
//! Turns collection object records into batch-editor statements:
//! - `object`: fetch a record, its graph matches and the crosswalk over HTTP
//! - `offline`: run the same pipeline on local files
//! - `crosswalk`: print the object-type crosswalk as parsed from the wiki

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glamingest_core::wikitable::parse_tables;
use glamingest_core::{
    generate_offline, generate_statements, normalize, ArtistLookup, Collaborators, CrosswalkInput,
    CrosswalkRow, CrosswalkTable, GenerationOutput, GraphMatches, InstitutionProfile, MediaUpload,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;

mod config;
mod http;

use config::ClientConfig;
use http::HttpPorts;

#[derive(Parser)]
#[command(name = "glamingest")]
#[command(
    author,
    version,
    about = "Generate knowledge-graph statements from museum collection records"
)]
struct Cli {
    /// More log output (debug level).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON file with endpoint settings (defaults + `GLAMINGEST_*` env otherwise).
    #[arg(long, global = true)]
    client_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one object by id and print its statements.
    Object {
        /// Collection object id, e.g. 436535.
        id: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Institution profile JSON (defaults to The Met).
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Skip the artist reconciliation lookup.
        #[arg(long)]
        no_artist_lookup: bool,
    },

    /// Generate statements from local files without network access.
    Offline {
        /// Raw object record JSON.
        #[arg(long)]
        record: PathBuf,

        /// Existing item ids carrying this object id (repeatable).
        #[arg(long = "match", value_name = "QID")]
        matches: Vec<String>,

        /// Crosswalk page wikitext.
        #[arg(long)]
        crosswalk: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Fetch and print the object-type crosswalk.
    Crosswalk {
        /// Wiki page title (defaults to the configured crosswalk page).
        #[arg(long)]
        page: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Serialized form of one generation run.
#[derive(Debug, Serialize)]
struct Report<'a> {
    object_id: &'a str,
    subject: Option<String>,
    statements: Vec<String>,
    diagnostics: &'a [String],
    media_upload: Option<&'a MediaUpload>,
    commons_search_url: Option<&'a str>,
    display_image: Option<&'a str>,
    digest: String,
}

impl<'a> Report<'a> {
    fn new(object_id: &'a str, out: &'a GenerationOutput) -> Self {
        Self {
            object_id,
            subject: out.subject.as_ref().map(|s| s.statement_subject().to_string()),
            statements: out.statements.lines(),
            diagnostics: &out.diagnostics,
            media_upload: out.media_upload.as_ref(),
            commons_search_url: out.commons_search_url.as_deref(),
            display_image: out.display_image.as_deref(),
            digest: out.statements.digest(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Object {
            id,
            format,
            profile,
            no_artist_lookup,
        } => {
            let profile = load_profile(profile.as_deref())?;
            let ports = HttpPorts::new(client_config(cli.client_config.as_deref())?)?;
            let collaborators = Collaborators {
                records: &ports,
                graph: &ports,
                crosswalk: CrosswalkInput::Source(&ports),
                artists: (!no_artist_lookup).then_some(&ports as &dyn ArtistLookup),
            };
            let out = generate_statements(&id, &collaborators, &profile)?;
            print_output(&id, &out, format)
        }
        Commands::Offline {
            record,
            matches,
            crosswalk,
            format,
            profile,
        } => {
            let profile = load_profile(profile.as_deref())?;
            let raw: serde_json::Value = serde_json::from_str(
                &std::fs::read_to_string(&record)
                    .with_context(|| format!("failed to read {}", record.display()))?,
            )
            .with_context(|| format!("failed to parse {}", record.display()))?;
            let table = match crosswalk {
                Some(path) => CrosswalkTable::from_rows(read_crosswalk(&path)?),
                None => CrosswalkTable::empty(),
            };
            let object_id = normalize(&raw).record.object_id.unwrap_or_default();
            let out = generate_offline(&raw, &GraphMatches::new(matches), &table, &profile);
            print_output(&object_id, &out, format)
        }
        Commands::Crosswalk { page } => {
            let ports = HttpPorts::new(client_config(cli.client_config.as_deref())?)?;
            let title = page.unwrap_or_else(|| ports.crosswalk_page().to_string());
            let rows = ports.fetch_crosswalk(&title)?;
            print_crosswalk(&title, &rows);
            Ok(())
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn client_config(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::from_path(path),
        None => ClientConfig::from_env(),
    }
}

fn load_profile(path: Option<&Path>) -> Result<InstitutionProfile> {
    match path {
        Some(path) => Ok(InstitutionProfile::from_path(path)?),
        None => Ok(InstitutionProfile::default()),
    }
}

fn read_crosswalk(path: &Path) -> Result<Vec<CrosswalkRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let tables = parse_tables(&text);
    let table = tables
        .first()
        .ok_or_else(|| anyhow!("no wiki table in {}", path.display()))?;
    Ok(CrosswalkRow::from_table(table)?)
}

fn print_output(object_id: &str, out: &GenerationOutput, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let report = Report::new(object_id, out);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => print_text(object_id, out),
    }
    Ok(())
}

fn print_text(object_id: &str, out: &GenerationOutput) {
    let subject = out
        .subject
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    eprintln!(
        "{} object {} → {}",
        "Generated".green().bold(),
        object_id.bold(),
        subject.bold()
    );

    for note in &out.diagnostics {
        let marker = if note.starts_with("warning") {
            "!".yellow().bold()
        } else {
            "·".dimmed()
        };
        eprintln!("  {marker} {note}");
    }

    // Statements go to stdout so they can be piped straight into the batch editor.
    if !out.statements.is_empty() {
        println!("{}", out.statements.to_batch_text());
    }

    if let Some(upload) = &out.media_upload {
        eprintln!("  {} {}", "upload:".cyan().bold(), upload.file_name);
        eprintln!("    {}", upload.upload_url);
    }
    if let Some(search) = &out.commons_search_url {
        eprintln!("  {} {search}", "commons search:".cyan());
    }
    if let Some(image) = &out.display_image {
        eprintln!("  {} {image}", "image:".cyan());
    }
    eprintln!("  {} {}", "digest:".dimmed(), out.statements.digest());
}

fn print_crosswalk(title: &str, rows: &[CrosswalkRow]) {
    eprintln!(
        "{} {} ({} rows)",
        "Crosswalk".green().bold(),
        title.bold(),
        rows.len()
    );
    for row in rows {
        let id = row
            .controlled_id
            .as_deref()
            .map(|id| id.normal())
            .unwrap_or_else(|| "-".red());
        print!("{}\t{id}", row.label);
        if let Some(extra) = &row.extra_statement {
            print!("\t+{extra}");
        }
        println!();
    }
}
