#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mongo_explorer::bson::document_to_relaxed_extjson_string;
use mongo_explorer::connection::ConnectionManager;
use mongo_explorer::connection::ops::documents::browse_page;
use mongo_explorer::connection::ops::export::{ExportSelection, export_documents};
use mongo_explorer::connection::ops::search::{SEARCH_RESULT_LIMIT, SearchKind, search};
use mongo_explorer::models::{ConnectionTarget, SavedConnection};
use mongo_explorer::state::{AppSettings, ConfigManager, ExplorerSession, Pagination};
use mongo_explorer::stats::{CollectionReport, analyze_field_exact};

/// Cardinality rows shown at each end of the ranking.
const CARDINALITY_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "mongo-explorer")]
#[command(about = "Browse, search, profile and export MongoDB collections", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Config directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Full connection string, e.g. mongodb://localhost:27017/
    #[arg(long, global = true)]
    uri: Option<String>,

    /// Name of a saved connection
    #[arg(long, global = true, conflicts_with = "uri")]
    saved: Option<String>,

    #[arg(long, global = true, default_value = "localhost")]
    host: String,

    #[arg(long, global = true, default_value_t = 27017)]
    port: u16,

    #[arg(long, global = true)]
    username: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    #[arg(long, global = true, default_value = "admin")]
    auth_source: String,

    /// Save the connection under this name after connecting
    #[arg(long, global = true)]
    save_as: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List databases (system databases hidden)
    Databases,
    /// List collections in a database
    Collections { database: String },
    /// Sampled statistics for a collection
    Stats {
        database: String,
        collection: String,
        /// Documents to sample (defaults to the configured sample limit)
        #[arg(long)]
        sample: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one page of documents
    Browse {
        database: String,
        collection: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        per_page: Option<u64>,
    },
    /// Search one field (kinds: exact, contains, regex, gt, lt)
    Search { database: String, collection: String, field: String, kind: SearchKind, value: String },
    /// Exact coverage and distinct count of one field over the whole collection
    Analyze { database: String, collection: String, field: String },
    /// Export documents as JSON
    Export {
        database: String,
        collection: String,
        /// Export only these fields (comma separated); `_id` is included
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["field", "custom", "page"])]
        fields: Vec<String>,
        /// Export the values of a single field
        #[arg(long, conflicts_with_all = ["custom", "page"])]
        field: Option<String>,
        /// With --field, export distinct values only
        #[arg(long, requires = "field")]
        unique: bool,
        /// Export a custom field selection (comma separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "page")]
        custom: Vec<String>,
        /// With --custom, keep `_id`
        #[arg(long, requires = "custom")]
        include_id: bool,
        /// Export only this page of documents
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        per_page: Option<u64>,
        /// Output directory (defaults to the configured export folder)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the JSON instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

impl ConnectionArgs {
    fn target(&self, config: &ConfigManager) -> Result<ConnectionTarget> {
        if let Some(name) = &self.saved {
            let saved = config
                .find_connection(name)?
                .with_context(|| format!("No saved connection named '{name}'"))?;
            return Ok(saved.target);
        }
        if let Some(uri) = &self.uri {
            return Ok(ConnectionTarget::ConnectionString(uri.clone()));
        }
        Ok(ConnectionTarget::Parameters {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            auth_source: self.auth_source.clone(),
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config_dir {
        Some(dir) => ConfigManager::with_config_dir(dir.clone())?,
        None => ConfigManager::new()?,
    };
    let settings = config.load_settings().unwrap_or_else(|e| {
        log::warn!("Failed to load settings, using defaults: {e:#}");
        AppSettings::default()
    });

    let target = cli.connection.target(&config)?;
    let manager = ConnectionManager::new()?;
    let client = manager
        .connect(&target, settings.connect_timeout())
        .with_context(|| format!("Connection to {} failed", target.display_name()))?;

    if let Some(name) = &cli.connection.save_as {
        remember_connection(&config, name, &target)?;
    }

    match cli.command {
        Command::Databases => {
            for name in manager.list_databases(&client)? {
                println!("{name}");
            }
        }
        Command::Collections { database } => {
            for name in manager.list_collections(&client, &database)? {
                println!("{name}");
            }
        }
        Command::Stats { database, collection, sample, json } => {
            let source = manager.collection(&client, &database, &collection);
            let mut session = ExplorerSession::new(settings.items_per_page);
            session.select_database(&database);
            session.select_collection(&source, sample.unwrap_or(settings.sample_limit))?;
            if let Some(report) = session.visible_report() {
                if json {
                    println!("{}", serde_json::to_string_pretty(report)?);
                } else {
                    print_report(report);
                }
            }
        }
        Command::Browse { database, collection, page, per_page } => {
            let source = manager.collection(&client, &database, &collection);
            let mut pagination = Pagination::new(per_page.unwrap_or(settings.items_per_page));
            pagination.go_to(page, u64::MAX);
            let page = browse_page(&source, &pagination)?;
            if page.documents.is_empty() {
                println!("No documents found in this collection.");
            }
            for document in &page.documents {
                println!("{}", document_to_relaxed_extjson_string(document));
            }
            println!("Page {} of {}", page.page, page.total_pages);
        }
        Command::Search { database, collection, field, kind, value } => {
            let source = manager.collection(&client, &database, &collection);
            let results = search(&source, &field, kind, &value)?;
            if results.is_empty() {
                println!("No matching documents found.");
            } else {
                for document in &results {
                    println!("{}", document_to_relaxed_extjson_string(document));
                }
                println!(
                    "Found {} documents (showing max {SEARCH_RESULT_LIMIT})",
                    results.len()
                );
            }
        }
        Command::Analyze { database, collection, field } => {
            let source = manager.collection(&client, &database, &collection);
            let analysis = analyze_field_exact(&source, &field)?;
            println!("Field Coverage:       {:.1}%", analysis.coverage_pct);
            println!("Documents with Field: {}", analysis.presence_count);
            println!("Unique Values:        {}", analysis.distinct_count);
            println!("Sample Values:");
            for (i, value) in analysis.sample_values.iter().enumerate() {
                println!("  {}. {value}", i + 1);
            }
        }
        Command::Export {
            database,
            collection,
            fields,
            field,
            unique,
            custom,
            include_id,
            page,
            per_page,
            out,
            stdout,
        } => {
            let selection = if let Some(field) = field {
                if unique {
                    ExportSelection::SingleFieldUnique(field)
                } else {
                    ExportSelection::SingleFieldValues(field)
                }
            } else if !fields.is_empty() {
                ExportSelection::SelectedFields(fields)
            } else if !custom.is_empty() {
                ExportSelection::CustomFields { fields: custom, include_id }
            } else if let Some(page) = page {
                let mut pagination = Pagination::new(per_page.unwrap_or(settings.items_per_page));
                pagination.go_to(page, u64::MAX);
                ExportSelection::CurrentView(pagination)
            } else {
                ExportSelection::AllDocuments
            };

            let source = manager.collection(&client, &database, &collection);
            let payload = export_documents(&source, &selection)?;
            if stdout {
                println!("{}", payload.json);
            } else {
                let dir = out.unwrap_or_else(|| match settings.default_export_folder.as_str() {
                    "" => PathBuf::from("."),
                    folder => PathBuf::from(folder),
                });
                let path = payload.write_to(&dir)?;
                println!("Wrote {} documents to {}", payload.document_count, path.display());
            }
        }
    }

    Ok(())
}

fn remember_connection(config: &ConfigManager, name: &str, target: &ConnectionTarget) -> Result<()> {
    let mut connections = config.load_connections()?;
    connections.retain(|c| !c.name.eq_ignore_ascii_case(name));
    let mut saved = SavedConnection::new(name.to_string(), target.clone());
    saved.mark_connected();
    connections.push(saved);
    config.save_connections(&connections)?;
    log::info!("Saved connection '{name}'");
    Ok(())
}

fn print_report(report: &CollectionReport) {
    println!("Collection: {}", report.collection);
    println!("Documents:      {}", report.document_count);
    println!("Size:           {:.2} MB", report.size.size_mb);
    println!("Avg Doc Size:   {:.2} KB", report.size.avg_doc_size_kb);
    println!("Storage Size:   {:.2} MB", report.size.storage_size_mb);
    println!("Index Size:     {:.2} MB", report.size.index_size_mb);
    println!("Indexes:        {}", report.size.index_count);
    println!("Fields:         {}", report.field_count);
    println!("Sampled:        {}", report.sample_size);

    println!("\nField Coverage");
    for field in report.fields_by_coverage() {
        println!(
            "  {:<24} {:>6.1}%  {:>5} docs",
            field.name, field.coverage_pct, field.presence_count
        );
    }

    println!("\nData Types");
    for field in &report.fields {
        let primary = field.primary_type().map(|k| k.label()).unwrap_or("unknown");
        println!("  {:<24} {primary:<10} {}", field.name, field.types_summary());
    }

    let ranking = report.cardinality_ranking();
    if !ranking.is_empty() {
        println!("\nTop {CARDINALITY_ROWS} Fields by Cardinality");
        for (name, count) in ranking.iter().take(CARDINALITY_ROWS) {
            println!("  {name}: {count} distinct values");
        }
        if ranking.len() > CARDINALITY_ROWS {
            println!("\nBottom {CARDINALITY_ROWS} Fields by Cardinality");
            for (name, count) in &ranking[ranking.len() - CARDINALITY_ROWS..] {
                println!("  {name}: {count} distinct values");
            }
        }
    }

    println!("\nValue Distribution");
    for field in &report.fields {
        let Some(rows) = &field.value_frequencies else {
            continue;
        };
        println!("  {}", field.name);
        for row in rows {
            println!("    {:<30} {}", row.value, row.count);
        }
    }
}
