use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};
use tokio::io::AsyncReadExt;

use viewdef::models::enums::DatabaseType;
use viewdef::{ReaderConfig, SqlParserFrontend, ViewDefinition, catalog, convert_view, read_view};

#[derive(Parser)]
#[command(name = "viewdef", version, about = "Reconstruct the structure of database views")]
struct Cli {
    /// Connection URL (overrides VIEWDEF_DATABASE_URL / DATABASE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Database type: mysql, postgresql or sqlite
    #[arg(long = "type", global = true)]
    database_type: Option<DatabaseType>,

    /// Schema or database holding the views
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Print the reconstructed model as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconstruct one view from the catalog
    Show { view: String },
    /// List views matching a LIKE pattern
    List {
        #[arg(default_value = "%")]
        pattern: String,
    },
    /// Check whether a table exists
    Exists { table: String },
    /// Reconstruct a definition read from a file (or stdin) without connecting
    Parse { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = ReaderConfig::load()?;
    if let Some(url) = cli.url.clone() {
        if cli.database_type.is_none()
            && let Some(kind) = viewdef::config::database_type_from_url(&url)
        {
            config.database_type = kind;
        }
        config.database_url = Some(url);
    }
    if let Some(kind) = cli.database_type {
        config.database_type = kind;
    }
    if let Some(schema) = cli.schema.clone() {
        config.schema = Some(schema);
    }
    viewdef::init_logging(config.log_filter.as_deref());

    if let Err(e) = run(&cli, &config).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: &Cli, config: &ReaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let parser = SqlParserFrontend::new(config.database_type);
    let schema = config.schema.clone().unwrap_or_default();

    match &cli.command {
        Command::Parse { file } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };
            let name = file
                .as_ref()
                .and_then(|p| p.file_stem())
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "stdin".to_string());
            let view = convert_view(&name, &raw, &parser)?;
            print_view(&view, cli.json)?;
        }
        Command::Show { view } => {
            let catalog = catalog::connect(config).await?;
            let view = read_view(catalog.as_ref(), &parser, &schema, view).await?;
            print_view(&view, cli.json)?;
        }
        Command::List { pattern } => {
            let catalog = catalog::connect(config).await?;
            let names = catalog.view_names(&schema, pattern).await?;
            info!("{} views match {}", names.len(), pattern);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Command::Exists { table } => {
            let catalog = catalog::connect(config).await?;
            let exists = catalog.table_exists(&schema, table).await?;
            println!("{}", exists);
        }
    }
    Ok(())
}

fn print_view(view: &ViewDefinition, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    let query = &view.query;
    println!("view: {}", view.name);
    for column in &query.select {
        if column.alias.is_empty() {
            println!("  select {}", column.expression);
        } else {
            println!("  select {} as {}", column.expression, column.alias);
        }
    }
    if let Some(from) = &query.from {
        println!("  from   {} {}", from.source, from.alias);
    }
    for join in &query.joins {
        println!("  {} {} {} on {}", join.join_type, join.source, join.alias, join.condition);
    }
    if let Some(condition) = &query.where_condition {
        println!("  where  {}", condition);
    }
    println!("{}", view.create_sql());
    Ok(())
}
