use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tydb_db::Database;
use tydb_item::Item;
use tydb_schema::Schema;
use tydb_server::{ServerConfig, TydbServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Query(args) => cmd_query(args, cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(schema) = args.schema {
        config.schema_path = schema;
    }

    let server = TydbServer::from_config(config).context("starting server")?;
    println!(
        "tydb server on {} (root: {})",
        server.config().bind_addr.to_string().bold(),
        root_type_of(&server)?.cyan()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn root_type_of(server: &TydbServer) -> anyhow::Result<String> {
    let db = server.database();
    let db = db
        .read()
        .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;
    Ok(db.root_type().to_string())
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let schema = load_schema(&args.schema)?;
    let db = Database::new(&schema)?;
    println!("{} {}", "✓".green().bold(), args.schema.display());
    println!("  root: {}", db.root_type().to_string().cyan());
    println!("  zero: {}", render(db.root(), format));
    Ok(())
}

fn cmd_query(args: QueryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let schema = load_schema(&args.schema)?;
    let mut db = Database::new(&schema)?;
    if let Some(path) = &args.data {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        db.set("", &value)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    let item = db.query_string(&args.selector)?;
    println!("{}", render(&item, format));
    Ok(())
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    Schema::load(path).with_context(|| format!("loading schema {}", path.display()))
}

fn render(item: &Item, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => item.to_string(),
        OutputFormat::Json => item.render_json(),
    }
}
