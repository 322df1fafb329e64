use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tydb", about = "Schema-typed document database", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve a database over HTTP
    Serve(ServeArgs),
    /// Validate a schema and show its root type
    Check(CheckArgs),
    /// Evaluate a selector against a database built from a schema
    Query(QueryArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Server configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to listen on, overriding the configuration
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Schema document, overriding the configuration
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(short, long)]
    pub schema: PathBuf,
}

#[derive(Args)]
pub struct QueryArgs {
    #[arg(short, long)]
    pub schema: PathBuf,
    /// JSON document assigned to the root before querying
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Selector to evaluate; empty selects the root
    #[arg(default_value = "")]
    pub selector: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["tydb", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.bind.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "tydb", "serve", "--bind", "0.0.0.0:9000", "--schema", "s.toml",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:9000".parse().unwrap()));
            assert_eq!(args.schema, Some("s.toml".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_bad_bind_address() {
        assert!(Cli::try_parse_from(["tydb", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_check_requires_schema() {
        assert!(Cli::try_parse_from(["tydb", "check"]).is_err());
        let cli = Cli::try_parse_from(["tydb", "check", "-s", "schema.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn parse_query() {
        let cli = Cli::try_parse_from([
            "tydb", "query", "-s", "schema.toml", "--data", "d.json", "--format", "text",
            "users[age >= 18]",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        if let Command::Query(args) = cli.command {
            assert_eq!(args.selector, "users[age >= 18]");
            assert_eq!(args.data, Some("d.json".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_query_without_selector() {
        let cli = Cli::try_parse_from(["tydb", "-v", "query", "-s", "schema.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Query(args) = cli.command {
            assert_eq!(args.selector, "");
        } else {
            panic!("wrong command");
        }
    }
}
