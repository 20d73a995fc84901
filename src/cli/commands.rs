//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lakehouse REST SDK command-line client
#[derive(Parser, Debug)]
#[command(name = "lakehouse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SDK configuration file (YAML). Without it, LAKEHOUSE_* variables are used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered list operations
    Operations,

    /// Page through a list operation and print every item
    List {
        /// Operation name (see `operations`)
        operation: String,

        /// Query filter, repeatable (key=value)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Path parameter, repeatable (key=value)
        #[arg(long = "path-param", value_parser = parse_key_val)]
        path_params: Vec<(String, String)>,

        /// Page-size hint sent with every request
        #[arg(short, long)]
        limit: Option<u32>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document per line
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` argument
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("status=running", "status", "running" ; "simple")]
    #[test_case("q=a=b", "q", "a=b" ; "value keeps later equals")]
    #[test_case("empty=", "empty", "" ; "empty value")]
    fn test_parse_key_val(input: &str, key: &str, value: &str) {
        assert_eq!(
            parse_key_val(input).unwrap(),
            (key.to_string(), value.to_string())
        );
    }

    #[test_case("novalue" ; "no separator")]
    #[test_case("=x" ; "empty key")]
    fn test_parse_key_val_rejects(input: &str) {
        assert!(parse_key_val(input).is_err());
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "lakehouse",
            "--config",
            "sdk.yaml",
            "list",
            "list_spark_engine_applications",
            "--path-param",
            "engine_id=spark-1",
            "-p",
            "state=running",
            "--limit",
            "50",
            "--max-pages",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("sdk.yaml")));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::List {
                operation,
                params,
                path_params,
                limit,
                max_pages,
            } => {
                assert_eq!(operation, "list_spark_engine_applications");
                assert_eq!(params, vec![("state".to_string(), "running".to_string())]);
                assert_eq!(
                    path_params,
                    vec![("engine_id".to_string(), "spark-1".to_string())]
                );
                assert_eq!(limit, Some(50));
                assert_eq!(max_pages, Some(2));
            }
            Commands::Operations => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_operations_pretty() {
        let cli = Cli::try_parse_from(["lakehouse", "operations", "--format", "pretty", "-v"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Operations));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }
}
