mod agent_mode;

use std::path::{Path, PathBuf};

use clap::Parser;

use entitlement::{EngineParams, StandardsTables};

/// Headless development-scenario agent speaking JSON lines on stdin/stdout.
///
/// Built-in zone tables and statutory parameters apply when no file is given.
#[derive(Parser, Debug)]
#[command(name = "entitlement-agent", version)]
struct Cli {
    /// Zone standards table (JSON) replacing the built-in one
    #[arg(long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Engine parameters (JSON) replacing the built-in defaults
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,
}

fn read_json(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn load_config(cli: &Cli) -> Result<(StandardsTables, EngineParams), String> {
    let tables = match &cli.tables {
        Some(path) => StandardsTables::from_json_str(&read_json(path)?)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => StandardsTables::default(),
    };
    let params = match &cli.params {
        Some(path) => EngineParams::from_json_str(&read_json(path)?)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => EngineParams::default(),
    };
    Ok((tables, params))
}

fn main() {
    let cli = Cli::parse();
    match load_config(&cli) {
        Ok((tables, params)) => agent_mode::run_agent_mode(tables, params),
        Err(e) => {
            eprintln!("entitlement-agent: {e}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_are_optional() {
        let cli = Cli::try_parse_from(["entitlement-agent"]).expect("no flags");
        assert!(cli.tables.is_none());
        assert!(cli.params.is_none());
    }

    #[test]
    fn test_cli_reads_both_paths() {
        let cli = Cli::try_parse_from([
            "entitlement-agent",
            "--tables",
            "zones.json",
            "--params",
            "params.json",
        ])
        .expect("both flags");
        assert_eq!(cli.tables, Some(PathBuf::from("zones.json")));
        assert_eq!(cli.params, Some(PathBuf::from("params.json")));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["entitlement-agent", "--zones", "x"]).is_err());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let cli = Cli {
            tables: Some(PathBuf::from("/nonexistent/zones.json")),
            params: None,
        };
        let err = load_config(&cli).expect_err("missing file");
        assert!(err.contains("cannot read"));
    }
}
