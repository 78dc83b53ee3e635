//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Reads titles or JSON catalog records from stdin, one per line, and writes
/// flat product records to stdout as JSON lines.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "phone-specs")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "PHONE_SPECS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_config_forms() {
        let expected = Some(PathBuf::from("specs.toml"));
        for args in [
            vec!["phone-specs", "--config", "specs.toml"],
            vec!["phone-specs", "-c", "specs.toml"],
            vec!["phone-specs", "--config=specs.toml"],
        ] {
            assert_eq!(CliArgs::try_parse_from(args).unwrap().config, expected);
        }
    }

    #[test]
    fn test_config_falls_back_to_environment() {
        let command = CliArgs::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env().and_then(|env| env.to_str()), Some("PHONE_SPECS_CONFIG"));
    }

    #[test]
    fn test_rejects_unknown_and_incomplete_arguments() {
        assert!(CliArgs::try_parse_from(["phone-specs", "--config"]).is_err());
        assert!(CliArgs::try_parse_from(["phone-specs", "--verbose"]).is_err());
    }
}
