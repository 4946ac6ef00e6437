use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/formcraft/config.kdl`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand, Debug)]
pub enum Sub {
    /// Replay a script of editor actions and print the resulting tree.
    Replay {
        /// JSON file with a starting tree and a list of actions.
        script: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Seed for node ids, overriding the config.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the palette with the default properties of each component.
    Palette,
    /// Validate the config file.
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tree snapshot as JSON.
    #[default]
    Json,
    /// Indented outline, one node per line.
    Outline,
}

/// `config.kdl` in the per-user config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "formcraft")?;
    Some(dirs.config_dir().join("config.kdl"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_replay() {
        let cli = Cli::try_parse_from([
            "formcraft",
            "--config",
            "custom.kdl",
            "replay",
            "script.json",
            "--format",
            "outline",
            "--seed",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.kdl")));
        let Sub::Replay {
            script,
            format,
            seed,
        } = cli.subcommand
        else {
            panic!("expected replay");
        };
        assert_eq!(script, PathBuf::from("script.json"));
        assert_eq!(format, OutputFormat::Outline);
        assert_eq!(seed, Some(7));
    }

    #[test]
    fn replay_defaults_to_json() {
        let cli = Cli::try_parse_from(["formcraft", "replay", "script.json"]).unwrap();
        assert!(matches!(
            cli.subcommand,
            Sub::Replay {
                format: OutputFormat::Json,
                seed: None,
                ..
            }
        ));
    }
}
