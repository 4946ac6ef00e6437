#[macro_use]
extern crate tracing;

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use clap::Parser;
use formcraft::cli::{default_config_path, Cli, OutputFormat, Sub};
use formcraft::editor::Editor;
use formcraft::tree::ComponentKind;
use formcraft_config::Config;
use formcraft_ipc::Script;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "formcraft=info".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    match cli.subcommand {
        Sub::Replay {
            script,
            format,
            seed,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if seed.is_some() {
                config.ids.seed = seed;
            }

            let text = fs::read_to_string(&script)
                .with_context(|| format!("error reading {script:?}"))?;
            let script: Script = serde_json::from_str(&text).context("error parsing script")?;
            info!(
                "replaying {} action(s) on {} root node(s)",
                script.actions.len(),
                script.tree.len()
            );

            let editor = Editor::replay(config, script).context("error replaying script")?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&editor.snapshot())
                        .context("error serializing tree")?;
                    println!("{json}");
                }
                OutputFormat::Outline => print!("{}", editor.tree().outline()),
            }
        }
        Sub::Palette => {
            for kind in ComponentKind::ALL {
                let props = serde_json::to_string(kind.default_props().as_map())
                    .context("error serializing props")?;
                println!("{kind}: {props}");
            }
        }
        Sub::Validate => {
            let path = cli
                .config
                .or_else(default_config_path)
                .context("no config path given and no config directory found")?;
            Config::load(&path).map_err(|err| anyhow!("{err:?}"))?;
            info!("config is valid");
        }
    }

    Ok(())
}

/// An explicit path must load; a broken default config falls back to the defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load(path).map_err(|err| anyhow!("{err:?}"));
    }

    let Some(path) = default_config_path() else {
        debug!("no config directory, using the default config");
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!("{path:?} does not exist, using the default config");
        return Ok(Config::default());
    }

    match Config::load(&path) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!("{err:?}");
            warn!("using the default config");
            Ok(Config::default())
        }
    }
}
