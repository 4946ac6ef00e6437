//! Configuration for the formcraft editor core.
//!
//! The config file is KDL, decoded with knuffel. Every section is optional and falls back to
//! the behavior of the stock editor.

#[macro_use]
extern crate tracing;

use std::path::Path;

use miette::{Context, IntoDiagnostic};

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub ids: Ids,
    #[knuffel(child, default)]
    pub drop: DropBehavior,
    #[knuffel(child, default)]
    pub grid: Grid,
    #[knuffel(child, default)]
    pub selection: Selection,
}

/// How node ids are generated.
#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Ids {
    #[knuffel(child, unwrap(argument), default = Self::default().prefix)]
    pub prefix: String,
    /// Fixed seed for the id generator, for reproducible runs.
    #[knuffel(child, unwrap(argument))]
    pub seed: Option<u64>,
}

impl Default for Ids {
    fn default() -> Self {
        Self {
            prefix: String::from("node"),
            seed: None,
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq, Eq)]
pub struct DropBehavior {
    #[knuffel(child, unwrap(argument), default)]
    pub palette_insert: PaletteInsert,
}

/// Where a palette item lands relative to the leaf it is dropped on.
#[derive(knuffel::DecodeScalar, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteInsert {
    After,
    Before,
}

impl Default for PaletteInsert {
    fn default() -> Self {
        Self::After
    }
}

/// Limits for the container grid settings exposed in the properties panel.
#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    #[knuffel(child, unwrap(argument), default = Self::default().max_columns)]
    pub max_columns: u32,
    #[knuffel(child, unwrap(argument), default = Self::default().max_gap)]
    pub max_gap: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            max_columns: 4,
            max_gap: 64,
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Keep the selection pointing at a node whose ancestor was removed.
    #[knuffel(child)]
    pub keep_stale_descendant: bool,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        knuffel::parse(filename, text)
    }
}
