use clap::Parser;
use serde_json::Value;

use crate::domain::model::{Item, Parameters};
use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::parse_json_field;

#[derive(Debug, Clone, Parser)]
#[command(name = "jdy")]
#[command(about = "Run Jiandaoyun connector operations from the command line")]
pub struct CliConfig {
    /// Path to the TOML connection profile
    #[arg(short, long, default_value = "jdy-config.toml")]
    pub config: String,

    /// Resource to operate on: app, entry, data, file or workflow
    #[arg(long)]
    pub resource: String,

    /// Operation to perform, e.g. getManyDataRecords
    #[arg(long)]
    pub operation: String,

    /// Operation parameters as inline JSON, or @path/to/params.json
    #[arg(long, default_value = "{}")]
    pub params: String,

    /// Path to a JSON array of input items; defaults to a single empty item
    #[arg(long)]
    pub items: Option<String>,

    /// Emit per-item errors instead of aborting the batch
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Print the dispatched endpoint and body without calling the API
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn load_params(&self) -> Result<Parameters> {
        let raw = match self.params.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)?,
            None => self.params.clone(),
        };
        Parameters::from_value(parse_json_field("params", &raw)?)
    }

    /// Input items are either full host items (`{"json": ..., "binary": ...}`)
    /// or bare JSON payloads that get wrapped.
    pub fn load_items(&self) -> Result<Vec<Item>> {
        let path = match &self.items {
            Some(path) => path,
            None => return Ok(vec![Item::default()]),
        };
        let raw = std::fs::read_to_string(path)?;
        let values = match parse_json_field("items", &raw)? {
            Value::Array(values) => values,
            _ => {
                return Err(ConnectorError::validation("items", "must be a JSON array"));
            }
        };
        values
            .into_iter()
            .map(|value| match &value {
                Value::Object(map) if map.contains_key("json") => {
                    serde_json::from_value(value).map_err(ConnectorError::from)
                }
                _ => Ok(Item::new(value)),
            })
            .collect()
    }
}
