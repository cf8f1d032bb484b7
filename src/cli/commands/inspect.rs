//! Inspect command implementation
//!
//! Prints the reverse map built from an anonymization map, in the order the
//! engine tries its entries. Real values are shown only as fingerprints.

use super::read_map_file;
use crate::config::load_config_or_default;
use crate::deanonymization::audit::fingerprint;
use crate::deanonymization::{BoundaryRule, EntityType, MapEntry, ReverseMap};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// JSON file mapping fake values to real values
    #[arg(short, long)]
    pub map: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One reverse-map entry as shown to the user
#[derive(Debug, Serialize)]
struct InspectRow<'a> {
    fake_value: &'a str,
    entity_type: EntityType,
    boundary_rule: BoundaryRule,
    variant: bool,
    length: usize,
    real_fingerprint: String,
}

impl<'a> From<&'a MapEntry> for InspectRow<'a> {
    fn from(entry: &'a MapEntry) -> Self {
        Self {
            fake_value: entry.fake_value(),
            entity_type: entry.entry().entity_type(),
            boundary_rule: entry.rule(),
            variant: entry.entry().is_variant(),
            length: entry.char_len(),
            real_fingerprint: fingerprint(entry.real_value()),
        }
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(map = %self.map.display(), "Inspecting anonymization map");

        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let map = match read_map_file(&self.map) {
            Ok(map) => map,
            Err(e) => {
                println!("❌ Anonymization map unavailable: {e}");
                return Ok(3); // Map unavailable exit code
            }
        };

        let reverse_map = ReverseMap::from_map(&map, &config.stream);
        let rows: Vec<InspectRow> = reverse_map.entries().iter().map(InspectRow::from).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(0);
        }

        println!("🔍 Reverse map: {}", self.map.display());
        println!(
            "   {} original entries, {} with variants, longest placeholder {} chars",
            map.len(),
            reverse_map.len(),
            reverse_map.max_fake_chars()
        );
        println!();
        println!("{}", render_table(&rows));
        Ok(0)
    }
}

fn render_table(rows: &[InspectRow]) -> String {
    let mut table = format!(
        "{:<8} {:<8} {:<7} {:>4}  {:<12}  {}\n",
        "TYPE", "RULE", "VARIANT", "LEN", "REAL", "FAKE"
    );
    for row in rows {
        table.push_str(&format!(
            "{:<8} {:<8} {:<7} {:>4}  {:<12}  {}\n",
            row.entity_type.label(),
            row.boundary_rule.label(),
            if row.variant { "yes" } else { "no" },
            row.length,
            row.real_fingerprint,
            row.fake_value
        ));
    }
    table
}
