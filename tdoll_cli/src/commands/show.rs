use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tdoll_lib::CharacterRecord;

use crate::output::{print_json, print_records_markdown, print_records_table, OutputFormat};

#[derive(Args)]
pub struct ShowArgs {
    /// JSON file written by `tdoll scrape`
    #[arg(long, default_value = "saves/tdoll_data.json")]
    pub input: PathBuf,

    /// Only show T-Dolls of this class (HG, SMG, AR, RF, MG, SG)
    #[arg(long)]
    pub class: Option<String>,
}

pub fn run(args: &ShowArgs, format: &OutputFormat) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let mut records: Vec<CharacterRecord> = serde_json::from_str(&text).with_context(|| {
        format!(
            "{} is not a finished scrape (closing bracket missing?)",
            args.input.display()
        )
    })?;

    if let Some(ref class) = args.class {
        let class: tdoll_lib::WeaponClass = class.to_uppercase().parse()?;
        records.retain(|r| r.wclass == class);
    }

    match format {
        OutputFormat::Table => print_records_table(&records),
        OutputFormat::Markdown => print_records_markdown(&records),
        OutputFormat::Json => print_json(&records),
    }

    Ok(())
}
