use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tdoll_lib::CharacterRecord;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct TDollRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    #[serde(rename = "Class")]
    class: String,
    #[tabled(rename = "Rarity")]
    #[serde(rename = "Rarity")]
    rarity: String,
    #[tabled(rename = "HP")]
    #[serde(rename = "HP")]
    hp: i64,
    #[tabled(rename = "Damage")]
    #[serde(rename = "Damage")]
    damage: String,
    #[tabled(rename = "RoF")]
    #[serde(rename = "RoF")]
    rof: String,
    #[tabled(rename = "Aura Targets")]
    #[serde(rename = "Aura Targets")]
    aura_targets: String,
}

fn build_rows(records: &[CharacterRecord]) -> Vec<TDollRow> {
    records
        .iter()
        .map(|r| TDollRow {
            id: r.id.clone(),
            name: r.name.clone(),
            class: r.wclass.to_string(),
            rarity: r.rarity.clone(),
            hp: r.hp[1],
            damage: format_range(r.damage),
            rof: format_range(r.rof),
            aura_targets: format_targets(&r.aura_targets),
        })
        .collect()
}

pub fn print_records_table(records: &[CharacterRecord]) {
    println!("{}", Table::new(build_rows(records)));
}

pub fn print_records_markdown(records: &[CharacterRecord]) {
    let mut table = Table::new(build_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_range([min, max]: [i64; 2]) -> String {
    format!("{}-{}", min, max)
}

/// Targets in first-seen order without repeats; "all" when every class is hit.
fn format_targets(targets: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for t in targets {
        if !seen.contains(&t.as_str()) {
            seen.push(t);
        }
    }
    if seen.len() == tdoll_lib::WeaponClass::ALL.len() {
        return "all".to_string();
    }
    seen.join(", ")
}
