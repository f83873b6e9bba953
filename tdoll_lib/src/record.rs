//! The flat per-character record and its assembly from a wiki page.

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::class::WeaponClass;
use crate::error::ExtractError;
use crate::extract;

/// Column order shared by the CSV header and every saved record.
pub const FIELD_NAMES: [&str; 21] = [
    "id",
    "name",
    "wclass",
    "rarity",
    "hp",
    "ammo_cost",
    "ration_cost",
    "damage",
    "evasion",
    "accuracy",
    "rof",
    "move_speed",
    "crit_rate",
    "crit_damage",
    "armor_pen",
    "aura_tiles",
    "aura_targets",
    "aura_buffs",
    "armor",
    "mag_size",
    "aura_buff_vals",
];

/// Aura buff magnitudes, shaped by weapon class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuraBuffValues {
    /// Handguns: one list per buff, one value per dummy-link level.
    PerLevel(Vec<Vec<f64>>),
    /// Everyone else: one value per buff.
    Flat(Vec<f64>),
}

impl AuraBuffValues {
    pub fn is_empty(&self) -> bool {
        match self {
            AuraBuffValues::PerLevel(v) => v.is_empty(),
            AuraBuffValues::Flat(v) => v.is_empty(),
        }
    }
}

/// One scraped T-Doll. Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub wclass: WeaponClass,
    pub rarity: String,
    pub hp: [i64; 3],
    pub ammo_cost: Vec<i64>,
    pub ration_cost: Vec<i64>,
    pub damage: [i64; 2],
    pub evasion: [i64; 2],
    pub accuracy: [i64; 2],
    pub rof: [i64; 2],
    pub move_speed: i64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub armor_pen: i64,
    pub aura_tiles: Vec<Option<String>>,
    pub aura_targets: Vec<String>,
    pub aura_buffs: Vec<String>,
    /// Saved as `0` when the class has no armor.
    #[serde(with = "armor_or_zero")]
    pub armor: Option<[i64; 2]>,
    pub mag_size: Option<i64>,
    pub aura_buff_vals: AuraBuffValues,
}

mod armor_or_zero {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(armor: &Option<[i64; 2]>, s: S) -> Result<S::Ok, S::Error> {
        match armor {
            Some(range) => range.serialize(s),
            None => s.serialize_u8(0),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Range([i64; 2]),
        Zero(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<[i64; 2]>, D::Error> {
        Ok(match Repr::deserialize(d)? {
            Repr::Range(range) => Some(range),
            Repr::Zero(_) => None,
        })
    }
}

/// Name as stored in records and used in wiki paths: spaces become `_`.
pub fn wiki_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Wiki path of a character's page.
pub fn character_path(name: &str) -> String {
    format!("wiki/{}", wiki_name(name))
}

/// File name for a character's profile image; slashes are dropped.
pub fn profile_image_filename(record_name: &str) -> String {
    format!("{}_profile.png", record_name.replace('/', ""))
}

/// Reads every field of a character page, stopping at the first failure.
///
/// `name` is the name as listed on the index page. The weapon class is
/// read first among the fields that depend on it.
pub fn assemble(name: &str, doc: &Html) -> Result<CharacterRecord, ExtractError> {
    let id = extract::id(doc)?;
    let wclass = extract::weapon_class(doc)?;
    let rarity = extract::rarity(doc)?;
    let hp = extract::hp(doc)?;
    let ammo_cost = extract::ammo_cost(doc)?;
    let ration_cost = extract::ration_cost(doc)?;
    let damage = extract::damage(doc)?;
    let evasion = extract::evasion(doc)?;
    let accuracy = extract::accuracy(doc)?;
    let rof = extract::rate_of_fire(doc)?;
    let move_speed = extract::move_speed(doc)?;
    let crit_rate = extract::crit_rate(doc)?;
    let crit_damage = extract::crit_damage(doc)?;
    let armor_pen = extract::armor_pen(doc)?;
    let aura_tiles = extract::aura_tiles(doc)?;
    let aura_targets = extract::aura_targets(doc)?;
    let aura_buffs = extract::aura_buffs(doc)?;
    let armor = extract::armor(wclass, doc)?;
    let mag_size = extract::mag_size(wclass, doc)?;
    let aura_buff_vals = extract::aura_buff_values(wclass, doc)?;

    Ok(CharacterRecord {
        id,
        name: wiki_name(name),
        wclass,
        rarity,
        hp,
        ammo_cost,
        ration_cost,
        damage,
        evasion,
        accuracy,
        rof,
        move_speed,
        crit_rate,
        crit_damage,
        armor_pen,
        aura_tiles,
        aura_targets,
        aura_buffs,
        armor,
        mag_size,
        aura_buff_vals,
    })
}
