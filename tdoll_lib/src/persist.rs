//! Append-only JSON and CSV sinks for scraped records.
//!
//! Both writers truncate their file on `create` and reopen it in append
//! mode for every record, so a record is on disk as soon as it is written.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ScrapeError;
use crate::record::{AuraBuffValues, CharacterRecord, FIELD_NAMES};

fn ensure_parent(path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn open_append(path: &Path) -> Result<BufWriter<File>, ScrapeError> {
    let file = OpenOptions::new().append(true).open(path)?;
    Ok(BufWriter::new(file))
}

/// Streams records into a JSON array, one pretty-printed object at a time.
///
/// The opening bracket is written on `create` and the closing one on
/// `finish`; a run that stops in between leaves an unterminated array.
pub struct JsonArrayWriter {
    path: PathBuf,
    written: usize,
}

impl JsonArrayWriter {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let path = path.into();
        ensure_parent(&path)?;
        fs::write(&path, "[\n")?;
        Ok(Self { path, written: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append<T: Serialize>(&mut self, value: &T) -> Result<(), ScrapeError> {
        let mut out = open_append(&self.path)?;
        if self.written > 0 {
            out.write_all(b",\n")?;
        }
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser)?;
        out.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Closes the array. Returns the number of objects written.
    pub fn finish(self) -> Result<usize, ScrapeError> {
        let mut out = open_append(&self.path)?;
        out.write_all(b"\n]")?;
        out.flush()?;
        Ok(self.written)
    }
}

/// Appends one row per record under a fixed header.
pub struct CsvWriter {
    path: PathBuf,
}

fn csv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

impl CsvWriter {
    /// Truncates `path` and writes the header. The header ends with a
    /// trailing comma, as the files this tool has always produced do.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let path = path.into();
        ensure_parent(&path)?;
        let mut wtr = csv_writer(File::create(&path)?);
        wtr.write_record(FIELD_NAMES.iter().copied().chain(std::iter::once("")))?;
        wtr.flush()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &CharacterRecord) -> Result<(), ScrapeError> {
        let mut wtr = csv_writer(open_append(&self.path)?);
        wtr.write_record(csv_row(record))?;
        wtr.flush()?;
        Ok(())
    }
}

/// Renders a record as CSV cells in `FIELD_NAMES` order.
///
/// Lists use the bracketed form `[1, 2]`, strings inside lists are single
/// quoted, missing list items are `None`, and a missing scalar is empty.
pub fn csv_row(r: &CharacterRecord) -> Vec<String> {
    vec![
        r.id.clone(),
        r.name.clone(),
        r.wclass.to_string(),
        r.rarity.clone(),
        list(&r.hp, int),
        list(&r.ammo_cost, int),
        list(&r.ration_cost, int),
        list(&r.damage, int),
        list(&r.evasion, int),
        list(&r.accuracy, int),
        list(&r.rof, int),
        r.move_speed.to_string(),
        float(r.crit_rate),
        float(r.crit_damage),
        r.armor_pen.to_string(),
        list(&r.aura_tiles, |tile| match tile {
            Some(name) => quoted(name),
            None => "None".to_string(),
        }),
        list(&r.aura_targets, |s| quoted(s)),
        list(&r.aura_buffs, |s| quoted(s)),
        match &r.armor {
            Some(range) => list(range, int),
            None => "0".to_string(),
        },
        r.mag_size.map(|m| m.to_string()).unwrap_or_default(),
        match &r.aura_buff_vals {
            AuraBuffValues::PerLevel(levels) => list(levels, |level| list(level, |v| float(*v))),
            AuraBuffValues::Flat(values) => list(values, |v| float(*v)),
        },
    ]
}

fn list<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    let cells: Vec<String> = items.iter().map(render).collect();
    format!("[{}]", cells.join(", "))
}

fn int(v: &i64) -> String {
    v.to_string()
}

fn float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn quoted(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
