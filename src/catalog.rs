//! Star and location records in the comma-separated catalog format.
//!
//! ```text
//! # comment
//! name,deg_a,deg_b                 decimal degrees
//! name,a1,a2,a3,b1,b2,b3           sexagesimal triples
//! ```
//!
//! For stars `a` is right ascension (hours when sexagesimal) and `b`
//! declination; for locations `a` is latitude and `b` longitude. Fields follow
//! CSV quoting, so a name may contain commas when wrapped in double quotes.

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::angle::{Angle, Hemisphere};
use crate::coords::{Location, StarCoord};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    pub name: String,
    pub value: T,
}

/// Named records in file order. Re-inserting a name replaces the value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Record + Clone> Catalog<T> {
    /// Subset in the order `names` lists them; unknown names are ignored.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Catalog<T>> {
        let mut selected = Catalog::new();
        for name in names {
            let name = name.as_ref();
            match self.get(name) {
                Some(value) => selected.insert(name, value.clone()),
                None => debug!("[select] unknown {} '{}'", T::KIND, name),
            }
        }
        if selected.is_empty() {
            return Err(Error::NoSelection { kind: T::KIND });
        }
        Ok(selected)
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How a record type is built from the two catalog encodings.
pub trait Record: Sized {
    const KIND: &'static str;

    fn from_degrees(a: f64, b: f64) -> Self;
    fn from_sexagesimal(fields: [f64; 6]) -> Result<Self>;
}

impl Record for StarCoord {
    const KIND: &'static str = "stars";

    fn from_degrees(ra: f64, dec: f64) -> Self {
        StarCoord::new(Angle::from_degrees(ra), Angle::from_degrees(dec))
    }

    fn from_sexagesimal([h, m, s, d, dm, ds]: [f64; 6]) -> Result<Self> {
        Ok(StarCoord::new(
            Angle::from_hms(h, m, s)?,
            Angle::from_latlon(d, dm, ds, Hemisphere::N)?,
        ))
    }
}

impl Record for Location {
    const KIND: &'static str = "locations";

    fn from_degrees(lat: f64, lon: f64) -> Self {
        Location::from_degrees(lat, lon)
    }

    fn from_sexagesimal([d, m, s, ld, lm, ls]: [f64; 6]) -> Result<Self> {
        Ok(Location::new(
            Angle::from_latlon(d, m, s, Hemisphere::N)?,
            Angle::from_latlon(ld, lm, ls, Hemisphere::E)?,
        ))
    }
}

pub fn parse<T: Record>(text: &str) -> Result<Catalog<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut catalog = Catalog::new();

    for result in reader.records() {
        let record = result.map_err(|e| Error::Catalog {
            line: e.position().map_or(0, |p| record_line(text, p)),
            message: e.to_string(),
        })?;
        let name = record.get(0).unwrap_or_default();
        if name.starts_with('#') || record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map_or(0, |p| record_line(text, p));
        let catalog_error = |message: String| Error::Catalog { line, message };
        let numbers = record
            .iter()
            .skip(1)
            .map(|f| {
                f.parse::<f64>()
                    .map_err(|_| catalog_error(format!("invalid number '{f}'")))
            })
            .collect::<Result<Vec<f64>>>();

        let value = match record.len() {
            3 => {
                let n = numbers?;
                T::from_degrees(n[0], n[1])
            }
            7 => {
                let n = numbers?;
                let triples = [n[0], n[1], n[2], n[3], n[4], n[5]];
                T::from_sexagesimal(triples).map_err(|e| catalog_error(e.to_string()))?
            }
            count => {
                warn!("[parse] skipping {} line {}: {} fields", T::KIND, line, count);
                continue;
            }
        };
        catalog.insert(name, value);
    }

    debug!("[parse] loaded {} {}", catalog.len(), T::KIND);
    Ok(catalog)
}

pub fn parse_stars(text: &str) -> Result<Catalog<StarCoord>> {
    parse(text)
}

pub fn parse_locations(text: &str) -> Result<Catalog<Location>> {
    parse(text)
}

pub fn load_file<T: Record>(path: impl AsRef<Path>) -> Result<Catalog<T>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse(&text)
}

/// 1-based line of a record. The reader reports the position where it
/// started looking, which sits before any blank lines it skipped.
fn record_line(text: &str, position: &csv::Position) -> usize {
    let skipped = text
        .as_bytes()
        .get(position.byte() as usize..)
        .map_or(0, |rest| {
            rest.iter()
                .take_while(|&&b| b == b'\n' || b == b'\r')
                .filter(|&&b| b == b'\n')
                .count()
        });
    position.line() as usize + skipped
}
