//! Reference almanac
use std::{collections::BTreeMap, fs::read_to_string, path::Path};

use log::debug;

use crate::{
    error::Error,
    prelude::{Constellation, SV},
};

mod kepler;
mod yuma;

/// Orbital parameters of one satellite, as broadcast in GPS almanacs.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AlmanacEntry {
    /// PRN number
    pub prn: u8,

    /// Health word (0 = healthy)
    pub health: u8,

    /// Eccentricity
    pub eccentricity: f64,

    /// Time of applicability, in seconds of week
    pub toa_s: f64,

    /// Orbital inclination (in radians)
    pub inclination_rad: f64,

    /// Rate of right ascension (in radians/s)
    pub omega_dot_rad_s: f64,

    /// Square root of semi-major axis (in m^1/2)
    pub sqrt_a: f64,

    /// Right ascension at week (in radians)
    pub omega0_rad: f64,

    /// Argument of perigee (in radians)
    pub omega_rad: f64,

    /// Mean anomaly (in radians)
    pub m0_rad: f64,

    /// Clock bias (in seconds)
    pub af0_s: f64,

    /// Clock drift (in s/s)
    pub af1_s_s: f64,

    /// Week counter of the time of applicability.
    /// Usually truncated to the 1024 week rollover.
    pub week: u32,
}

impl AlmanacEntry {
    /// True if this satellite is declared healthy
    pub fn is_healthy(&self) -> bool {
        self.health == 0
    }
}

/// [Almanac] is the collection of [AlmanacEntry], indexed by PRN number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Almanac {
    entries: BTreeMap<u8, AlmanacEntry>,
}

impl Almanac {
    /// Loads [Almanac] from YUMA file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = read_to_string(path)?;
        let almanac: Self = content.parse()?;
        debug!(
            "{}: loaded {} almanac entries",
            path.display(),
            almanac.len()
        );
        Ok(almanac)
    }

    /// Builds [Almanac] from a list of entries. Latest entry wins on duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = AlmanacEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|entry| (entry.prn, entry)).collect(),
        }
    }

    /// Number of satellites described
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no satellite is described
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// [AlmanacEntry] for this PRN number
    pub fn get(&self, prn: u8) -> Option<&AlmanacEntry> {
        self.entries.get(&prn)
    }

    /// [AlmanacEntry] for this [SV], using its numeric index.
    /// Only GPS satellites are described.
    pub fn get_sv(&self, sv: SV) -> Option<&AlmanacEntry> {
        if sv.constellation != Constellation::GPS {
            return None;
        }
        self.get(sv.prn)
    }

    /// Iterates all [AlmanacEntry] in PRN order
    pub fn iter(&self) -> impl Iterator<Item = &AlmanacEntry> + '_ {
        self.entries.values()
    }
}
