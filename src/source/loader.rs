use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use flate2::read::GzDecoder;
use log::{debug, info};
use serde::Deserialize;

use crate::{
    error::{Error, ParsingError},
    prelude::{Epoch, EpochData, EpochSource, Observables, SV},
};

/// Epoch description, as found in the JSON document
#[derive(Deserialize)]
struct RawEpoch {
    epoch: String,
    observations: BTreeMap<String, Observables>,
}

impl RawEpoch {
    fn parse(self) -> Result<EpochData, ParsingError> {
        let epoch = Epoch::from_str(self.epoch.trim())
            .map_err(|_| ParsingError::InvalidEpoch(self.epoch.clone()))?;

        let mut observations = BTreeMap::new();

        for (sv, obs) in self.observations {
            let parsed =
                SV::from_str(sv.trim()).map_err(|_| ParsingError::InvalidSatellite(sv.clone()))?;
            observations.insert(parsed, obs);
        }

        Ok(EpochData::new(epoch, observations))
    }
}

impl EpochSource {
    /// Loads dataset `key` from JSON file. `.gz` files are decompressed on the fly.
    /// The document maps data keys to a list of epochs:
    /// `{ "sd": [ { "epoch": "2020-06-25T00:00:00 GPST", "observations": { "G01": { "phase": 1.0, "pseudo_range": 2.0 } } } ] }`
    pub fn from_file<P: AsRef<Path>>(path: P, key: &str) -> Result<Self, Error> {
        let path = path.as_ref();
        let fd = File::open(path)?;

        let mut content = String::new();

        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if gzip {
            GzDecoder::new(fd).read_to_string(&mut content)?;
        } else {
            BufReader::new(fd).read_to_string(&mut content)?;
        }

        let source = Self::from_json_str(&content, key)?;

        info!(
            "{}[{}]: loaded {} epochs",
            path.display(),
            key,
            source.len()
        );

        Ok(source)
    }

    /// Parses dataset `key` from JSON content.
    pub fn from_json_str(content: &str, key: &str) -> Result<Self, Error> {
        let mut document: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;

        let dataset = document
            .remove(key)
            .ok_or_else(|| ParsingError::UnknownDataKey(key.to_string()))?;

        let raw: Vec<RawEpoch> = serde_json::from_value(dataset)?;

        let epochs = raw
            .into_iter()
            .map(RawEpoch::parse)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("[{}]: {} epochs parsed", key, epochs.len());

        Ok(Self::from_epochs(epochs)?)
    }
}
