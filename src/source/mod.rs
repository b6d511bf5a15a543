//! Epoch source
use std::collections::BTreeMap;

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::ParsingError,
    prelude::{Epoch, SV},
};

mod loader;

/// Pair of observables sampled for one satellite.
/// Missing values are described as None (`null`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observables {
    /// Carrier phase, in cycles
    #[serde(default)]
    pub phase: Option<f64>,

    /// Pseudo range, in meters
    #[serde(default)]
    pub pseudo_range: Option<f64>,
}

impl Observables {
    /// Builds complete [Observables]
    pub fn new(phase: f64, pseudo_range: f64) -> Self {
        Self {
            phase: Some(phase),
            pseudo_range: Some(pseudo_range),
        }
    }

    /// Returns (phase, pseudo range) when both are present and finite.
    /// `NaN` is considered missing.
    pub fn usable(&self) -> Option<(f64, f64)> {
        let phase = self.phase.filter(|v| v.is_finite())?;
        let pseudo_range = self.pseudo_range.filter(|v| v.is_finite())?;
        Some((phase, pseudo_range))
    }

    /// True if both observables are present and finite.
    pub fn is_usable(&self) -> bool {
        self.usable().is_some()
    }
}

/// All [Observables] sampled at one [Epoch].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochData {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// Observations per [SV]
    pub observations: BTreeMap<SV, Observables>,
}

impl EpochData {
    /// Builds new [EpochData]
    pub fn new(epoch: Epoch, observations: BTreeMap<SV, Observables>) -> Self {
        Self {
            epoch,
            observations,
        }
    }

    /// Iterates the usable satellites only, as (sv, phase, pseudo range), in [SV] order.
    /// This is the one filter applied at initialization and during the evaluation.
    pub fn usable(&self) -> impl Iterator<Item = (SV, f64, f64)> + '_ {
        self.observations
            .iter()
            .filter_map(|(sv, obs)| obs.usable().map(|(phase, pr)| (*sv, phase, pr)))
    }

    /// Number of usable satellites
    pub fn num_usable(&self) -> usize {
        self.usable().count()
    }

    /// Total number of satellites, usable or not.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if nothing was observed at this [Epoch]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// [EpochSource] is the finite chronological sequence of [EpochData]
/// to run the evaluation on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochSource {
    epochs: Vec<EpochData>,
}

impl EpochSource {
    /// Builds [EpochSource] from possibly unsorted [EpochData].
    /// Epochs are sorted chronologically. Each [Epoch] must be unique.
    pub fn from_epochs(mut epochs: Vec<EpochData>) -> Result<Self, ParsingError> {
        let sorted = epochs
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.epoch <= b.epoch);

        if !sorted {
            warn!("epoch source is not in chronological order: sorting");
            epochs.sort_by(|a, b| a.epoch.cmp(&b.epoch));
        }

        if let Some((_, dup)) = epochs
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.epoch == b.epoch)
        {
            return Err(ParsingError::DuplicateEpoch(dup.epoch));
        }

        Ok(Self { epochs })
    }

    /// Number of [Epoch]s
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// True if this source is empty
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// First [EpochData], used for initialization.
    pub fn first(&self) -> Option<&EpochData> {
        self.epochs.first()
    }

    /// Iterates [EpochData] in chronological order.
    pub fn iter(&self) -> std::slice::Iter<'_, EpochData> {
        self.epochs.iter()
    }

    /// Random access to the [EpochData] sampled at this [Epoch].
    pub fn get(&self, epoch: Epoch) -> Option<&EpochData> {
        self.epochs
            .binary_search_by(|data| data.epoch.cmp(&epoch))
            .ok()
            .map(|index| &self.epochs[index])
    }
}

impl<'a> IntoIterator for &'a EpochSource {
    type Item = &'a EpochData;
    type IntoIter = std::slice::Iter<'a, EpochData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
