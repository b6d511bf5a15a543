//! Cross epoch evaluation state
use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    ambiguity::GroundTruth,
    evaluator::{EpochStatus, ResultRow},
    prelude::{Almanac, AmbiguityConvention, Duration, Epoch, EpochSource, GpsTime, Vector3, SV},
    report::Summary,
};

/// Running convergence status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Estimator did not fix the ambiguities
    #[default]
    NotConverged,
    /// Estimator fixed the true ambiguities
    ConvergedCorrect,
    /// Estimator fixed wrong ambiguities
    ConvergedIncorrect,
}

/// [Aggregator] owns the evaluation state of one run.
/// It is updated by each epoch evaluation and summarized at the end of the run.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    /// [GroundTruth]
    truth: GroundTruth,
    /// Complete [EpochSource], for geometry lookups
    source: &'a EpochSource,
    /// [Almanac]
    almanac: &'a Almanac,
    /// Latest [ConvergenceStatus]
    status: ConvergenceStatus,
    /// Recorded epochs
    total: usize,
    /// Epochs that contributed to an estimator update
    evaluated: usize,
    /// Epochs skipped due to lack of data
    skipped: usize,
    /// Converged epochs (correct or not)
    converged: usize,
    /// Correctly converged epochs
    correct: usize,
    /// Incorrectly converged epochs
    incorrect: usize,
    /// Converged -> not converged transitions
    deconvergences: usize,
    /// First converged epoch (correct or not). Written once.
    first_fix: Option<(usize, Epoch)>,
    /// First correctly converged epoch. Written once.
    first_convergence: Option<(usize, Epoch)>,
}

impl<'a> Aggregator<'a> {
    /// Builds new [Aggregator]
    /// ## Inputs
    /// - reference_ecef: base antenna position (ECEF, meters)
    /// - baseline: true baseline (ECEF, meters)
    /// - source: complete [EpochSource]
    /// - almanac: reference [Almanac]
    pub fn new(
        reference_ecef: Vector3<f64>,
        baseline: Vector3<f64>,
        source: &'a EpochSource,
        almanac: &'a Almanac,
    ) -> Self {
        Self {
            source,
            almanac,
            truth: GroundTruth::new(reference_ecef, baseline),
            status: Default::default(),
            total: 0,
            evaluated: 0,
            skipped: 0,
            converged: 0,
            correct: 0,
            incorrect: 0,
            deconvergences: 0,
            first_fix: None,
            first_convergence: None,
        }
    }

    /// True baseline vector
    pub fn baseline(&self) -> Vector3<f64> {
        self.truth.baseline
    }

    /// Reference position (ECEF, meters)
    pub fn reference_ecef(&self) -> Vector3<f64> {
        self.truth.reference_ecef
    }

    /// Reference [Almanac]
    pub fn almanac(&self) -> &'a Almanac {
        self.almanac
    }

    /// Evaluated [EpochSource]
    pub fn source(&self) -> &'a EpochSource {
        self.source
    }

    /// True ambiguities at this [Epoch], using the geometry of the [EpochSource].
    pub fn true_ambiguities(
        &self,
        epoch: Epoch,
        t: GpsTime,
        convention: &AmbiguityConvention,
    ) -> BTreeMap<SV, i64> {
        match self.source.get(epoch) {
            Some(data) => self.truth.ambiguities(data, t, self.almanac, convention),
            None => {
                warn!("{} - epoch does not exist in source", epoch);
                BTreeMap::new()
            },
        }
    }

    /// Records the evaluation of one epoch.
    pub fn record(&mut self, row: &ResultRow) {
        self.total += 1;

        match row.status {
            EpochStatus::Evaluated => self.evaluated += 1,
            EpochStatus::InsufficientData => self.skipped += 1,
        }

        let status = if row.converged_correctly {
            ConvergenceStatus::ConvergedCorrect
        } else if row.converged {
            ConvergenceStatus::ConvergedIncorrect
        } else {
            ConvergenceStatus::NotConverged
        };

        if row.converged {
            self.converged += 1;
            if self.first_fix.is_none() {
                info!("{} - first ambiguity fix", row.epoch);
                self.first_fix = Some((row.index, row.epoch));
            }
        }

        match status {
            ConvergenceStatus::ConvergedCorrect => {
                self.correct += 1;
                if self.first_convergence.is_none() {
                    info!("{} - converged to true ambiguities", row.epoch);
                    self.first_convergence = Some((row.index, row.epoch));
                }
            },
            ConvergenceStatus::ConvergedIncorrect => {
                self.incorrect += 1;
                warn!("{} - converged to wrong ambiguities", row.epoch);
            },
            ConvergenceStatus::NotConverged => {
                if self.status != ConvergenceStatus::NotConverged {
                    self.deconvergences += 1;
                    warn!("{} - estimator lost its fix", row.epoch);
                }
            },
        }

        self.status = status;
    }

    /// Latest [ConvergenceStatus]
    pub fn status(&self) -> ConvergenceStatus {
        self.status
    }

    /// True once the estimator converged to the true ambiguities.
    /// Remains true even if the estimator lost its fix later on.
    pub fn has_converged(&self) -> bool {
        self.first_convergence.is_some()
    }

    /// (index, [Epoch]) of first correct convergence
    pub fn first_convergence(&self) -> Option<(usize, Epoch)> {
        self.first_convergence
    }

    /// [Epoch] of first correct convergence
    pub fn first_convergence_epoch(&self) -> Option<Epoch> {
        self.first_convergence.map(|(_, t)| t)
    }

    /// (index, [Epoch]) of first fix, correct or not
    pub fn first_fix(&self) -> Option<(usize, Epoch)> {
        self.first_fix
    }

    /// Convergence time, from the initialization epoch
    pub fn time_to_convergence(&self) -> Option<Duration> {
        let t0 = self.source.first()?.epoch;
        let t = self.first_convergence_epoch()?;
        Some(t - t0)
    }

    /// Ratio of correctly converged epochs
    pub fn convergence_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// [Summary] of the run so far
    pub fn summary(&self) -> Summary {
        Summary {
            total_epochs: self.total,
            evaluated_epochs: self.evaluated,
            skipped_epochs: self.skipped,
            converged_epochs: self.converged,
            correct_epochs: self.correct,
            incorrect_epochs: self.incorrect,
            deconvergences: self.deconvergences,
            convergence_rate: self.convergence_rate(),
            first_fix: self.first_fix,
            first_convergence: self.first_convergence,
            time_to_convergence: self.time_to_convergence(),
        }
    }
}
