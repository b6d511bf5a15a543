//! Per epoch evaluation
use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    aggregator::Aggregator,
    error::{Error, EstimatorError},
    observation::ObservationMatrix,
    prelude::{Epoch, EpochData, Estimator, GpsTime, Vector3, SV},
};

/// How an epoch was processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochStatus {
    /// Estimator was updated with this epoch
    #[default]
    Evaluated,
    /// Not enough usable satellites: no estimator update
    InsufficientData,
}

/// [ResultRow] is the outcome of one epoch evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Sampling [Epoch], unique row key
    pub epoch: Epoch,
    /// Position in the evaluated sequence (first epoch excluded)
    pub index: usize,
    /// [EpochStatus]
    pub status: EpochStatus,
    /// Number of usable satellites. Forwarded to the estimator when [EpochStatus::Evaluated],
    /// not enough to be forwarded when [EpochStatus::InsufficientData].
    pub satellites: usize,
    /// Estimated baseline (ECEF, meters)
    pub baseline: Option<Vector3<f64>>,
    /// Distance between estimated and true baseline, in meters
    pub baseline_error_m: Option<f64>,
    /// Estimated integer ambiguities
    pub ambiguities: BTreeMap<SV, i64>,
    /// True integer ambiguities
    pub true_ambiguities: BTreeMap<SV, i64>,
    /// Estimator reported a fixed ambiguity state
    pub converged: bool,
    /// Converged and all shared ambiguities match the truth
    pub converged_correctly: bool,
}

impl ResultRow {
    /// Non converged [ResultRow], for an epoch that could not be processed.
    /// `satellites` is the number of usable satellites found.
    pub fn insufficient_data(epoch: Epoch, index: usize, satellites: usize) -> Self {
        Self {
            epoch,
            index,
            satellites,
            status: EpochStatus::InsufficientData,
            baseline: None,
            baseline_error_m: None,
            ambiguities: Default::default(),
            true_ambiguities: Default::default(),
            converged: false,
            converged_correctly: false,
        }
    }
}

/// True when both sets share at least one satellite
/// and every shared ambiguity is identical.
pub(crate) fn ambiguities_match(
    estimated: &BTreeMap<SV, i64>,
    truth: &BTreeMap<SV, i64>,
) -> bool {
    let mut shared = 0;
    for (sv, n) in estimated.iter() {
        if let Some(n_true) = truth.get(sv) {
            if n != n_true {
                return false;
            }
            shared += 1;
        }
    }
    shared > 0
}

/// Selects the observations to forward to the estimator:
/// usable satellites that exist in the almanac.
fn estimator_input(
    data: &EpochData,
    aggregator: &Aggregator,
    required: usize,
) -> Result<ObservationMatrix, Error> {
    let almanac = aggregator.almanac();

    let observations = ObservationMatrix::from_epoch(data, |sv| {
        if almanac.get_sv(*sv).is_some() {
            true
        } else {
            let e = Error::UnknownSatellite(data.epoch, *sv);
            warn!("{}: excluded", e);
            false
        }
    });

    if observations.len() < required {
        return Err(Error::InsufficientData {
            epoch: data.epoch,
            found: observations.len(),
            required,
        });
    }

    Ok(observations)
}

/// Evaluates one epoch: updates the [Estimator], compares its state
/// to the truth, and records the outcome in the [Aggregator].
/// Must be called in chronological order, starting from the second epoch.
/// ## Inputs
/// - estimator: initialized [Estimator]
/// - data: [EpochData] to process
/// - index: position in the evaluated sequence
/// - aggregator: [Aggregator] of this run
/// ## Returns
/// - [ResultRow] on success. Lack of usable data is not an error
///   and results in a non converged row.
/// - [Error::Estimator] when the estimator rejects the update or ends up in an invalid state.
/// - [Error::InvalidTime] when the epoch cannot be expressed in GPS time.
pub fn evaluate<E: Estimator>(
    estimator: &mut E,
    data: &EpochData,
    index: usize,
    aggregator: &mut Aggregator,
) -> Result<ResultRow, Error> {
    let epoch = data.epoch;
    let t = GpsTime::from_epoch(epoch)?;

    let observations = match estimator_input(data, aggregator, estimator.min_satellites()) {
        Ok(observations) => observations,
        Err(Error::InsufficientData { found, .. }) => {
            warn!(
                "{} - insufficient data: {} usable satellite(s) out of {}",
                epoch,
                found,
                data.len()
            );
            let row = ResultRow::insufficient_data(epoch, index, found);
            aggregator.record(&row);
            return Ok(row);
        },
        Err(e) => return Err(e),
    };

    estimator
        .update(t, &observations)
        .map_err(|source| Error::Estimator { epoch, source })?;

    let baseline = estimator.baseline();

    if let Some(baseline) = baseline {
        if baseline.iter().any(|v| !v.is_finite()) {
            return Err(Error::Estimator {
                epoch,
                source: EstimatorError::InvalidState(format!("baseline {}", baseline.transpose())),
            });
        }
    }

    let ambiguities = estimator.ambiguities();
    let converged = estimator.is_converged();
    let convention = estimator.convention();

    let true_ambiguities = aggregator.true_ambiguities(epoch, t, &convention);

    let converged_correctly = converged && ambiguities_match(&ambiguities, &true_ambiguities);

    let baseline_error_m = baseline.map(|b| (b - aggregator.baseline()).norm());

    debug!(
        "{} - #{} sv={} converged={} correct={} |db|={:?}",
        epoch,
        index,
        observations.len(),
        converged,
        converged_correctly,
        baseline_error_m
    );

    if converged && !converged_correctly {
        for (sv, n) in ambiguities.iter() {
            if let Some(n_true) = true_ambiguities.get(sv) {
                if n != n_true {
                    info!("{}({}) - estimated {} true {}", epoch, sv, n, n_true);
                }
            }
        }
    }

    let row = ResultRow {
        epoch,
        index,
        status: EpochStatus::Evaluated,
        satellites: observations.len(),
        baseline,
        baseline_error_m,
        ambiguities,
        true_ambiguities,
        converged,
        converged_correctly,
    };

    aggregator.record(&row);
    Ok(row)
}
