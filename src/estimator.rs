//! Estimator adapter
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    almanac::AlmanacEntry,
    error::EstimatorError,
    observation::ObservationMatrix,
    prelude::{Carrier, GpsTime, Vector3, SV},
};

/// Sign of the geometric range within the carrier phase observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseSign {
    /// phase = range / lambda + N
    #[default]
    Positive,
    /// phase = - range / lambda + N
    Negative,
}

impl PhaseSign {
    pub(crate) fn factor(&self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// How ambiguities are differenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Differencing {
    /// One single difference (rover - base) ambiguity per satellite.
    #[default]
    Single,
    /// Double difference against this reference satellite.
    /// The reference satellite has no ambiguity.
    Double(SV),
}

/// [AmbiguityConvention] describes what the integers reported by an [Estimator] mean,
/// so the true ambiguities can be expressed the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguityConvention {
    /// [Carrier] the ambiguities are expressed on
    pub carrier: Carrier,
    /// [PhaseSign]
    pub sign: PhaseSign,
    /// [Differencing]
    pub differencing: Differencing,
}

impl AmbiguityConvention {
    /// Double differences against this reference satellite,
    /// on L1 with positive phase sign.
    pub fn double_difference(reference: SV) -> Self {
        Self {
            differencing: Differencing::Double(reference),
            ..Default::default()
        }
    }

    /// Copies and returns [AmbiguityConvention] with updated [PhaseSign]
    pub fn with_sign(&self, sign: PhaseSign) -> Self {
        let mut s = *self;
        s.sign = sign;
        s
    }

    /// Copies and returns [AmbiguityConvention] with updated [Carrier]
    pub fn with_carrier(&self, carrier: Carrier) -> Self {
        let mut s = *self;
        s.carrier = carrier;
        s
    }
}

/// Any DGNSS ambiguity resolution engine should implement the [Estimator] trait
/// to be evaluated. The engine is a stateful sequential filter:
/// it is initialized once, then updated in chronological order.
/// Its internal filtering and fixing logic is opaque to the evaluation.
pub trait Estimator {
    /// Initializes the engine.
    /// ## Inputs
    /// - almanac: one [AlmanacEntry] per row of `observations`, same order
    /// - t: [GpsTime] of the first epoch
    /// - observations: [ObservationMatrix] of the first epoch
    /// - reference_ecef: base antenna position (ECEF, meters)
    /// - scale: confidence / scaling parameter
    fn initialize(
        &mut self,
        almanac: &[AlmanacEntry],
        t: GpsTime,
        observations: &ObservationMatrix,
        reference_ecef: &Vector3<f64>,
        scale: f64,
    ) -> Result<(), EstimatorError>;

    /// Updates the engine with a new epoch.
    fn update(&mut self, t: GpsTime, observations: &ObservationMatrix)
        -> Result<(), EstimatorError>;

    /// Current baseline estimate (ECEF, meters), if any.
    fn baseline(&self) -> Option<Vector3<f64>>;

    /// Current integer ambiguity estimates.
    fn ambiguities(&self) -> BTreeMap<SV, i64>;

    /// True when the engine reports a fixed (resolved) ambiguity state.
    fn is_converged(&self) -> bool;

    /// Minimal number of satellites required for an update.
    fn min_satellites(&self) -> usize {
        4
    }

    /// [AmbiguityConvention] followed by [Self::ambiguities].
    fn convention(&self) -> AmbiguityConvention {
        AmbiguityConvention::default()
    }
}
