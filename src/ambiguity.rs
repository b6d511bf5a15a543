//! True ambiguities, from known baseline
use std::collections::BTreeMap;

use log::{debug, warn};
use num_traits::ToPrimitive;

use crate::prelude::{
    Almanac, AmbiguityConvention, Differencing, EpochData, GpsTime, Vector3, SV,
};

/// [GroundTruth] knows both antenna positions and is able to tell
/// the true integer ambiguities of any epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruth {
    /// Base antenna (ECEF, meters)
    pub reference_ecef: Vector3<f64>,
    /// True base to rover vector (ECEF, meters)
    pub baseline: Vector3<f64>,
}

impl GroundTruth {
    pub fn new(reference_ecef: Vector3<f64>, baseline: Vector3<f64>) -> Self {
        Self {
            reference_ecef,
            baseline,
        }
    }

    /// Rover antenna (ECEF, meters)
    pub fn rover_ecef(&self) -> Vector3<f64> {
        self.reference_ecef + self.baseline
    }

    /// Single difference (rover - base) geometric range to this satellite position, in meters.
    pub fn range_difference_m(&self, sv_ecef: &Vector3<f64>) -> f64 {
        (sv_ecef - self.rover_ecef()).norm() - (sv_ecef - self.reference_ecef).norm()
    }

    /// Real valued single difference ambiguities (cycles)
    /// of all usable satellites that have an almanac position.
    fn float_ambiguities(
        &self,
        data: &EpochData,
        t: GpsTime,
        almanac: &Almanac,
        convention: &AmbiguityConvention,
    ) -> BTreeMap<SV, f64> {
        let lambda = convention.carrier.wavelength_m();
        let sign = convention.sign.factor();

        data.usable()
            .filter_map(|(sv, phase, _)| {
                let entry = almanac.get_sv(sv)?;
                let sv_ecef = entry.position_ecef(t)?;
                let dr = self.range_difference_m(&sv_ecef);
                Some((sv, phase - sign * dr / lambda))
            })
            .collect()
    }

    /// True integer ambiguities at this epoch, expressed with the estimator [AmbiguityConvention].
    /// Satellites without almanac entry are ignored. In double difference,
    /// the result is empty when the reference satellite is not observed.
    pub fn ambiguities(
        &self,
        data: &EpochData,
        t: GpsTime,
        almanac: &Almanac,
        convention: &AmbiguityConvention,
    ) -> BTreeMap<SV, i64> {
        let float = self.float_ambiguities(data, t, almanac, convention);

        let (pivot, offset) = match convention.differencing {
            Differencing::Single => (None, 0.0),
            Differencing::Double(reference) => match float.get(&reference) {
                Some(n_ref) => (Some(reference), *n_ref),
                None => {
                    warn!(
                        "{}({}) - reference satellite not observed: no true ambiguity",
                        data.epoch, reference
                    );
                    return BTreeMap::new();
                },
            },
        };

        float
            .iter()
            .filter(|(sv, _)| Some(**sv) != pivot)
            .filter_map(|(sv, n)| {
                let n_int = (n - offset).round().to_i64();
                if n_int.is_none() {
                    warn!("{}({}) - invalid ambiguity {}", data.epoch, sv, n - offset);
                }
                n_int.map(|n_int| {
                    debug!("{}({}) - true ambiguity {}", data.epoch, sv, n_int);
                    (*sv, n_int)
                })
            })
            .collect()
    }
}
