use log::{debug, info};

use crate::{
    error::Error,
    observation::ObservationMatrix,
    prelude::{Almanac, AlmanacEntry, EpochData, Estimator, GpsTime, Vector3},
};

/// Initializes the [Estimator] with the first epoch.
/// Nothing is forwarded to the [Estimator] unless all inputs are valid.
/// ## Inputs
/// - estimator: [Estimator] to initialize
/// - almanac: reference [Almanac]
/// - first: first [EpochData]
/// - reference_ecef: base antenna position (ECEF, meters)
/// - scale: confidence / scaling parameter
/// ## Returns
/// - [Error::InsufficientData] when no satellite has both observables
/// - [Error::UnknownSatellite] when a usable satellite has no almanac entry
/// - [Error::Estimator] when the estimator refuses to initialize
pub fn initialize<E: Estimator>(
    estimator: &mut E,
    almanac: &Almanac,
    first: &EpochData,
    reference_ecef: &Vector3<f64>,
    scale: f64,
) -> Result<(), Error> {
    let epoch = first.epoch;
    let usable = first.usable().collect::<Vec<_>>();

    if usable.is_empty() {
        return Err(Error::InsufficientData {
            epoch,
            found: 0,
            required: 1,
        });
    }

    let entries = usable
        .iter()
        .map(|(sv, _, _)| {
            almanac
                .get_sv(*sv)
                .copied()
                .ok_or(Error::UnknownSatellite(epoch, *sv))
        })
        .collect::<Result<Vec<AlmanacEntry>, Error>>()?;

    let t = GpsTime::from_epoch(epoch)?;
    let observations = ObservationMatrix::from_observations(&usable);

    debug!(
        "{} - initialization ({}) with {}/{} satellites",
        epoch,
        t,
        usable.len(),
        first.len()
    );

    estimator
        .initialize(&entries, t, &observations, reference_ecef, scale)
        .map_err(|source| Error::Estimator { epoch, source })?;

    info!("{} - estimator initialized", epoch);
    Ok(())
}
