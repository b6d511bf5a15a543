//! Analysis run
use log::{error, info};

use crate::{
    aggregator::Aggregator,
    cfg::Config,
    error::Error,
    evaluator::evaluate,
    initializer::initialize,
    prelude::{Almanac, EpochSource, Estimator, Vector3},
    report::Report,
};

/// Runs the evaluation over the whole [EpochSource]. The first epoch
/// initializes the [Estimator], every following epoch produces one row.
/// The run is all or nothing: any fatal error aborts it.
/// ## Inputs
/// - estimator: [Estimator] to evaluate (not initialized yet)
/// - source: [EpochSource]
/// - almanac: reference [Almanac]
/// - reference_ecef: base antenna position (ECEF, meters)
/// - baseline: true baseline (ECEF, meters)
/// - scale: estimator initialization parameter
pub fn run<E: Estimator>(
    estimator: &mut E,
    source: &EpochSource,
    almanac: &Almanac,
    reference_ecef: Vector3<f64>,
    baseline: Vector3<f64>,
    scale: f64,
) -> Result<Report, Error> {
    let first = source.first().ok_or(Error::EmptySource)?;

    let mut aggregator = Aggregator::new(reference_ecef, baseline, source, almanac);

    initialize(estimator, almanac, first, &reference_ecef, scale)?;

    let mut rows = Vec::with_capacity(source.len().saturating_sub(1));

    for (index, data) in source.iter().skip(1).enumerate() {
        match evaluate(estimator, data, index, &mut aggregator) {
            Ok(row) => rows.push(row),
            Err(e) => {
                error!("{} - run aborted: {}", data.epoch, e);
                return Err(e);
            },
        }
    }

    let summary = aggregator.summary();

    info!(
        "{} epochs evaluated - convergence rate {:.3}",
        summary.total_epochs, summary.convergence_rate
    );

    match summary.first_convergence {
        Some((index, t)) => info!("first correct convergence: {} (#{})", t, index),
        None => info!("never converged to the true ambiguities"),
    }

    Ok(Report::new(rows, summary))
}

/// Loads the inputs described by [Config], runs the evaluation
/// and stores the [Report] at the configured location.
/// Nothing is written when the run fails.
pub fn analyze<E: Estimator>(cfg: &Config, estimator: &mut E) -> Result<Report, Error> {
    let source = EpochSource::from_file(&cfg.data_path, &cfg.data_key)?;
    let almanac = Almanac::from_file(&cfg.almanac_path)?;

    let reference_ecef = cfg.reference.ecef();

    info!(
        "reference x={:.3}m y={:.3}m z={:.3}m - baseline {}",
        reference_ecef[0],
        reference_ecef[1],
        reference_ecef[2],
        cfg.baseline().transpose()
    );

    let report = run(
        estimator,
        &source,
        &almanac,
        reference_ecef,
        cfg.baseline(),
        cfg.scale,
    )?;

    report.to_file(&cfg.output_path)?;
    Ok(report)
}
