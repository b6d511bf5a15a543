use std::{
    fs::{read_to_string, remove_file, write},
    path::PathBuf,
};

use rstest::*;

use crate::{
    prelude::{
        analyze, run, AmbiguityConvention, Config, EpochSource, Error, PhaseSign,
        ReferencePosition, Report,
    },
    report::Summary,
    tests::{init_logger, RoundingEstimator, SyntheticScenario, G05},
};

const ALMANAC_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/almanac.alm");

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dgnss-eval-{}-{}", std::process::id(), name))
}

fn scenario_config(scenario: &SyntheticScenario, name: &str, output: &str) -> Config {
    let data_path = temp_path(&format!("{}.json", name));
    write(&data_path, scenario.to_json("sd", 4)).unwrap();

    let reference = ReferencePosition::Ecef([
        scenario.reference[0],
        scenario.reference[1],
        scenario.reference[2],
    ]);

    let baseline = [scenario.baseline[0], scenario.baseline[1], scenario.baseline[2]];

    Config::new(
        data_path,
        ALMANAC_PATH,
        temp_path(output),
        reference,
        baseline,
    )
}

#[rstest]
#[case(AmbiguityConvention::default())]
#[case(AmbiguityConvention::double_difference(G05))]
#[case(AmbiguityConvention::default().with_sign(PhaseSign::Negative))]
fn three_epochs_run(#[case] convention: AmbiguityConvention) {
    init_logger();

    let scenario = SyntheticScenario::default().with_sign(convention.sign);
    let source = scenario.source(3);

    let mut estimator = RoundingEstimator::new(convention).with_fix_after(2);

    let report = run(
        &mut estimator,
        &source,
        scenario.almanac(),
        scenario.reference,
        scenario.baseline,
        1.0,
    )
    .unwrap();

    assert_eq!(estimator.init_calls, 1);
    assert_eq!(estimator.updates, 2);

    // one row per evaluated epoch, first epoch excluded, chronological
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].epoch, scenario.epoch(1));
    assert_eq!(report.rows[1].epoch, scenario.epoch(2));

    assert!(!report.rows[0].converged);
    assert!(report.rows[1].converged_correctly);

    let (index, t) = report.summary.first_convergence.unwrap();
    assert_eq!(index, 1);
    assert!(t >= scenario.epoch(1));

    assert!(report.row(scenario.epoch(2)).is_some());
    assert!(report.row(scenario.epoch(0)).is_none());
}

#[test]
fn empty_source() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let source = EpochSource::default();
    let mut estimator = RoundingEstimator::default();

    match run(
        &mut estimator,
        &source,
        scenario.almanac(),
        scenario.reference,
        scenario.baseline,
        1.0,
    ) {
        Err(Error::EmptySource) => {},
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(estimator.init_calls, 0);
}

#[test]
fn single_epoch_source() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let source = scenario.source(1);
    let mut estimator = RoundingEstimator::default();

    let report = run(
        &mut estimator,
        &source,
        scenario.almanac(),
        scenario.reference,
        scenario.baseline,
        1.0,
    )
    .unwrap();

    assert_eq!(estimator.init_calls, 1);
    assert!(report.rows.is_empty());
    assert_eq!(report.summary.total_epochs, 0);
    assert!(report.summary.first_convergence.is_none());
}

#[test]
fn json_report() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let cfg = scenario_config(&scenario, "json-input", "report.json");

    let mut estimator = RoundingEstimator::default();
    let report = analyze(&cfg, &mut estimator).unwrap();

    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.summary.correct_epochs, 3);

    let content = read_to_string(&cfg.output_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json, report.to_json().unwrap());
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["summary"]["total_epochs"], 3);
    assert_eq!(json["summary"]["time_to_convergence_s"], 30.0);
    assert_eq!(json["rows"][0]["converged_correctly"], true);

    let _ = remove_file(&cfg.data_path);
    let _ = remove_file(&cfg.output_path);
}

#[test]
fn csv_report() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let cfg = scenario_config(&scenario, "csv-input", "report.csv");

    let mut estimator = RoundingEstimator::default().with_fix_after(3);
    let report = analyze(&cfg, &mut estimator).unwrap();

    let mut reader = csv::Reader::from_path(&cfg.output_path).unwrap();

    let headers = reader.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "converged_correctly"));

    let records = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(records.len(), report.rows.len());

    let summary_path = Report::summary_path(&cfg.output_path);
    let summary: serde_json::Value =
        serde_json::from_str(&read_to_string(&summary_path).unwrap()).unwrap();

    assert_eq!(summary["correct_epochs"], 1);
    assert_eq!(summary["first_convergence"][0], 2);

    let _ = remove_file(&cfg.data_path);
    let _ = remove_file(&cfg.output_path);
    let _ = remove_file(&summary_path);
}

#[test]
fn missing_data_file() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let mut cfg = scenario_config(&scenario, "missing-input", "missing-report.json");

    let _ = remove_file(&cfg.data_path);
    cfg.data_path = temp_path("does-not-exist.json");

    let mut estimator = RoundingEstimator::default();

    match analyze(&cfg, &mut estimator) {
        Err(Error::Io(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(estimator.init_calls, 0);
    assert!(!cfg.output_path.exists());
}

#[test]
fn failed_run_leaves_no_report() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let cfg = scenario_config(&scenario, "rejected-input", "rejected-report.json");

    let mut estimator = RoundingEstimator::default().with_rejection(0);

    match analyze(&cfg, &mut estimator) {
        Err(Error::Estimator { .. }) => {},
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(!cfg.output_path.exists());
    let _ = remove_file(&cfg.data_path);
}

#[test]
fn summary_serialization() {
    let scenario = SyntheticScenario::default();

    let summary = Summary {
        total_epochs: 4,
        evaluated_epochs: 3,
        skipped_epochs: 1,
        converged_epochs: 2,
        correct_epochs: 2,
        incorrect_epochs: 0,
        deconvergences: 0,
        convergence_rate: 0.5,
        first_fix: Some((1, scenario.epoch(2))),
        first_convergence: Some((1, scenario.epoch(2))),
        time_to_convergence: Some(crate::prelude::Duration::from_seconds(60.0)),
    };

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["skipped_epochs"], 1);
    assert_eq!(json["first_convergence"][0], 1);
    assert_eq!(
        json["first_convergence"][1],
        scenario.epoch(2).to_string().as_str()
    );
    assert_eq!(json["time_to_convergence_s"], 60.0);
}

#[test]
fn config_file() {
    init_logger();

    let scenario = SyntheticScenario::default();
    let cfg = scenario_config(&scenario, "cfg-input", "cfg-report.json").with_scale(0.5);

    let cfg_path = temp_path("cfg.json");
    write(&cfg_path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

    let parsed = Config::from_file(&cfg_path).unwrap();
    assert_eq!(parsed, cfg);

    let mut estimator = RoundingEstimator::default();
    analyze(&parsed, &mut estimator).unwrap();

    let (_, _, scale) = estimator.init_input.clone().unwrap();
    assert_eq!(scale, 0.5);

    let _ = remove_file(&cfg_path);
    let _ = remove_file(&cfg.data_path);
    let _ = remove_file(&cfg.output_path);
}

#[test]
fn gzip_source() {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    init_logger();

    let scenario = SyntheticScenario::default();
    let path = temp_path("source.json.gz");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(scenario.to_json("gz", 3).as_bytes())
        .unwrap();
    write(&path, encoder.finish().unwrap()).unwrap();

    let source = EpochSource::from_file(&path, "gz").unwrap();
    assert_eq!(source, scenario.source(3));

    let _ = remove_file(&path);
}
