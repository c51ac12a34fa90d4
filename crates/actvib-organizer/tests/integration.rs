//! Integration tests for actvib-organizer over a directory of recordings.

use actvib_analysis::NlmsParams;
use actvib_config::AnalysisConfig;
use actvib_io::{Sample, write_sample};
use actvib_organizer::{
    ActVibNaming, BatchMode, BatchRunner, Error, ResultKey, discover_samples, organize_by_wear,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const TAPS: [f64; 3] = [0.6, -0.25, 0.1];

fn noise(seed: u32, len: usize) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            f64::from(state >> 8) / f64::from(1u32 << 24) - 0.5
        })
        .collect()
}

fn fir(input: &[f64], taps: &[f64]) -> Vec<f64> {
    (0..input.len())
        .map(|t| {
            taps.iter()
                .enumerate()
                .filter(|(k, _)| *k <= t)
                .map(|(k, h)| h * input[t - k])
                .sum()
        })
        .collect()
}

fn write_recording(root: &Path, relative: &str, actuator: u8, len: usize, seed: u32) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let drive = noise(seed, len);
    let accel = fir(&drive, &TAPS);
    let other = noise(seed + 1, len);
    let time: Vec<f64> = (0..len).map(|i| i as f64 / 416.0).collect();

    let mut columns = vec![("time".to_string(), time)];
    for n in 1..=3u8 {
        let values = if n == actuator { drive.clone() } else { other.clone() };
        columns.push((format!("dac{n}"), values));
    }
    columns.push(("imu2accz".to_string(), accel));

    let name = path.file_stem().unwrap().to_string_lossy().into_owned();
    let sample = Sample::from_columns(name, 416.0, columns).unwrap();
    write_sample(&path, &sample).unwrap();
    path
}

fn config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.filter = NlmsParams::new(16).with_step_size(0.8);
    config.peaks = config.peaks.with_prominence(0.0).with_min_distance(1);
    config
}

/// Wear levels 0, 0, 2, 5 plus one unlabelled and one too-short recording.
fn dataset() -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_recording(root, "VigaIntacta/run_d1_a.csv", 1, 1024, 1);
    write_recording(root, "VigaIntacta/run_d2_a.csv", 2, 1024, 2);
    write_recording(root, "Viga 2/run_d1_a.csv", 1, 1024, 3);
    write_recording(root, "Viga 5/sub/run_d3_b.csv", 3, 1024, 4);
    write_recording(root, "misc/run_d1_z.csv", 1, 1024, 5);
    write_recording(root, "Viga 7/run_d1_short.csv", 1, 8, 6);
    std::fs::write(root.join("VigaIntacta/notes.txt"), "not a sample").unwrap();

    let paths = discover_samples(root, &ActVibNaming::default()).unwrap();
    (dir, paths)
}

// ---------------------------------------------------------------------------
// Discovery and grouping
// ---------------------------------------------------------------------------

#[test]
fn discovery_is_recursive_and_sorted() {
    let (_dir, paths) = dataset();
    assert_eq!(paths.len(), 6);
    assert!(paths.windows(2).all(|w| w[0] < w[1]));
    assert!(paths.iter().all(|p| p.extension().unwrap() == "csv"));
}

#[test]
fn discovery_of_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let err = discover_samples(&dir.path().join("absent"), &ActVibNaming::default()).unwrap_err();
    assert!(matches!(err, Error::Discovery { .. }));
}

#[cfg(unix)]
#[test]
fn discovery_does_not_follow_directory_links() {
    let (dir, _) = dataset();
    let root = dir.path();
    std::os::unix::fs::symlink(root, root.join("Viga 2/loop")).unwrap();

    let paths = discover_samples(root, &ActVibNaming::default()).unwrap();
    assert_eq!(paths.len(), 6);
}

#[test]
fn organize_reports_levels_and_rejects() {
    let (_dir, paths) = dataset();
    let groups = organize_by_wear(&paths, &ActVibNaming::default());

    assert_eq!(groups.levels().collect::<Vec<_>>(), vec![0, 2, 5, 7]);
    assert_eq!(groups.get(0).len(), 2);
    assert_eq!(groups.get(2), &["run_d1_a".to_string()]);
    assert_eq!(groups.get(5), &["run_d3_b".to_string()]);
    assert!(groups.get(1).is_empty());

    assert_eq!(groups.rejected().len(), 1);
    assert!(groups.rejected()[0].0.ends_with("misc/run_d1_z.csv"));
}

// ---------------------------------------------------------------------------
// Batch runs
// ---------------------------------------------------------------------------

#[test]
fn batch_collects_results_and_failures() {
    let (_dir, paths) = dataset();
    let report = BatchRunner::new(config())
        .run(&paths, BatchMode::Spectra)
        .unwrap();

    assert_eq!(report.table.len(), 4);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().any(|f| matches!(f.error, Error::PathFormat(_))));
    assert!(
        report
            .failures
            .iter()
            .any(|f| matches!(&f.error, Error::Analysis(e) if e.is_precondition()))
    );

    let row = report
        .table
        .get(&ResultKey::new(5, "run_d3_b", "imu2accz"))
        .unwrap();
    assert_eq!(row.actuator, 3);
    assert_eq!(row.spectrum.len(), 9);
    assert!(row.resonances.is_none());
}

#[test]
fn excitation_follows_actuator() {
    let (_dir, paths) = dataset();
    let report = BatchRunner::new(config())
        .run(&paths, BatchMode::Spectra)
        .unwrap();

    // DC bin equals the sum of the recovered taps only when the right drive
    // channel was paired with the response.
    let expected: f64 = TAPS.iter().sum();
    for (key, row) in report.table.iter() {
        let dc = row.spectrum.magnitude()[0];
        assert!(
            (dc - expected).abs() < 5e-2,
            "{key:?}: dc = {dc}, expected {expected}"
        );
    }
}

#[test]
fn results_do_not_depend_on_worker_count() {
    let (_dir, paths) = dataset();
    let serial = BatchRunner::new(config())
        .with_workers(1)
        .run(&paths, BatchMode::Resonances)
        .unwrap();
    let parallel = BatchRunner::new(config())
        .with_workers(4)
        .run(&paths, BatchMode::Resonances)
        .unwrap();

    assert_eq!(serial.table, parallel.table);
    let failed = |r: &actvib_organizer::BatchReport| {
        r.failures.iter().map(|f| f.path.clone()).collect::<Vec<_>>()
    };
    assert_eq!(failed(&serial), failed(&parallel));
    assert!(serial.table.iter().all(|(_, row)| row.resonances.is_some()));
}

#[test]
fn progress_called_once_per_sample() {
    let (_dir, paths) = dataset();
    let done = AtomicUsize::new(0);
    BatchRunner::new(config())
        .run_with_progress(&paths, BatchMode::Spectra, |_| {
            done.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    assert_eq!(done.load(Ordering::Relaxed), paths.len());
}

#[test]
fn same_stem_in_sibling_folders_is_reported() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_recording(root, "Viga 2/dia1/run_d1_a.csv", 1, 1024, 11);
    write_recording(root, "Viga 2/dia2/run_d1_a.csv", 1, 1024, 12);
    write_recording(root, "Viga 2/dia2/run_d2_b.csv", 2, 1024, 13);
    let paths = discover_samples(root, &ActVibNaming::default()).unwrap();
    assert_eq!(paths.len(), 3);

    let report = BatchRunner::new(config())
        .with_workers(2)
        .run(&paths, BatchMode::Spectra)
        .unwrap();

    assert_eq!(report.table.len() + report.failures.len(), paths.len());
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert!(failure.path.ends_with("dia2/run_d1_a.csv"));
    match &failure.error {
        Error::DuplicateSample { key } => {
            assert_eq!(key, &ResultKey::new(2, "run_d1_a", "imu2accz"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_response_channel_is_isolated() {
    let (_dir, paths) = dataset();
    let mut config = config();
    config.responses = vec!["imu2accz".to_string(), "imu9accz".to_string()];

    let report = BatchRunner::new(config)
        .run(&paths, BatchMode::Spectra)
        .unwrap();
    assert!(report.table.is_empty());
    assert_eq!(report.failures.len(), 6);
}

#[test]
fn exports_write_files() {
    let (dir, paths) = dataset();
    let report = BatchRunner::new(config())
        .run(&paths, BatchMode::Resonances)
        .unwrap();

    let spectra = dir.path().join("spectra.csv");
    let resonances = dir.path().join("resonances.csv");
    report.table.export_spectra(&spectra).unwrap();
    report.table.export_resonances(&resonances).unwrap();

    let text = std::fs::read_to_string(&spectra).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.starts_with("wear_level,sample,channel,actuator,0,"));
    assert!(resonances.exists());
}
