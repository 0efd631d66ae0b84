//! Tests for saving and loading Q-table checkpoints

mod common;

use std::fs;

use aquaticus_qtable::{
    CheckpointConfig, ConfigWrite, DiscreteState, EngineConfig, Error, QLearner,
    q_learning::serialization::{CONFIG_FILE_NAME, WeightBlob},
};
use common::seeded_engine;
use tempfile::TempDir;

const ATTACK: [&str; 3] = ["grab_flag", "flank_left", "flank_right"];
const RETREAT: [&str; 2] = ["go_home", "evade"];

#[test]
fn test_save_load_roundtrip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut engine = seeded_engine(0.5, 0.9, 42);
    let state = DiscreteState::new(10, 2, 7, 1);
    engine.set_qvalue(state, 1, 123.456);
    engine.update_table(state, 0, 1.0, DiscreteState::new(11, 2, 7, 1));

    let outcome = engine
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("ckpt"))
        .expect("Failed to save");
    assert_eq!(outcome.config_write, ConfigWrite::Written);
    assert!(outcome.weights_path.exists());
    assert_eq!(outcome.weights_path, dir.path().join("ckpt.msgpack"));

    let loaded = QLearner::load(&outcome.weights_path).expect("Failed to load");
    assert_eq!(loaded.engine.hyperparameters(), engine.hyperparameters());
    assert_eq!(loaded.engine.shape(), engine.shape());
    assert_eq!(loaded.attack_actions, ATTACK);
    assert_eq!(loaded.retreat_actions, RETREAT);

    let saved = engine.q_table().values();
    let restored = loaded.engine.q_table().values();
    assert_eq!(saved.len(), restored.len());
    for (a, b) in saved.iter().zip(restored) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
    assert_eq!(loaded.engine.q_table().get(state, 1), 123.456);
}

#[test]
fn test_loaded_engine_keeps_learning_with_saved_rates() {
    let dir = TempDir::new().unwrap();
    let engine = seeded_engine(0.5, 0.9, 1);
    let outcome = engine
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("a"))
        .unwrap();

    let mut restored = QLearner::load_with_seed(&outcome.weights_path, 5).unwrap().engine;
    let state = DiscreteState::new(0, 0, 0, 0);
    let next = DiscreteState::new(1, 0, 0, 0);
    for action in 0..4 {
        restored.set_qvalue(next, action, 0.0);
    }
    restored.set_qvalue(state, 0, 0.0);
    restored.update_table(state, 0, 1.0, next);
    assert!((restored.q_table().get(state, 0) - 0.5).abs() < 1e-12);
}

#[test]
fn test_config_record_is_write_once() {
    let dir = TempDir::new().unwrap();
    let first = seeded_engine(0.5, 0.9, 1);
    let second = seeded_engine(0.1, 0.3, 2);

    let a = first
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("first"))
        .unwrap();
    let b = second
        .save(&["other"], &["labels"], Some(dir.path()), Some("second"))
        .unwrap();
    assert_eq!(a.config_write, ConfigWrite::Written);
    assert_eq!(b.config_write, ConfigWrite::KeptExisting);
    assert!(b.weights_path.exists());

    let record = CheckpointConfig::read(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(record.learning_rate, 0.5);
    assert_eq!(record.discount_factor, 0.9);
    assert_eq!(record.attack_actions, ATTACK);

    // the second blob is read back under the first save's hyperparameters
    let loaded = QLearner::load(&b.weights_path).unwrap();
    assert_eq!(loaded.engine.hyperparameters().learning_rate, 0.5);
    assert_eq!(loaded.engine.q_table().values(), second.q_table().values());
}

#[test]
fn test_save_uses_configured_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("runs").join("deep");
    let engine = QLearner::new(
        EngineConfig::new()
            .with_action_space_size(3)
            .with_seed(4)
            .with_save_dir(&nested),
    )
    .unwrap();

    let outcome = engine.save(&ATTACK, &RETREAT, None, None).unwrap();
    assert!(nested.join(CONFIG_FILE_NAME).exists());
    assert_eq!(outcome.weights_path.parent(), Some(nested.as_path()));
    let stem = outcome.weights_path.file_stem().unwrap().to_str().unwrap();
    assert!(stem.parse::<u64>().is_ok(), "default name {stem} is not a timestamp");
}

#[test]
fn test_save_without_any_directory_is_configuration_error() {
    let engine = seeded_engine(0.5, 0.9, 1);
    let err = engine.save(&ATTACK, &RETREAT, None, None).unwrap_err();
    assert!(matches!(err, Error::MissingSaveDir));
    assert!(err.is_configuration());
}

#[test]
fn test_load_missing_blob() {
    let dir = TempDir::new().unwrap();
    seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("real"))
        .unwrap();

    let err = QLearner::load(dir.path().join("absent.msgpack")).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingCheckpointFile {
            kind: "weight blob",
            ..
        }
    ));
}

#[test]
fn test_load_missing_config() {
    let dir = TempDir::new().unwrap();
    let outcome = seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("x"))
        .unwrap();
    fs::remove_file(&outcome.config_path).unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingCheckpointFile { kind: "config", .. }
    ));
}

#[test]
fn test_blob_shape_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let four_actions = seeded_engine(0.5, 0.9, 1);
    let six_actions = QLearner::new(
        EngineConfig::new()
            .with_action_space_size(6)
            .with_seed(2),
    )
    .unwrap();

    four_actions
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("four"))
        .unwrap();
    let outcome = six_actions
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("six"))
        .unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    match err {
        Error::ShapeMismatch { expected, found } => {
            assert_eq!(expected, vec![128, 5, 12, 2, 4]);
            assert_eq!(found, vec![128, 5, 12, 2, 6]);
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn test_truncated_blob_is_rejected() {
    let dir = TempDir::new().unwrap();
    let outcome = seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("t"))
        .unwrap();

    let blob = WeightBlob {
        shape: vec![128, 5, 12, 2, 4],
        values: vec![0.0; 10],
    };
    fs::write(&outcome.weights_path, rmp_serde::to_vec(&blob).unwrap()).unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    assert!(matches!(err, Error::BlobLength { got: 10, .. }));
}

#[test]
fn test_malformed_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let outcome = seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("m"))
        .unwrap();

    let mut record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outcome.config_path).unwrap()).unwrap();
    record.as_object_mut().unwrap().remove("discount_factor");
    fs::write(&outcome.config_path, record.to_string()).unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    assert!(matches!(err, Error::MalformedConfig { .. }));
}

#[test]
fn test_future_config_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let outcome = seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("v"))
        .unwrap();

    let mut record = CheckpointConfig::read(&outcome.config_path).unwrap();
    record.version = CheckpointConfig::VERSION + 1;
    fs::write(
        &outcome.config_path,
        serde_json::to_string_pretty(&record).unwrap(),
    )
    .unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion { .. }));
}

#[test]
fn test_oversized_table_shape_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let outcome = seeded_engine(0.5, 0.9, 1)
        .save(&ATTACK, &RETREAT, Some(dir.path()), Some("huge"))
        .unwrap();

    let huge = usize::MAX / 4;
    let mut record = CheckpointConfig::read(&outcome.config_path).unwrap();
    record.action_space_size = huge;
    record.table_shape = vec![128, 5, 12, 2, huge];
    fs::write(
        &outcome.config_path,
        serde_json::to_string_pretty(&record).unwrap(),
    )
    .unwrap();
    let blob = WeightBlob {
        shape: vec![128, 5, 12, 2, huge],
        values: vec![0.0; 3],
    };
    fs::write(&outcome.weights_path, rmp_serde::to_vec(&blob).unwrap()).unwrap();

    let err = QLearner::load(&outcome.weights_path).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}
