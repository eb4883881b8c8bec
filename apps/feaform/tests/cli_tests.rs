//! Command execution tests against temporary directories.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use feaform::cli::{
    Cli, Commands, cmd_copy, cmd_inspect, cmd_kinds, cmd_roundtrip, cmd_sample, execute,
    sample_model, summarize, verify_round_trip,
};
use feaform::config::AppConfig;
use feaform_core::model::Model;
use feaform_core::{Engine, Entity, FeaError, Form, Instance, Record, SaveFormat};
use std::path::Path;

fn write_sample(dir: &Path, format: SaveFormat) -> std::path::PathBuf {
    let path = dir.join("model.json");
    cmd_sample(&path, format, true).unwrap();
    path
}

// =============================================================================
// ARGUMENT PARSING TESTS
// =============================================================================

#[test]
fn test_parse_copy_with_global_flags() {
    let cli = Cli::try_parse_from([
        "feaform",
        "--format",
        "minimal",
        "--json-mode",
        "copy",
        "-i",
        "in.json",
        "-o",
        "out.json",
        "--preserve-identity",
    ])
    .unwrap();

    assert!(cli.json_mode);
    assert_eq!(cli.format.as_deref(), Some("minimal"));
    match cli.command {
        Some(Commands::Copy {
            input,
            output,
            preserve_identity,
        }) => {
            assert_eq!(input, Path::new("in.json"));
            assert_eq!(output, Path::new("out.json"));
            assert!(preserve_identity);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_roundtrip_output_is_optional() {
    let cli = Cli::try_parse_from(["feaform", "roundtrip", "-i", "in.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Roundtrip { output: None, .. })
    ));
}

#[test]
fn test_parse_rejects_missing_input() {
    assert!(Cli::try_parse_from(["feaform", "inspect"]).is_err());
}

// =============================================================================
// SAMPLE / INSPECT TESTS
// =============================================================================

#[test]
fn test_sample_model_counts() {
    let summary = summarize(&Instance::new(sample_model()));

    assert_eq!(summary.kind.name, "Model");
    assert_eq!(summary.counts.get("Node"), Some(&4));
    assert_eq!(summary.counts.get("BeamElement"), Some(&3));
    // one shared section and one shared material
    assert_eq!(summary.counts.get("BeamSection"), Some(&1));
    assert_eq!(summary.counts.get("ElasticIsotropic"), Some(&1));
    assert_eq!(summary.counts.get("GravityLoad"), Some(&1));
    assert_eq!(summary.total(), 15);
}

#[test]
fn test_sample_then_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), SaveFormat::Pretty);

    cmd_inspect(&Engine::standard(), &path, true).unwrap();
}

#[test]
fn test_gravity_load_survives_as_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path(), SaveFormat::Compact);

    let model = Engine::standard().load_typed::<Model>(&path).unwrap();
    let model = model.borrow();
    let problem = model.problems()[0].borrow();
    let step = problem.steps()[0].borrow();
    let gravity = step.loads()[1].downcast::<Record>().unwrap();

    assert_eq!(gravity.borrow().field("g"), Some(&serde_json::json!(9.81)));
}

#[test]
fn test_inspect_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = cmd_inspect(&Engine::standard(), &dir.path().join("absent.json"), false);
    assert!(matches!(result, Err(FeaError::IoError(_))));
}

#[test]
fn test_inspect_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = cmd_inspect(&Engine::standard(), dir.path(), false);
    assert!(matches!(result, Err(FeaError::IoError(_))));
}

// =============================================================================
// COPY TESTS
// =============================================================================

#[test]
fn test_fresh_copy_file_has_new_root_identity() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::standard();
    let input = write_sample(dir.path(), SaveFormat::Pretty);
    let output = dir.path().join("copy.json");

    cmd_copy(&engine, &input, &output, false, SaveFormat::Pretty, true).unwrap();

    let source = engine.load_typed::<Model>(&input).unwrap();
    let copy = engine.load_typed::<Model>(&output).unwrap();
    assert_ne!(source.borrow().header.identity, copy.borrow().header.identity);
    assert_eq!(copy.borrow().header.display_name, "cantilever demo_copy");
}

#[test]
fn test_preserving_copy_file_matches_source() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::standard();
    let input = write_sample(dir.path(), SaveFormat::Minimal);
    let output = dir.path().join("copy.json");

    cmd_copy(&engine, &input, &output, true, SaveFormat::Minimal, true).unwrap();

    assert_eq!(
        engine.read_form(&input).unwrap(),
        engine.read_form(&output).unwrap()
    );
}

#[test]
fn test_copy_uses_configured_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::from_toml_str("[engine]\ncopy_suffix = \"-2\"\n").unwrap();
    let engine = Engine::new(feaform_core::Catalog::standard(), config.engine);
    let input = write_sample(dir.path(), SaveFormat::Pretty);
    let output = dir.path().join("copy.json");

    cmd_copy(&engine, &input, &output, false, SaveFormat::Pretty, true).unwrap();

    let copy = engine.load_typed::<Model>(&output).unwrap();
    assert_eq!(copy.borrow().header.display_name, "cantilever demo-2");
}

// =============================================================================
// ROUNDTRIP TESTS
// =============================================================================

#[test]
fn test_roundtrip_of_every_format() {
    let engine = Engine::standard();
    for format in [SaveFormat::Pretty, SaveFormat::Compact, SaveFormat::Minimal] {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), format);
        let output = dir.path().join("again.json");

        cmd_roundtrip(&engine, &input, Some(&output), format, true).unwrap();

        assert_eq!(
            engine.read_form(&input).unwrap(),
            engine.read_form(&output).unwrap()
        );
    }
}

#[test]
fn test_roundtrip_detects_dropped_field() {
    let engine = Engine::standard();
    // "extra" is not a Node field, so the rebuilt node does not describe it
    let mut form = sample_model().parts()[0].borrow().nodes()[0].borrow().describe();
    form.insert("extra", 1);

    let result = verify_round_trip(&engine, &form);
    assert!(matches!(result, Err(FeaError::SerializationError(_))));
}

#[test]
fn test_roundtrip_rejects_form_without_type() {
    let engine = Engine::standard();
    let form = Form::from_value(serde_json::json!({ "location": "fea.model" })).unwrap();

    let result = verify_round_trip(&engine, &form);
    assert!(matches!(result, Err(FeaError::MalformedForm(_))));
}

// =============================================================================
// EXECUTE / CONFIG TESTS
// =============================================================================

#[test]
fn test_kinds_lists_catalog() {
    cmd_kinds(&Engine::standard(), true).unwrap();
}

#[test]
fn test_execute_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("feaform.toml");
    std::fs::write(&config_path, "[output]\nformat = \"minimal\"\n").unwrap();
    let output = dir.path().join("model.json");

    let cli = Cli::try_parse_from([
        "feaform",
        "-q",
        "--json-mode",
        "--config",
        config_path.to_str().unwrap(),
        "sample",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    execute(cli).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(!text.contains('\n'));
    assert!(!text.contains("null"));
}

#[test]
fn test_execute_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("feaform.toml");
    std::fs::write(&config_path, "[engine]\nmax_depth = \"deep\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "feaform",
        "--config",
        config_path.to_str().unwrap(),
        "kinds",
    ])
    .unwrap();

    assert!(matches!(execute(cli), Err(FeaError::SerializationError(_))));
}
