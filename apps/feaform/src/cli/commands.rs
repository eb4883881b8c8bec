//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use feaform_core::model::{Element, Material, Model, Node, Part, PointLoad, Problem, Section, Step};
use feaform_core::primitives::{KEY_IDENTITY, KEY_TYPE, MAX_DOCUMENT_SIZE};
use feaform_core::{
    Engine, FeaError, Form, Header, Instance, Kind, Policy, Record, SaveFormat, save, save_form,
};
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate an input path and its size before reading.
///
/// Canonicalizes the path (resolving symlinks and ".."), requires a regular
/// file, and rejects files over the document limit.
fn validate_input_path(path: &Path) -> Result<PathBuf, FeaError> {
    let canonical = path.canonicalize().map_err(|e| {
        FeaError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(FeaError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| FeaError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_DOCUMENT_SIZE as u64 {
        return Err(FeaError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_DOCUMENT_SIZE
        )));
    }

    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, FeaError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        FeaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(FeaError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| FeaError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// GRAPH SUMMARY
// =============================================================================

/// What `inspect` reports about a loaded graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSummary {
    pub kind: Kind,
    pub identity: String,
    pub display_name: String,
    /// Distinct identity tokens per record type name.
    pub counts: BTreeMap<String, usize>,
}

impl GraphSummary {
    /// Total number of distinct records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Summarize the graph rooted at `root`.
#[must_use]
pub fn summarize(root: &Instance) -> GraphSummary {
    let header = root.header();
    let mut seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    collect_identities(&root.describe().into_value(), &mut seen);

    GraphSummary {
        kind: root.kind(),
        identity: header.identity.to_string(),
        display_name: header.display_name,
        counts: seen
            .into_iter()
            .map(|(type_name, ids)| (type_name, ids.len()))
            .collect(),
    }
}

fn collect_identities(value: &Value, seen: &mut BTreeMap<String, BTreeSet<String>>) {
    match value {
        Value::Object(map) => {
            if let (Some(Value::String(type_name)), Some(Value::String(identity))) =
                (map.get(KEY_TYPE), map.get(KEY_IDENTITY))
            {
                seen.entry(type_name.clone())
                    .or_default()
                    .insert(identity.clone());
            }
            for nested in map.values() {
                collect_identities(nested, seen);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_identities(item, seen);
            }
        }
        _ => {}
    }
}

// =============================================================================
// SAMPLE COMMAND
// =============================================================================

/// Build the demonstration model.
///
/// A three-element cantilever sharing one section, a tip point load, and a
/// gravity load of a kind the standard catalog does not know.
#[must_use]
pub fn sample_model() -> Model {
    let steel = Material::shared(210e9, 0.3, 7850.0);
    let section = Section::shared(0.01, steel);

    let nodes: Vec<_> = [0.0, 1.0, 2.0, 3.0]
        .into_iter()
        .map(|x| Node::shared([x, 0.0, 0.0]))
        .collect();

    let part = Part::shared("cantilever");
    {
        let mut part = part.borrow_mut();
        for pair in nodes.windows(2) {
            part.add_element(Element::shared(
                pair.to_vec(),
                Some(Rc::clone(&section)),
            ));
        }
    }

    let step = Step::shared(50);
    {
        let mut step = step.borrow_mut();
        if let Some(tip) = nodes.last() {
            step.add_load(PointLoad::shared(
                Rc::clone(tip),
                [0.0, 0.0, -500.0],
                [0.0; 3],
            ));
        }

        let mut fields = Map::new();
        fields.insert("g".to_string(), json!(9.81));
        fields.insert("direction".to_string(), json!([0.0, 0.0, -1.0]));
        let gravity = Record::new(
            Kind::new("fea.problem.loads", "GravityLoad"),
            Header::new("GravityLoad"),
            fields,
        );
        step.add_load(Rc::new(RefCell::new(gravity)));
    }

    let problem = Problem::shared("static");
    problem.borrow_mut().description = Some("tip load under gravity".to_string());
    problem.borrow_mut().add_step(step);

    let mut model = Model::new("cantilever demo");
    model.description = Some("three-element cantilever".to_string());
    model.author = Some("feaform".to_string());
    model.add_part(part);
    model.add_problem(problem);
    model
}

/// Write the demonstration model.
pub fn cmd_sample(output: &Path, format: SaveFormat, json_mode: bool) -> Result<(), FeaError> {
    let output = validate_output_path(output)?;
    let root = Instance::new(sample_model());
    save(&root, &output, format)?;
    tracing::info!(path = %output.display(), %format, "sample written");

    let summary = summarize(&root);
    if json_mode {
        print_json(&json!({
            "output": output.to_string_lossy(),
            "format": format.to_string(),
            "identity": summary.identity,
            "records": summary.total(),
        }));
        return Ok(());
    }

    println!("Sample model written to {:?}", output);
    println!("  Root:    {} ({})", summary.display_name, summary.identity);
    println!("  Records: {}", summary.total());
    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Load a file and summarize its graph.
pub fn cmd_inspect(engine: &Engine, input: &Path, json_mode: bool) -> Result<(), FeaError> {
    let input = validate_input_path(input)?;
    let root = engine.load_any(&input)?;
    let summary = summarize(&root);
    tracing::info!(path = %input.display(), kind = %summary.kind, records = summary.total(), "graph loaded");

    if json_mode {
        print_json(&json!({
            "input": input.to_string_lossy(),
            "kind": summary.kind.to_string(),
            "identity": summary.identity,
            "display_name": summary.display_name,
            "counts": summary.counts,
            "total": summary.total(),
        }));
        return Ok(());
    }

    println!("Graph Summary");
    println!("=============");
    println!("File:         {:?}", input);
    println!("Kind:         {}", summary.kind);
    println!("Identity:     {}", summary.identity);
    println!("Display name: {}", summary.display_name);
    println!();
    for (type_name, count) in &summary.counts {
        println!("  {:<18} {}", type_name, count);
    }
    println!("  {:<18} {}", "total", summary.total());
    Ok(())
}

// =============================================================================
// COPY COMMAND
// =============================================================================

/// Copy a file through the clone service.
pub fn cmd_copy(
    engine: &Engine,
    input: &Path,
    output: &Path,
    preserve_identity: bool,
    format: SaveFormat,
    json_mode: bool,
) -> Result<(), FeaError> {
    let input = validate_input_path(input)?;
    let output = validate_output_path(output)?;

    let root = engine.load_any(&input)?;
    let copy = engine.copy(&root, preserve_identity)?;
    save(&copy, &output, format)?;

    let source = root.header();
    let target = copy.header();
    tracing::info!(
        source = %source.identity,
        target = %target.identity,
        preserve_identity,
        "copy written"
    );

    if json_mode {
        print_json(&json!({
            "input": input.to_string_lossy(),
            "output": output.to_string_lossy(),
            "preserve_identity": preserve_identity,
            "source_identity": source.identity.to_string(),
            "copy_identity": target.identity.to_string(),
            "copy_display_name": target.display_name,
        }));
        return Ok(());
    }

    println!("Copied {:?} -> {:?}", input, output);
    println!("  Source: {} ({})", source.display_name, source.identity);
    println!("  Copy:   {} ({})", target.display_name, target.identity);
    Ok(())
}

// =============================================================================
// ROUNDTRIP COMMAND
// =============================================================================

/// Materialize `form` under PRESERVE and compare its description with the
/// input, ignoring null-valued keys.
pub fn verify_round_trip(engine: &Engine, form: &Form) -> Result<Instance, FeaError> {
    let kind = form.kind()?;
    let root = engine.materialize(&kind, form, Policy::Preserve)?;

    let mut expected = form.clone();
    expected.strip_nulls();
    let mut actual = root.describe();
    actual.strip_nulls();

    if actual != expected {
        return Err(FeaError::SerializationError(format!(
            "Round-trip mismatch for {} '{}'",
            kind,
            root.header().identity
        )));
    }
    Ok(root)
}

/// Load, describe again, and compare with the input.
pub fn cmd_roundtrip(
    engine: &Engine,
    input: &Path,
    output: Option<&Path>,
    format: SaveFormat,
    json_mode: bool,
) -> Result<(), FeaError> {
    let input = validate_input_path(input)?;
    let form = engine.read_form(&input)?;
    let root = verify_round_trip(engine, &form)?;
    tracing::info!(path = %input.display(), "round-trip verified");

    let written = match output {
        Some(output) => {
            let output = validate_output_path(output)?;
            save_form(&root.describe(), &output, format)?;
            Some(output)
        }
        None => None,
    };

    if json_mode {
        print_json(&json!({
            "input": input.to_string_lossy(),
            "status": "ok",
            "output": written.as_ref().map(|p| p.to_string_lossy()),
        }));
        return Ok(());
    }

    println!("Round-trip OK: {:?}", input);
    if let Some(path) = written {
        println!("  Re-described form written to {:?}", path);
    }
    Ok(())
}

// =============================================================================
// KINDS COMMAND
// =============================================================================

/// List the registered record kinds.
pub fn cmd_kinds(engine: &Engine, json_mode: bool) -> Result<(), FeaError> {
    let kinds: Vec<String> = engine.catalog().kinds().map(ToString::to_string).collect();

    if json_mode {
        print_json(&json!({ "kinds": kinds }));
        return Ok(());
    }

    println!("Registered kinds ({})", kinds.len());
    for kind in &kinds {
        println!("  {}", kind);
    }
    Ok(())
}
