//! Fixture sweep: every `fixtures/*.json` names a schema and what generating
//! it must produce (record names and member names, or an error matching a
//! regex).
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use json_typegen::config::GenerationConfig;
use json_typegen::{Registry, SchemaDocument, generate};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    #[serde(default)]
    config: GenerationConfig,
    schema: Value,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expect {
    #[serde(default)]
    records: Vec<ExpectRecord>,
    /// regex over the error message; the document must fail when set
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectRecord {
    name: String,
    fields: Vec<String>,
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
    let fixtures = match fixture_paths(&dir) {
        Ok(xs) => xs,
        Err(error) => {
            eprintln!("❌ cannot list {}: {error}", dir.display());
            return ExitCode::FAILURE;
        }
    };
    let mut failures = 0usize;
    for path in &fixtures {
        match run_fixture(path) {
            Ok(()) => eprintln!("✅ {}", path.display()),
            Err(message) => {
                failures += 1;
                eprintln!("❌ {}: {message}", path.display());
            }
        }
    }
    eprintln!("—— {} fixtures, {failures} failed ——", fixtures.len());
    if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn fixture_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn run_fixture(path: &Path) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let de = &mut serde_json::Deserializer::from_str(&source);
    let fixture: Fixture = serde_path_to_error::deserialize(de)
        .map_err(|e| format!("bad fixture at {}: {}", e.path(), e.inner()))?;

    let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let doc = SchemaDocument::new(name, fixture.schema);
    let result = generate(&Registry::new(fixture.config), &doc);

    match (result, fixture.expect.error) {
        (Ok(_), Some(pattern)) => Err(format!("expected an error matching /{pattern}/, got a model")),
        (Err(error), None) => Err(format!("unexpected error: {error}")),
        (Err(error), Some(pattern)) => {
            let re = Regex::new(&pattern).map_err(|e| format!("bad error regex: {e}"))?;
            let message = error.to_string();
            if re.is_match(&message) {
                Ok(())
            } else {
                Err(format!("error `{message}` does not match /{pattern}/"))
            }
        }
        (Ok(model), None) => {
            let arena = model.arena();
            let actual: Vec<(String, Vec<String>)> = arena
                .records()
                .map(|(_, r)| (r.name.clone(), r.fields.iter().map(|f| f.name.clone()).collect()))
                .collect();
            let expected: Vec<(String, Vec<String>)> = fixture
                .expect
                .records
                .into_iter()
                .map(|r| (r.name, r.fields))
                .collect();
            if actual == expected {
                Ok(())
            } else {
                Err(format!("records differ\n  expected: {expected:?}\n  actual:   {actual:?}"))
            }
        }
    }
}
