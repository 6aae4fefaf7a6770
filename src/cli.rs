//! CLI: schema (or example JSON) → generated type model report.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use tracing::warn;

use crate::config::GenerationConfig;
use crate::generator::generate_all;
use crate::registry::Registry;
use crate::schema::SchemaDocument;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed models (records, maps, accessors) from JSON Schema documents
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate and print a JSON report of the type model of each document
    Generate(GenerateOut),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SourceType {
    /// inputs are JSON Schema documents
    #[default]
    Jsonschema,
    /// inputs are example payloads; a schema is derived from them first
    Json,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /components/schemas/Pet)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// what the inputs are
    #[arg(long, value_enum, default_value_t = SourceType::Jsonschema)]
    source_type: SourceType,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// generation config (.json); missing keys take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// skip catch-all members for `patternProperties`
    #[arg(long)]
    no_pattern_properties: bool,

    /// skip catch-all members for `additionalProperties`
    #[arg(long)]
    no_additional_properties: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read, pre-filter and select every input, one document per file.
    fn load_documents(&self) -> Result<Vec<SchemaDocument>> {
        let source_paths =
            resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut documents = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let values = self.load_values(&source_path)?;
            let name = document_name(&source_path);
            let root = match self.source_type {
                SourceType::Jsonschema => match <[Value; 1]>::try_from(values) {
                    Ok([value]) => value,
                    Err(values) => bail!(
                        "{}: expected exactly one schema, got {} (check --jq-expr)",
                        source_path.display(),
                        values.len()
                    ),
                },
                SourceType::Json => crate::example::schema_from_examples(&values),
            };
            documents.push(SchemaDocument::new(name, root));
        }
        Ok(documents)
    }

    fn load_values(&self, source_path: &Path) -> Result<Vec<Value>> {
        let source_path_str = source_path.display();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file {source_path_str}"))?;
        let json_value = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse JSON source file {source_path_str}"))?;
        let values = match self.jq_expr.as_ref() {
            None => vec![json_value],
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                format!("failed to apply jq expression to source file {source_path_str}")
            })?,
        };
        let Some(pointer) = self.json_pointer.as_ref() else {
            return Ok(values);
        };
        values
            .into_iter()
            .map(|value| {
                value.pointer(pointer).cloned().ok_or_else(|| {
                    anyhow!("{source_path_str}: JSON pointer {pointer} selects nothing")
                })
            })
            .collect()
    }
}

impl GenerateOut {
    fn config(&self) -> Result<GenerationConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => GenerationConfig::load(path)?,
            None => GenerationConfig::default(),
        };
        if self.no_pattern_properties {
            config.include_pattern_properties = false;
        }
        if self.no_additional_properties {
            config.include_additional_properties = false;
        }
        Ok(config)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // 1) settings & inputs
                let registry = Registry::new(target.config()?);
                let documents = target.input_settings.load_documents()?;

                // 2) generate, one arena per document
                let results = generate_all(&registry, &documents);

                // 3) report
                let mut reports = Vec::with_capacity(results.len());
                let mut failed = 0usize;
                for (doc, result) in documents.iter().zip(results) {
                    match result {
                        Ok(model) => {
                            eprintln!("{} {}", "✅".green(), doc.name());
                            reports.push(model.report());
                        }
                        Err(error) => {
                            failed += 1;
                            warn!(document = doc.name(), %error, "document skipped");
                            eprintln!("{} {}: {error}", "❌".red(), doc.name());
                        }
                    }
                }
                let report_src = serde_json::to_string_pretty(&reports)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &report_src)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{report_src}"),
                }
                if failed > 0 {
                    bail!("{failed} of {} documents failed", documents.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn document_name(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    // `pet.schema.json` → `pet`
    match stem.split_once('.') {
        Some((head, _)) if !head.is_empty() => head.to_string(),
        _ => stem,
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
