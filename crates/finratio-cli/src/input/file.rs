use finratio_core::ratios::RatioInput;
use finratio_core::{EngineConfig, StatementRecord};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a statement batch, choosing the parser by file extension.
///
/// `.json` may hold a bare array or a `{statements, config}` document,
/// `.yaml`/`.yml` the same shapes, and `.csv` one statement per row.
pub fn read_statements(path: &str) -> Result<RatioInput, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let extension = canonical
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            let statements = read_csv(&canonical)?;
            Ok(RatioInput {
                statements,
                config: EngineConfig::default(),
            })
        }
        "yaml" | "yml" => {
            let contents = read_to_string(&canonical)?;
            let value: Value = serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
            super::ratio_input_from_value(value)
        }
        _ => {
            let contents = read_to_string(&canonical)?;
            let value: Value = serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
            super::ratio_input_from_value(value)
        }
    }
}

fn read_csv(path: &Path) -> Result<Vec<StatementRecord>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let mut statements = Vec::new();
    for (row, record) in reader.deserialize::<StatementRecord>().enumerate() {
        let statement =
            record.map_err(|e| format!("Failed to parse '{}' row {}: {}", path.display(), row + 1, e))?;
        statements.push(statement);
    }
    Ok(statements)
}

fn read_to_string(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
