pub mod file;
pub mod stdin;

use finratio_core::ratios::RatioInput;
use finratio_core::{EngineConfig, StatementRecord};
use serde_json::Value;

/// Load a statement batch from `--input` or piped stdin.
pub fn load_ratio_input(path: Option<&str>) -> Result<RatioInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_statements(path);
    }
    match stdin::read_stdin()? {
        Some(value) => ratio_input_from_value(value),
        None => Err("--input <file.json|.yaml|.csv> or JSON on stdin required".into()),
    }
}

/// Accept either a bare array of statements or a `{statements, config}` document.
pub fn ratio_input_from_value(value: Value) -> Result<RatioInput, Box<dyn std::error::Error>> {
    match value {
        Value::Array(_) => {
            let statements: Vec<StatementRecord> = serde_json::from_value(value)?;
            Ok(RatioInput {
                statements,
                config: EngineConfig::default(),
            })
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_gets_default_config() {
        let input = ratio_input_from_value(json!([
            {"entity_id": "ACME", "fiscal_year": 2023, "revenue": 10}
        ]))
        .unwrap();
        assert_eq!(input.statements.len(), 1);
        assert_eq!(input.config, EngineConfig::default());
    }

    #[test]
    fn test_document_carries_config() {
        let input = ratio_input_from_value(json!({
            "statements": [],
            "config": {"days_in_period": 360}
        }))
        .unwrap();
        assert_eq!(input.config.days_in_period, 360);
    }
}
