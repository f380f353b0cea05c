//! Offline instruction assembly from a saved request.

use std::path::Path;

use crate::domain::{AppError, GenerationRequest, InstructionSettings, assemble_instruction};

/// Read a JSON [`GenerationRequest`] and assemble its instruction. No network.
pub fn assemble_from_file(path: &Path, settings: &InstructionSettings) -> Result<String, AppError> {
    let content = std::fs::read_to_string(path)?;
    let request: GenerationRequest =
        serde_json::from_str(&content).map_err(|e| AppError::ParseError {
            what: path.display().to_string(),
            details: e.to_string(),
        })?;
    Ok(assemble_instruction(&request, settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{
                "teacher_name": "Ana",
                "context": {"institution_name": "Escuela 9", "level": "initial", "context_tag": "rural"},
                "task": {"mode": "adapt", "fields": {"activity": "Sing the days of the week"}}
            }"#,
        )
        .unwrap();

        let instruction = assemble_from_file(&path, &InstructionSettings::default()).unwrap();

        assert!(instruction.contains("Sing the days of the week"));
        assert!(instruction.contains("Escuela 9"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = assemble_from_file(&path, &InstructionSettings::default()).unwrap_err();
        assert!(matches!(err, AppError::ParseError { .. }));
    }
}
