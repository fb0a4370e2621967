//! Loading typology and input documents from JSON files.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{QuoteError, Result};
use crate::model::{Typology, VariableInput};

/// Load a typology document.
pub fn load_typology(path: &Path) -> Result<Typology> {
    let typology: Typology = load_document(path)?;
    tracing::debug!(
        "Loaded typology '{}': {} variable(s), {} piece(s), {} material(s)",
        typology.name,
        typology.variables.len(),
        typology.pieces.len(),
        typology.materials.len()
    );
    Ok(typology)
}

/// Load a list of variable inputs.
pub fn load_inputs(path: &Path) -> Result<Vec<VariableInput>> {
    load_document(path)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(QuoteError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Err(QuoteError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_str(&content).map_err(|source| QuoteError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_load_typology() {
        let file = write_temp(
            r#"{
                "name": "Box",
                "variables": [{"name": "L", "default_unit": "cm"}],
                "pieces": [{"name": "Vidro", "width_formula": "L", "height_formula": "1900"}]
            }"#,
        );
        let typology = load_typology(file.path()).unwrap();
        assert_eq!(typology.name, "Box");
        assert_eq!(typology.pieces[0].height_formula, "1900");
        assert!(typology.materials.is_empty());
    }

    #[test]
    fn test_load_inputs() {
        let file = write_temp(r#"[{"name": "L", "value": "120", "unit": "cm"}]"#);
        let inputs = load_inputs(file.path()).unwrap();
        assert_eq!(inputs[0].value, Some(120.0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_typology(Path::new("/nonexistent/typology.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);
    }

    #[test]
    fn test_load_empty_file() {
        let file = write_temp("   \n");
        let err = load_inputs(file.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyFile);
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_temp(r#"{"name": "Box", "pieces": [}"#);
        let err = load_typology(file.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError);
    }
}
