use std::path::Path;

use tracing::info;

use crate::config::parameters::ParameterSet;
use crate::data::records::read_file;
use crate::error::LoadError;
use crate::utils::logging::{self, FileIOSubcategory, OperationCategory};

/// Parses and validates a parameter set from JSON text.
pub fn parse_parameters(json: &str) -> Result<ParameterSet, LoadError> {
    let parameters: ParameterSet = serde_json::from_str(json)?;
    parameters.validate()?;
    Ok(parameters)
}

pub fn load_parameters(path: impl AsRef<Path>) -> Result<ParameterSet, LoadError> {
    let _timing = logging::start_timing(
        "load_parameters",
        OperationCategory::FileIO {
            subcategory: FileIOSubcategory::ParameterLoad,
        },
    );
    let path = path.as_ref();
    let parameters = parse_parameters(&read_file(path)?)?;
    info!(
        path = %path.display(),
        countries = parameters.countries.len(),
        "Loaded reference parameters"
    );
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameters::fixtures::parameter_set;

    #[test]
    fn test_parse_valid_document() {
        let json = serde_json::to_string(&parameter_set()).unwrap();
        let parsed = parse_parameters(&json).unwrap();
        assert!(parsed.countries.contains_key("DE"));
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        let mut params = parameter_set();
        params.pipeline.tiers.large.min_flow = 1.0;
        let json = serde_json::to_string(&params).unwrap();
        assert!(matches!(parse_parameters(&json), Err(LoadError::Parameter(_))));
        assert!(matches!(parse_parameters("{"), Err(LoadError::Json(_))));
    }
}
