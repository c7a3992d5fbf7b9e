use crate::error::ValidationError;
use crate::files::compile_pattern;
use crate::geotag::is_geotag_valid;
use crate::models::RunParameters;

/// Pre-flight checks. Every check runs so all problems can be shown at once;
/// an empty list means generation may start.
pub fn check_parameters(params: &RunParameters) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !params.dir_name.is_dir() {
        errors.push(ValidationError::MissingDirectory(params.dir_name.clone()));
    }
    if !params.desc_file.exists() {
        errors.push(ValidationError::MissingDescriptionFile(params.desc_file.clone()));
    }
    if params.tags.is_empty() {
        errors.push(ValidationError::MissingTags);
    }
    if !is_geotag_valid(&params.geotag) {
        errors.push(ValidationError::InvalidGeotag(params.geotag.clone()));
    }
    if let Err(e) = compile_pattern(&params.pattern) {
        errors.push(ValidationError::InvalidPattern {
            pattern: params.pattern.clone(),
            reason: e.to_string(),
        });
    }
    errors
}

pub fn validate(params: &RunParameters) -> Result<(), Vec<ValidationError>> {
    let errors = check_parameters(params);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
