use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

/// Input documents are saved e-mails or HTML exports.
pub const INPUT_EXTENSIONS: &[&str] = &["html", "htm", "txt"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[&str],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        let extension = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension {
            Some(extension) if allowed_set.contains(extension.as_str()) => {}
            Some(extension) => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.to_string(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.to_string(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Path checks shared by every config flavour.
pub fn validate_io_paths(input_path: &str, output_path: &str) -> Result<()> {
    validate_path("input_path", input_path)?;
    validate_file_extensions("input_path", &[input_path], INPUT_EXTENSIONS)?;
    validate_path("output_path", output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input_path", "order.html").is_ok());
        assert!(validate_path("input_path", "").is_err());
        assert!(validate_path("input_path", "bad\0path.html").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        assert!(validate_file_extensions("input_path", &["mail.html", "MAIL.HTM"], INPUT_EXTENSIONS).is_ok());
        assert!(validate_file_extensions("input_path", &["dump.txt"], INPUT_EXTENSIONS).is_ok());
        assert!(validate_file_extensions("input_path", &["order.json"], INPUT_EXTENSIONS).is_err());
        assert!(validate_file_extensions("input_path", &["order"], INPUT_EXTENSIONS).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("pipeline.name", "orders").is_ok());
        assert!(validate_non_empty_string("pipeline.name", "   ").is_err());
    }

    #[test]
    fn test_validate_io_paths() {
        assert!(validate_io_paths("in/order.html", "out/result.json").is_ok());
        assert!(validate_io_paths("in/order.pdf", "out/result.json").is_err());
        assert!(validate_io_paths("in/order.html", "").is_err());
    }
}
