//! JSON Schema validation for model responses.
//!
//! A parsed model response must be an object carrying an `enhanced_columns`
//! array whose entries are objects. Anything else is structurally
//! incompatible and is never retried. Field values are not typed here: the
//! merge step coerces or defaults whatever an entry carries.
//!
//! # Example
//! ```rust
//! use schemalift_core::validation::validate_response_shape;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let response = json!({
//!     "enhanced_columns": [
//!         { "original_name": "CUST_ID", "suggested_name": "customer_id" }
//!     ]
//! });
//!
//! let columns = validate_response_shape(&response)?;
//! assert_eq!(columns.len(), 1);
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Response shape validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// The response does not match the expected shape
    #[error("Response validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },
}

/// Key of the top-level array every response must carry.
pub const ENHANCED_COLUMNS_KEY: &str = "enhanced_columns";

/// Embedded JSON Schema for model responses
const RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "SchemaLift Enrichment Response",
  "type": "object",
  "required": ["enhanced_columns"],
  "properties": {
    "enhanced_columns": {
      "type": "array",
      "items": { "type": "object" }
    }
  }
}"#;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Initialize and compile the response JSON Schema.
///
/// Calling this more than once is harmless; validation initializes lazily if
/// it was never called.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_response_validator() -> Result<(), ValidationError> {
    compiled_validator().map(|_| ())
}

fn compiled_validator() -> Result<&'static Validator, ValidationError> {
    if let Some(validator) = COMPILED_SCHEMA.get() {
        return Ok(validator);
    }

    let schema_json: Value =
        serde_json::from_str(RESPONSE_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    // Another thread may have won the race; either copy is equivalent
    let _ = COMPILED_SCHEMA.set(compiled);

    COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Response validator unavailable after initialization".to_string(),
        })
}

/// Validates a parsed response and returns its `enhanced_columns` entries.
///
/// # Errors
/// Returns `ValidationError::ValidationFailed` listing every violation when
/// the response is not an object with an `enhanced_columns` array of objects.
pub fn validate_response_shape(response: &Value) -> Result<&[Value], ValidationError> {
    let validator = compiled_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(response)
        .map(|error| error.to_string())
        .collect();

    if !errors.is_empty() {
        return Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        });
    }

    response
        .get(ENHANCED_COLUMNS_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ValidationError::ValidationFailed {
            error_count: 1,
            errors: vec![format!("Missing required array '{}'", ENHANCED_COLUMNS_KEY)],
        })
}
