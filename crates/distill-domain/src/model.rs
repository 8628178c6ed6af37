//! Model specs - the schema an extracted record must satisfy

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared extraction schema
///
/// Names the model class and the top-level fields a returned JSON object must
/// carry. Validation is structural: the record must be a JSON object and every
/// required field must be present and non-null. Anything beyond that is the
/// extraction function's business.
///
/// # Examples
///
/// ```
/// use distill_domain::ModelSpec;
/// use serde_json::json;
///
/// let spec = ModelSpec::new("ReviewedOpportunity")
///     .with_required_fields(["title", "customer"]);
///
/// assert!(spec.validate(&json!({"title": "T", "customer": "C"})).is_ok());
/// assert!(spec.validate(&json!({"title": "T"})).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model class name (also part of the cache key)
    pub name: String,

    /// Top-level fields the extracted object must contain
    pub required_fields: Vec<String>,
}

impl ModelSpec {
    /// Create a spec with no required fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_fields: Vec::new(),
        }
    }

    /// Set the required top-level fields
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Validate a candidate record against this spec
    ///
    /// Returns a human-readable reason on the first violation found.
    pub fn validate(&self, record: &Value) -> Result<(), String> {
        let object = record
            .as_object()
            .ok_or_else(|| format!("expected a JSON object for '{}'", self.name))?;

        for field in &self.required_fields {
            match object.get(field) {
                None => return Err(format!("missing required field '{}'", field)),
                Some(Value::Null) => {
                    return Err(format!("required field '{}' is null", field));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
