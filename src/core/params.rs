//! Call-time arguments of a generated operation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Arguments passed to an operation and forwarded to its request function.
///
/// Absent or `null` sub-fields are each defaulted to `{}`.
///
/// # Example
///
/// ```rust
/// use resource_store::core::ActionParams;
/// use serde_json::json;
///
/// let params: ActionParams = serde_json::from_value(json!({ "params": { "id": 1 } })).unwrap();
/// assert_eq!(params.params, json!({ "id": 1 }));
/// assert_eq!(params.data, json!({}));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default = "empty_object")]
    pub params: Value,
    #[serde(default = "empty_object")]
    pub data: Value,
}

impl Default for ActionParams {
    fn default() -> Self {
        Self {
            params: empty_object(),
            data: empty_object(),
        }
    }
}

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Replace `null` sub-fields with `{}`.
    pub fn normalized(mut self) -> Self {
        if self.params.is_null() {
            self.params = empty_object();
        }
        if self.data.is_null() {
            self.data = empty_object();
        }
        self
    }

    /// Normalize optional call-time arguments.
    pub fn resolve(params: Option<ActionParams>) -> Self {
        params.unwrap_or_default().normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_arguments_default_to_empty_objects() {
        let params = ActionParams::resolve(None);
        assert_eq!(params.params, json!({}));
        assert_eq!(params.data, json!({}));
    }

    #[test]
    fn null_sub_fields_are_defaulted_independently() {
        let params = ActionParams::resolve(Some(ActionParams {
            params: json!({ "id": 3 }),
            data: Value::Null,
        }));

        assert_eq!(params.params, json!({ "id": 3 }));
        assert_eq!(params.data, json!({}));
    }

    #[test]
    fn explicit_values_survive_normalization() {
        let params = ActionParams::new()
            .with_params(json!({ "page": 2 }))
            .with_data(json!([1, 2, 3]))
            .normalized();

        assert_eq!(params.params, json!({ "page": 2 }));
        assert_eq!(params.data, json!([1, 2, 3]));
    }

    #[test]
    fn deserializing_null_keeps_null_until_normalized() {
        let params: ActionParams =
            serde_json::from_value(json!({ "params": null, "data": { "a": 1 } })).unwrap();
        assert!(params.params.is_null());

        let params = params.normalized();
        assert_eq!(params.params, json!({}));
        assert_eq!(params.data, json!({ "a": 1 }));
    }
}
