//! Product Model
//!
//! Products are edited as loosely typed field maps (see the editor's form
//! state); only the outgoing payload and the assistant request have a fixed
//! wire shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier field present only on products that already exist
pub const PRODUCT_ID_FIELD: &str = "_id";

/// Product status values offered by the admin form
pub const PRODUCT_STATUSES: &[&str] = &["active", "inactive"];

/// Create/update product payload
///
/// Field names follow the catalog API (`title`, `categoryId`, `price`,
/// `discountPrice`, `stock`, `status`, `thumbnail`, `tags`, `sizes`,
/// `colors`, ...). List fields are already reshaped into arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductPayload(pub Map<String, Value>);

impl ProductPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String list stored under `field` (empty if absent or not a list)
    pub fn string_list(&self, field: &str) -> Vec<String> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Context sent to the description generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionRequest {
    pub title: Option<String>,
    /// Display name of the selected category
    pub category: String,
    /// Raw comma-separated tags as typed in the form
    pub tags: Option<String>,
    pub brand: Option<String>,
}
