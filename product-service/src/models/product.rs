use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied product attributes. No schema is imposed.
pub type ProductFields = Map<String, Value>;

/// Key under which the store-assigned identifier is serialised.
pub const ID_FIELD: &str = "_id";

/// A stored product: an immutable identifier plus free-form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    /// Builds a product, discarding any `_id` smuggled in through `fields`.
    pub fn new(id: impl Into<String>, mut fields: ProductFields) -> Self {
        fields.remove(ID_FIELD);
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Overwrites the supplied fields, keeping the rest and the identifier.
    pub fn apply(&mut self, fields: ProductFields) {
        for (key, value) in fields {
            if key != ID_FIELD {
                self.fields.insert(key, value);
            }
        }
    }
}
