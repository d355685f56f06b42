//! Projection of an endpoint's parameters and JSON request body into a tool input schema.
//!
//! Only type names and (shortened) descriptions survive; nested schemas, formats and enums are
//! dropped. `required` may list a name twice when it is required both as a parameter and in the
//! body schema. Consumers treat it as a set.

use crate::catalog::{OperationSpec, PropertySpec, SchemaType};
use crate::naming::truncate_chars;
use rmcp::model::JsonObject;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const PROPERTY_DESCRIPTION_MAX: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputSchema {
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    pub description: String,
}

impl PropertySchema {
    fn project(schema: Option<&PropertySpec>, description: Option<&str>) -> Self {
        Self {
            kind: schema.and_then(|s| s.kind.clone()).unwrap_or_default(),
            description: truncate_chars(description.unwrap_or_default(), PROPERTY_DESCRIPTION_MAX)
                .to_string(),
        }
    }
}

impl InputSchema {
    /// JSON Schema object as advertised in `tools/list`.
    #[must_use]
    pub fn to_json_object(&self) -> JsonObject {
        let properties = serde_json::to_value(&self.properties).unwrap_or_else(|_| json!({}));
        let mut obj = JsonObject::new();
        obj.insert("type".to_string(), json!("object"));
        obj.insert("properties".to_string(), properties);
        obj.insert(
            "required".to_string(),
            Value::Array(self.required.iter().cloned().map(Value::String).collect()),
        );
        obj
    }
}

/// Build the input schema for one operation.
#[must_use]
pub fn project_input_schema(op: &OperationSpec) -> InputSchema {
    let mut schema = InputSchema::default();

    for param in &op.parameters {
        schema.properties.insert(
            param.name.clone(),
            PropertySchema::project(param.schema.as_ref(), param.description.as_deref()),
        );
        if param.required {
            schema.required.push(param.name.clone());
        }
    }

    if let Some(body) = op.request_body.as_ref().and_then(|b| b.json_schema()) {
        // Body properties overwrite same-named parameters.
        for (name, prop) in &body.properties {
            schema.properties.insert(
                name.clone(),
                PropertySchema::project(Some(prop), prop.description.as_deref()),
            );
        }
        schema.required.extend(body.required.iter().cloned());
    }

    schema
}
