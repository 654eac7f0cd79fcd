//! Output schemas for structured generation, derived from the Rust types.
//!
//! Every structured answer type derives [`JsonSchema`]; its doc comments
//! become the field descriptions the model sees. Subschemas are inlined
//! because none of the providers resolve `$ref`.

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;

/// JSON Schema for `T`, self-contained and without a meta-schema link.
pub fn output_schema<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft2020_12()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let mut schema = generator.into_root_schema_for::<T>().to_value();
    if let Some(root) = schema.as_object_mut() {
        root.remove("title");
    }
    schema
}

/// Replace the description found at a JSON pointer, if the node exists.
pub fn describe(schema: &mut Value, pointer: &str, description: impl Into<String>) {
    if let Some(Value::Object(node)) = schema.pointer_mut(pointer) {
        node.insert("description".to_string(), Value::String(description.into()));
    }
}
