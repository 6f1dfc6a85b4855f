//! Input validation against a tool's declared JSON schema
//!
//! The executor runs this before dispatching to the tool, so every tool
//! sees input that already satisfies its schema: required fields present,
//! types matching, enum values in range, numeric bounds respected.

use serde_json::Value;
use tracing::debug;

/// Validate a named-argument bundle against a JSON schema
///
/// Supports the subset of JSON Schema the builtin tools declare:
/// `required`, per-property `type`, `enum`, `minimum` and `maximum`.
/// Returns the first violation as a message.
pub fn validate_input(schema: &Value, input: &Value) -> Result<(), String> {
    debug!("validate_input: called");

    let Some(obj) = input.as_object() else {
        return Err("tool input must be a JSON object".to_string());
    };

    if let Some(required) = schema["required"].as_array() {
        for field in required.iter().filter_map(|f| f.as_str()) {
            if !obj.contains_key(field) {
                return Err(format!("missing required field '{}'", field));
            }
        }
    }

    let Some(properties) = schema["properties"].as_object() else {
        return Ok(());
    };

    for (name, spec) in properties {
        let Some(value) = obj.get(name) else { continue };

        if value.is_null() {
            continue;
        }

        if let Some(expected) = spec["type"].as_str()
            && !type_matches(expected, value)
        {
            return Err(format!("field '{}' must be of type {}", name, expected));
        }

        if let Some(allowed) = spec["enum"].as_array()
            && !allowed.contains(value)
        {
            let options: Vec<String> = allowed.iter().map(value_label).collect();
            return Err(format!("field '{}' must be one of: {}", name, options.join(", ")));
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = spec["minimum"].as_f64()
                && number < min
            {
                return Err(format!("field '{}' must be >= {}", name, min));
            }
            if let Some(max) = spec["maximum"].as_f64()
                && number > max
            {
                return Err(format!("field '{}' must be <= {}", name, max));
            }
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
