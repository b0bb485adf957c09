//! Typed access with defaults over the generic document tree.
//!
//! The core never touches raw bytes: the embedder hands over an already
//! materialized [`serde_json::Value`] and everything below reads it through
//! these getters. Optional fields fall back to the format's defaults;
//! required fields surface [`LoadError::MalformedDocument`] naming the field
//! and the node it was expected on.

use glam::{Quat, Vec3};
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::transform::Transform;

pub fn require<'a>(node: &'a Value, key: &str, context: &str) -> Result<&'a Value, LoadError> {
    node.get(key).ok_or_else(|| {
        LoadError::MalformedDocument(format!("missing field '{key}' in {context}"))
    })
}

pub fn require_str<'a>(
    node: &'a Value,
    key: &str,
    context: &str,
) -> Result<&'a str, LoadError> {
    require(node, key, context)?.as_str().ok_or_else(|| {
        LoadError::MalformedDocument(format!("field '{key}' in {context} is not a string"))
    })
}

pub fn require_f32(node: &Value, key: &str, context: &str) -> Result<f32, LoadError> {
    require(node, key, context)?
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| {
            LoadError::MalformedDocument(format!("field '{key}' in {context} is not a number"))
        })
}

pub fn require_usize(node: &Value, key: &str, context: &str) -> Result<usize, LoadError> {
    require(node, key, context)?
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| {
            LoadError::MalformedDocument(format!(
                "field '{key}' in {context} is not a non-negative integer"
            ))
        })
}

pub fn require_array<'a>(
    node: &'a Value,
    key: &str,
    context: &str,
) -> Result<&'a Vec<Value>, LoadError> {
    require(node, key, context)?.as_array().ok_or_else(|| {
        LoadError::MalformedDocument(format!("field '{key}' in {context} is not an array"))
    })
}

pub fn require_object<'a>(
    node: &'a Value,
    key: &str,
    context: &str,
) -> Result<&'a Map<String, Value>, LoadError> {
    require(node, key, context)?.as_object().ok_or_else(|| {
        LoadError::MalformedDocument(format!("field '{key}' in {context} is not an object"))
    })
}

pub fn as_object<'a>(
    node: &'a Value,
    context: &str,
) -> Result<&'a Map<String, Value>, LoadError> {
    node.as_object()
        .ok_or_else(|| LoadError::MalformedDocument(format!("{context} is not an object")))
}

pub fn opt_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str)
}

pub fn f32_or(node: &Value, key: &str, default: f32) -> f32 {
    node.get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

pub fn str_or<'a>(node: &'a Value, key: &str, default: &'a str) -> &'a str {
    opt_str(node, key).unwrap_or(default)
}

pub fn bool_or(node: &Value, key: &str, default: bool) -> bool {
    node.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Flat numeric array field. Vertices, UVs and triangle indices are all
/// stored flat in the document.
pub fn numbers(node: &Value, key: &str, context: &str) -> Result<Vec<f64>, LoadError> {
    require_array(node, key, context)?
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                LoadError::MalformedDocument(format!(
                    "field '{key}' in {context} contains a non-numeric entry"
                ))
            })
        })
        .collect()
}

/// Local transform of a bone or attachment node: x/y/rotation/scaleX/scaleY
/// with the format's defaults. z and the scale z component are pinned to the
/// planar values.
pub fn transform_of(node: &Value) -> Transform {
    let mut t = Transform {
        position: Vec3::new(f32_or(node, "x", 0.0), f32_or(node, "y", 0.0), 0.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::new(
            f32_or(node, "scaleX", 1.0),
            f32_or(node, "scaleY", 1.0),
            1.0,
        ),
    };
    t.set_rotation_z_deg(f32_or(node, "rotation", 0.0));
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_fields_absent() {
        let node = json!({});
        assert_eq!(f32_or(&node, "x", 0.0), 0.0);
        assert_eq!(f32_or(&node, "scaleX", 1.0), 1.0);
        assert!(bool_or(&node, "inheritScale", true));
        let t = transform_of(&node);
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn required_fields_name_the_context() {
        let node = json!({});
        let err = require_str(&node, "name", "bone").unwrap_err();
        assert!(err.to_string().contains("'name'"));
        assert!(err.to_string().contains("bone"));
    }

    #[test]
    fn numbers_rejects_mixed_arrays() {
        let node = json!({ "vertices": [1.0, "x", 3.0] });
        assert!(numbers(&node, "vertices", "attachment 'a'").is_err());
    }
}
