//! Keyframed animation tracks.
//!
//! Tracks are loaded as raw data: key times, values and optional cubic
//! curve control points. Nothing here evaluates or interpolates them; that
//! is the runtime's job.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{as_object, f32_or, require_f32, require_object};
use crate::error::LoadError;

/// Bone property a track animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackProperty {
    Position,
    Rotation,
    Scale,
}

impl TrackProperty {
    pub(crate) fn parse(name: &str) -> Result<Self, LoadError> {
        match name {
            "translate" => Ok(Self::Position),
            "rotate" => Ok(Self::Rotation),
            "scale" => Ok(Self::Scale),
            other => Err(LoadError::UnknownProperty(other.to_string())),
        }
    }
}

/// Cubic Bezier control points, stored verbatim from the document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// One keyframe. `value` carries x/y for Position and Scale tracks and a
/// single angle in degrees for Rotation tracks. A key without a curve is
/// interpolated linearly (or stepped) by the runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationKey {
    pub time: f32,
    pub value: Vec<f32>,
    pub curve: Option<AnimationCurve>,
}

/// Keys for one property of one bone, in document order, which is not
/// necessarily sorted by time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationTrack {
    /// Index of the animated bone in the scene's arena.
    pub bone: usize,
    pub property: TrackProperty,
    pub keys: Vec<AnimationKey>,
}

/// A named clip: tracks in document traversal order (bones outer, properties
/// inner) and the running maximum of all key times as its duration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<AnimationTrack>,
}

pub fn load_animation(
    name: &str,
    node: &Value,
    bones_by_name: &HashMap<String, usize>,
) -> Result<Animation, LoadError> {
    let mut animation = Animation {
        name: name.to_string(),
        duration: 0.0,
        tracks: Vec::new(),
    };

    let context = format!("animation '{name}'");
    for (bone_name, bone_node) in require_object(node, "bones", &context)? {
        let bone = *bones_by_name
            .get(bone_name)
            .ok_or_else(|| LoadError::UnresolvedBone {
                bone: bone_name.clone(),
                referrer: context.clone(),
            })?;
        for (property_name, keys_node) in as_object(bone_node, &context)? {
            let property = TrackProperty::parse(property_name)?;
            let mut track = AnimationTrack {
                bone,
                property,
                keys: Vec::new(),
            };
            let keys = keys_node.as_array().ok_or_else(|| {
                LoadError::MalformedDocument(format!(
                    "track '{property_name}' of bone '{bone_name}' in {context} is not an array"
                ))
            })?;
            for key_node in keys {
                let time = require_f32(key_node, "time", &context)?;
                animation.duration = animation.duration.max(time);
                let value = match property {
                    TrackProperty::Position => {
                        vec![f32_or(key_node, "x", 0.0), f32_or(key_node, "y", 0.0)]
                    }
                    TrackProperty::Rotation => vec![f32_or(key_node, "angle", 0.0)],
                    // absent scale components default to 0, not 1
                    TrackProperty::Scale => {
                        vec![f32_or(key_node, "x", 0.0), f32_or(key_node, "y", 0.0)]
                    }
                };
                track.keys.push(AnimationKey {
                    time,
                    value,
                    curve: curve_of(key_node),
                });
            }
            animation.tracks.push(track);
        }
    }

    Ok(animation)
}

/// Curve control points when the key carries an array of exactly four
/// numbers. Anything else (absent, a "stepped" marker string, the wrong
/// arity) leaves the key without a curve.
fn curve_of(key_node: &Value) -> Option<AnimationCurve> {
    let arr = key_node.get("curve")?.as_array()?;
    if arr.len() != 4 {
        return None;
    }
    let mut c = [0.0f32; 4];
    for (slot, v) in c.iter_mut().zip(arr) {
        *slot = v.as_f64()? as f32;
    }
    Some(AnimationCurve {
        x0: c[0],
        y0: c[1],
        x1: c[2],
        y1: c[3],
    })
}
