//! Spinal scene core (engine-agnostic)
//!
//! Loads a skeletal 2D scene document (bones, slotted mesh attachments,
//! keyframed animation tracks) into a fully resolved in-memory scene:
//! world and inverse-world transforms computed for every bone, vertex data
//! projected into world space, skins assembled in draw order, and raw
//! animation key data with optional cubic curve control points.
//!
//! The crate consumes an already parsed [`serde_json::Value`] tree (see
//! [`scene::load_scene`]) or raw JSON text ([`scene::parse_scene_json`]).
//! It does no file I/O, no playback, and no rendering; adapters own those.

pub mod animation;
pub mod document;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod skeleton;
pub mod slots;
pub mod transform;

// Re-exports for consumers (adapters)
pub use animation::{Animation, AnimationCurve, AnimationKey, AnimationTrack, TrackProperty};
pub use error::LoadError;
pub use mesh::{Mesh, Slot, INFLUENCES_PER_VERTEX, VERTEX_STRIDE};
pub use scene::{load_scene, parse_scene_json, Scene};
pub use skeleton::Bone;
pub use transform::Transform;
