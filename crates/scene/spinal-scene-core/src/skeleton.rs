//! Bone arena and world-transform resolution.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{bool_or, opt_str, require_str, transform_of};
use crate::error::LoadError;
use crate::transform::Transform;

/// A node in the skeletal hierarchy.
///
/// Bones live in the scene's arena in document order and are never mutated
/// after creation. `parent` is an index into that arena and always refers to
/// an earlier entry, so a single forward pass resolves every world transform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Position in the arena; skinned-mesh influence data references bones by
    /// this same numbering.
    pub index: usize,
    pub parent: Option<usize>,
    /// When false, the world scale stays the bone's own local scale no matter
    /// what the ancestors contribute.
    pub inherit_scale: bool,
    pub local: Transform,
    pub world: Transform,
    pub inv_world: Transform,
}

/// Read one bone record and append it to the arena.
pub fn load_bone(
    node: &Value,
    bones: &mut Vec<Bone>,
    by_name: &mut HashMap<String, usize>,
) -> Result<(), LoadError> {
    let name = require_str(node, "name", "bone")?;
    let inherit_scale = bool_or(node, "inheritScale", true);
    let local = transform_of(node);
    let index = bones.len();

    let (parent, world) = match opt_str(node, "parent") {
        Some(parent_name) => {
            let parent = *by_name
                .get(parent_name)
                .ok_or_else(|| LoadError::UnresolvedParent(parent_name.to_string()))?;
            let mut world = bones[parent].world.compose(&local);
            if !inherit_scale {
                // rotation and position keep the composed values
                world.scale = local.scale;
            }
            (Some(parent), world)
        }
        None => (None, local),
    };

    let inv_world = world.try_inverse().ok_or_else(|| {
        LoadError::MalformedDocument(format!(
            "bone '{name}' has a degenerate scale and no invertible world transform"
        ))
    })?;

    by_name.insert(name.to_string(), index);
    bones.push(Bone {
        name: name.to_string(),
        index,
        parent,
        inherit_scale,
        local,
        world,
        inv_world,
    });
    Ok(())
}
