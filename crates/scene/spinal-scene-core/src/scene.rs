//! The loaded scene and the whole-document load pass.

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::animation::{self, Animation};
use crate::document::{require_array, require_object};
use crate::error::LoadError;
use crate::mesh::Mesh;
use crate::skeleton::{self, Bone};
use crate::slots;

/// A fully resolved scene: bones with world transforms, world-space meshes
/// per skin, and raw animation tracks.
///
/// The load either returns a complete scene or fails; nothing partial is
/// ever observable. The scene owns every sub-entity; bones are referenced by
/// arena index from meshes and tracks, never by pointer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Bones in document order. The position in this list is the bone index
    /// used by skinned meshes and animation tracks.
    pub bones: Vec<Bone>,
    pub bones_by_name: HashMap<String, usize>,
    /// Meshes of the `"default"` skin, in draw order.
    pub meshes: Vec<Mesh>,
    /// Every other skin, by name.
    pub skins: HashMap<String, Vec<Mesh>>,
    pub animations: HashMap<String, Animation>,
}

impl Scene {
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones_by_name.get(name).map(|&index| &self.bones[index])
    }

    pub fn bone_at(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }
}

/// Parse a JSON scene document and load it.
///
/// Convenience wrapper over [`load_scene`] for embedders that hold the raw
/// text; deserializer failures surface as the same load error as any other
/// malformed document.
pub fn parse_scene_json(text: &str) -> Result<Scene, LoadError> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| LoadError::MalformedDocument(format!("json parse error: {e}")))?;
    load_scene(&doc)
}

/// Materialize a scene from an already parsed document tree.
///
/// One synchronous pass: bones first, then slots and skins (their meshes
/// need the resolved world transforms), then animations (which reference
/// bones by name only).
pub fn load_scene(doc: &Value) -> Result<Scene, LoadError> {
    let mut builder = SceneBuilder::default();
    builder.load(doc)?;
    Ok(builder.finish())
}

/// Mutable accumulator for the single load pass. Local to [`load_scene`]:
/// frozen into a [`Scene`] on success, dropped on failure.
#[derive(Default)]
struct SceneBuilder {
    bones: Vec<Bone>,
    bones_by_name: HashMap<String, usize>,
    meshes: Vec<Mesh>,
    skins: HashMap<String, Vec<Mesh>>,
    animations: HashMap<String, Animation>,
}

impl SceneBuilder {
    fn load(&mut self, doc: &Value) -> Result<(), LoadError> {
        for node in require_array(doc, "bones", "document")? {
            skeleton::load_bone(node, &mut self.bones, &mut self.bones_by_name)?;
        }
        debug!("skeleton resolved: {} bones", self.bones.len());

        let slots = slots::load_slots(doc, &self.bones_by_name)?;
        let (meshes, skins) = slots::load_skins(doc, &self.bones, &slots)?;
        self.meshes = meshes;
        self.skins = skins;
        debug!(
            "skins resolved: {} default meshes, {} named skins",
            self.meshes.len(),
            self.skins.len()
        );

        for (name, node) in require_object(doc, "animations", "document")? {
            let animation = animation::load_animation(name, node, &self.bones_by_name)?;
            self.animations.insert(name.clone(), animation);
        }
        debug!("animations resolved: {}", self.animations.len());
        Ok(())
    }

    fn finish(self) -> Scene {
        Scene {
            bones: self.bones,
            bones_by_name: self.bones_by_name,
            meshes: self.meshes,
            skins: self.skins,
            animations: self.animations,
        }
    }
}
