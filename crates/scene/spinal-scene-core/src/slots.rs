//! Slot scan and per-skin mesh assembly.

use hashbrown::HashMap;
use serde_json::Value;

use crate::document::{as_object, opt_str, require_array, require_object, require_str};
use crate::error::LoadError;
use crate::mesh::{load_attachment, Mesh, Slot};
use crate::skeleton::Bone;

/// Scan the document's slot list in order.
///
/// Only slots carrying an `attachment` field are kept, and only those consume
/// a draw-order index.
pub fn load_slots(
    doc: &Value,
    bones_by_name: &HashMap<String, usize>,
) -> Result<HashMap<String, Slot>, LoadError> {
    let mut slots = HashMap::new();
    let mut slot_index = 0usize;
    for node in require_array(doc, "slots", "document")? {
        let attachment = match opt_str(node, "attachment") {
            Some(attachment) => attachment,
            None => continue,
        };
        let name = require_str(node, "name", "slot")?;
        let bone_name = require_str(node, "bone", &format!("slot '{name}'"))?;
        let bone = *bones_by_name.get(bone_name).ok_or_else(|| {
            LoadError::UnresolvedBone {
                bone: bone_name.to_string(),
                referrer: format!("attachment '{attachment}'"),
            }
        })?;
        slots.insert(
            name.to_string(),
            Slot {
                bone,
                index: slot_index,
                attachment: attachment.to_string(),
            },
        );
        slot_index += 1;
    }
    Ok(slots)
}

/// Assemble the mesh list of every skin.
///
/// Returns the `"default"` skin's meshes separately (they become the scene's
/// top-level mesh list) and the remaining skins by name. Meshes within a
/// skin are sorted ascending by slot index, the draw order.
pub fn load_skins(
    doc: &Value,
    bones: &[Bone],
    slots: &HashMap<String, Slot>,
) -> Result<(Vec<Mesh>, HashMap<String, Vec<Mesh>>), LoadError> {
    let mut default_meshes = Vec::new();
    let mut skins = HashMap::new();

    for (skin_name, skin_node) in require_object(doc, "skins", "document")? {
        let mut meshes = Vec::new();
        for (slot_name, slot_node) in as_object(skin_node, &format!("skin '{skin_name}'"))? {
            let slot = slots.get(slot_name).ok_or_else(|| {
                LoadError::MalformedDocument(format!(
                    "skin '{skin_name}' references the slot '{slot_name}' which carries no attachment"
                ))
            })?;
            let entries = as_object(
                slot_node,
                &format!("slot '{slot_name}' of skin '{skin_name}'"),
            )?;
            for (attachment_name, attachment_node) in entries {
                if attachment_name != &slot.attachment {
                    continue;
                }
                if let Some(mesh) = load_attachment(attachment_name, attachment_node, slot, bones)? {
                    meshes.push(mesh);
                }
            }
        }
        meshes.sort_by_key(|mesh| mesh.slot.index);
        if skin_name == "default" {
            default_meshes = meshes;
        } else {
            skins.insert(skin_name.clone(), meshes);
        }
    }

    Ok((default_meshes, skins))
}
