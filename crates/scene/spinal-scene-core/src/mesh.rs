//! Mesh attachments and their world-space projection.
//!
//! All vertex data leaves this module already expressed in world space: the
//! owning bone's resolved world transform (plus, for regions, the
//! attachment's own local offset) is baked into the positions at load time.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{f32_or, numbers, require_usize, str_or, transform_of};
use crate::error::LoadError;
use crate::skeleton::Bone;

/// Influence slots reserved per skinned vertex.
pub const INFLUENCES_PER_VERTEX: usize = 4;

/// Floats per vertex in the flat layout: x, y, z, u, v.
pub const VERTEX_STRIDE: usize = 5;

/// Draw-order binding of one attachment point to a bone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Slot {
    /// Index of the owning bone in the scene's arena.
    pub bone: usize,
    /// Draw-order index. Counted over attachment-bearing slots only.
    pub index: usize,
    /// Attachment key this slot selects within a skin.
    pub attachment: String,
}

/// Geometry payload bound to a slot.
///
/// `vertices` is flat with [`VERTEX_STRIDE`] floats per vertex.
/// `bone_indices`/`bone_weights` carry [`INFLUENCES_PER_VERTEX`] entries per
/// vertex for skinned meshes and are empty otherwise; unused influence slots
/// hold index 0 with weight 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    /// Attachment key this mesh was built from.
    pub attachment: String,
    /// Display path: the attachment's `name` field when present, else the
    /// attachment key.
    pub path: String,
    pub slot: Slot,
    pub vertices: Vec<f32>,
    pub triangles: Vec<u32>,
    pub bone_indices: Vec<u32>,
    pub bone_weights: Vec<f32>,
}

/// Attachment dispatch tag. Anything unrecognized is skipped during skin
/// assembly instead of failing the load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttachmentKind {
    Region,
    Mesh,
    SkinnedMesh,
    Unsupported,
}

impl AttachmentKind {
    pub(crate) fn parse(tag: &str) -> Self {
        match tag {
            "region" => Self::Region,
            "mesh" => Self::Mesh,
            "skinnedmesh" => Self::SkinnedMesh,
            _ => Self::Unsupported,
        }
    }
}

/// Build the mesh for one skin attachment entry, or `None` for unsupported
/// attachment types.
pub fn load_attachment(
    key: &str,
    node: &Value,
    slot: &Slot,
    bones: &[Bone],
) -> Result<Option<Mesh>, LoadError> {
    let mut mesh = Mesh {
        attachment: key.to_string(),
        path: str_or(node, "name", key).to_string(),
        slot: slot.clone(),
        vertices: Vec::new(),
        triangles: Vec::new(),
        bone_indices: Vec::new(),
        bone_weights: Vec::new(),
    };
    let bone = &bones[slot.bone];
    match AttachmentKind::parse(str_or(node, "type", "region")) {
        AttachmentKind::Region => load_region(node, bone, &mut mesh),
        AttachmentKind::Mesh => load_free_mesh(node, bone, bones, false, &mut mesh)?,
        AttachmentKind::SkinnedMesh => load_free_mesh(node, bone, bones, true, &mut mesh)?,
        AttachmentKind::Unsupported => return Ok(None),
    }
    Ok(Some(mesh))
}

/// Quad of width × height centered on the attachment's local transform,
/// composed onto the bone's world transform.
fn load_region(node: &Value, bone: &Bone, mesh: &mut Mesh) {
    let world = bone.world.compose(&transform_of(node));
    let width = f32_or(node, "width", 0.0);
    let height = f32_or(node, "height", 0.0);

    const BOUNDARY: [f32; 2] = [-0.5, 0.5];
    const UV_BOUNDARY: [f32; 2] = [0.0, 1.0];
    mesh.vertices.reserve(4 * VERTEX_STRIDE);
    // corner order: (-,-), (-,+), (+,-), (+,+)
    for xi in 0..2 {
        for yi in 0..2 {
            let p = world.apply(Vec3::new(
                BOUNDARY[xi] * width,
                BOUNDARY[yi] * height,
                0.0,
            ));
            // v is flipped: the document's image origin is top-left
            mesh.vertices
                .extend_from_slice(&[p.x, p.y, p.z, UV_BOUNDARY[xi], 1.0 - UV_BOUNDARY[yi]]);
        }
    }
    mesh.triangles = vec![0, 1, 2, 2, 1, 3];
}

/// Free-form mesh, optionally skinned. The `vertices` stream is plain x/y
/// pairs when unskinned; when skinned it interleaves an influence count with
/// (bone, x, y, weight) tuples per vertex.
fn load_free_mesh(
    node: &Value,
    bone: &Bone,
    bones: &[Bone],
    skinned: bool,
    mesh: &mut Mesh,
) -> Result<(), LoadError> {
    let context = format!("attachment '{}'", mesh.attachment);
    let vertex_count = require_usize(node, "hull", &context)?;
    let stream = numbers(node, "vertices", &context)?;
    let uvs = numbers(node, "uvs", &context)?;

    mesh.vertices.reserve(vertex_count * VERTEX_STRIDE);
    if skinned {
        mesh.bone_indices = vec![0; vertex_count * INFLUENCES_PER_VERTEX];
        mesh.bone_weights = vec![0.0; vertex_count * INFLUENCES_PER_VERTEX];
    }

    let mut cursor = 0usize;
    for i in 0..vertex_count {
        let (projecting_bone, local) = if skinned {
            let influences = next(&stream, &mut cursor, &context)? as usize;
            if influences == 0 || influences > INFLUENCES_PER_VERTEX {
                return Err(LoadError::MalformedDocument(format!(
                    "vertex {i} of {context} has {influences} bone influences, expected 1 to {INFLUENCES_PER_VERTEX}"
                )));
            }
            let mut first: Option<(usize, Vec3)> = None;
            for slot in 0..influences {
                let bone_index = next(&stream, &mut cursor, &context)?;
                let x = next(&stream, &mut cursor, &context)? as f32;
                let y = next(&stream, &mut cursor, &context)? as f32;
                let weight = next(&stream, &mut cursor, &context)? as f32;
                if bone_index < 0.0 || bone_index as usize >= bones.len() {
                    return Err(LoadError::UnresolvedBone {
                        bone: bone_index.to_string(),
                        referrer: context.clone(),
                    });
                }
                let bone_index = bone_index as usize;
                // only the first influence supplies the reference position;
                // the rest land in the weight arrays
                if first.is_none() {
                    first = Some((bone_index, Vec3::new(x, y, 0.0)));
                }
                mesh.bone_indices[i * INFLUENCES_PER_VERTEX + slot] = bone_index as u32;
                mesh.bone_weights[i * INFLUENCES_PER_VERTEX + slot] = weight;
            }
            let (bone_index, local) = first.ok_or_else(|| {
                LoadError::MalformedDocument(format!(
                    "vertex {i} of {context} has no bone influences"
                ))
            })?;
            (&bones[bone_index], local)
        } else {
            let x = next(&stream, &mut cursor, &context)? as f32;
            let y = next(&stream, &mut cursor, &context)? as f32;
            (bone, Vec3::new(x, y, 0.0))
        };

        let p = projecting_bone.world.apply(local);
        let u = uv(&uvs, 2 * i, &context)?;
        let v = uv(&uvs, 2 * i + 1, &context)?;
        mesh.vertices.extend_from_slice(&[p.x, p.y, p.z, u, v]);
    }

    let triangles = numbers(node, "triangles", &context)?;
    if triangles.len() % 3 != 0 {
        return Err(LoadError::MalformedDocument(format!(
            "triangle stream of {context} is not a multiple of 3"
        )));
    }
    mesh.triangles = triangles.iter().map(|&t| t as u32).collect();
    Ok(())
}

fn next(stream: &[f64], cursor: &mut usize, context: &str) -> Result<f64, LoadError> {
    let v = stream.get(*cursor).copied().ok_or_else(|| {
        LoadError::MalformedDocument(format!("vertex stream of {context} ends early"))
    })?;
    *cursor += 1;
    Ok(v)
}

fn uv(uvs: &[f64], at: usize, context: &str) -> Result<f32, LoadError> {
    uvs.get(at).map(|&v| v as f32).ok_or_else(|| {
        LoadError::MalformedDocument(format!("uv stream of {context} ends early"))
    })
}
