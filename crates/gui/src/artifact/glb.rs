//! Binary glTF (GLB) reading and writing.
//!
//! Only the subset the viewport needs: triangle-list primitives with float
//! positions and optional integer indices, stored in the embedded BIN chunk.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::viewport::mesh::{MeshData, MeshScene, SceneMesh};

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
/// GLB version 2
const GLB_VERSION: u32 = 2;
/// JSON chunk type
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
/// BIN chunk type
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

/// glTF component types
const UNSIGNED_BYTE: u32 = 5121;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;
const FLOAT: u32 = 5126;

/// glTF buffer view targets
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Primitive topology: triangle list
const MODE_TRIANGLES: u32 = 4;

#[derive(Debug, Error)]
pub enum GlbError {
    #[error("not a binary glTF file")]
    BadMagic,
    #[error("unsupported glTF container version {0}")]
    UnsupportedVersion(u32),
    #[error("truncated {0}")]
    Truncated(&'static str),
    #[error("missing {0} chunk")]
    MissingChunk(&'static str),
    #[error("invalid glTF JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("buffer {0} is external; only embedded buffers are supported")]
    ExternalBuffer(usize),
    #[error("accessor {index}: {reason}")]
    Accessor { index: usize, reason: &'static str },
    #[error("node {0} does not exist")]
    MissingNode(usize),
}

// ── glTF JSON subset ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    meshes: Vec<Mesh>,
    #[serde(default)]
    accessors: Vec<Accessor>,
    #[serde(default)]
    buffer_views: Vec<BufferView>,
    #[serde(default)]
    buffers: Vec<Buffer>,
}

#[derive(Deserialize)]
struct Scene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Deserialize)]
struct Node {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    #[serde(default)]
    matrix: Option<[f32; 16]>,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

impl Node {
    fn local_transform(&self) -> Mat4 {
        if let Some(m) = self.matrix {
            return Mat4::from_cols_array(&m);
        }
        let t = self.translation.map(Vec3::from).unwrap_or(Vec3::ZERO);
        let r = self.rotation.map(Quat::from_array).unwrap_or(Quat::IDENTITY);
        let s = self.scale.map(Vec3::from).unwrap_or(Vec3::ONE);
        Mat4::from_scale_rotation_translation(s, r, t)
    }
}

#[derive(Deserialize)]
struct Mesh {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<Primitive>,
}

fn default_mode() -> u32 {
    MODE_TRIANGLES
}

#[derive(Deserialize)]
struct Primitive {
    #[serde(default)]
    attributes: HashMap<String, usize>,
    #[serde(default)]
    indices: Option<usize>,
    #[serde(default = "default_mode")]
    mode: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    #[serde(default)]
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    #[serde(default)]
    byte_stride: Option<usize>,
}

#[derive(Deserialize)]
struct Buffer {
    #[serde(default)]
    uri: Option<String>,
}

// ── Reading ──────────────────────────────────────────────────

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let chunk: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(chunk))
}

fn read_f32(bytes: &[u8], at: usize) -> Option<f32> {
    read_u32(bytes, at).map(f32::from_bits)
}

/// Split a GLB container into its JSON and (optional) BIN chunk payloads.
fn split_chunks(bytes: &[u8]) -> Result<(&[u8], Option<&[u8]>), GlbError> {
    let magic = read_u32(bytes, 0).ok_or(GlbError::Truncated("header"))?;
    if magic != GLB_MAGIC {
        return Err(GlbError::BadMagic);
    }
    let version = read_u32(bytes, 4).ok_or(GlbError::Truncated("header"))?;
    if version != GLB_VERSION {
        return Err(GlbError::UnsupportedVersion(version));
    }
    let total = read_u32(bytes, 8).ok_or(GlbError::Truncated("header"))? as usize;
    let bytes = bytes.get(..total).ok_or(GlbError::Truncated("file"))?;

    let mut json = None;
    let mut bin = None;
    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let len = read_u32(bytes, offset).ok_or(GlbError::Truncated("chunk header"))? as usize;
        let kind = read_u32(bytes, offset + 4).ok_or(GlbError::Truncated("chunk header"))?;
        let data = bytes
            .get(offset + 8..offset + 8 + len)
            .ok_or(GlbError::Truncated("chunk"))?;
        match kind {
            CHUNK_TYPE_JSON if json.is_none() => json = Some(data),
            CHUNK_TYPE_BIN if bin.is_none() => bin = Some(data),
            _ => {}
        }
        offset += 8 + len;
    }

    Ok((json.ok_or(GlbError::MissingChunk("JSON"))?, bin))
}

struct Reader<'a> {
    doc: &'a Document,
    bin: Option<&'a [u8]>,
}

impl<'a> Reader<'a> {
    /// Byte slice of an accessor's buffer view plus (start, stride)
    fn view(&self, index: usize, element_size: usize) -> Result<(&'a [u8], usize, usize), GlbError> {
        let err = |reason| GlbError::Accessor { index, reason };
        let acc = self.doc.accessors.get(index).ok_or(err("does not exist"))?;
        let view_idx = acc.buffer_view.ok_or(err("has no buffer view"))?;
        let view = self.doc.buffer_views.get(view_idx).ok_or(err("buffer view does not exist"))?;
        let buffer = self.doc.buffers.get(view.buffer).ok_or(err("buffer does not exist"))?;
        if buffer.uri.is_some() {
            return Err(GlbError::ExternalBuffer(view.buffer));
        }
        let bin = self.bin.ok_or(GlbError::MissingChunk("BIN"))?;
        let view_end = view
            .byte_offset
            .checked_add(view.byte_length)
            .ok_or(err("buffer view exceeds BIN chunk"))?;
        let data = bin
            .get(view.byte_offset..view_end)
            .ok_or(err("buffer view exceeds BIN chunk"))?;

        // glTF strides are 4..=252 and a multiple of 4; never narrower than one element
        let stride = match view.byte_stride {
            None => element_size,
            Some(s) if s >= element_size && (4..=252).contains(&s) && s % 4 == 0 => s,
            Some(_) => return Err(err("invalid byte stride")),
        };

        // Last byte read must lie inside the view; every element before it then does too
        if acc.count > 0 {
            let end = (acc.count - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(acc.byte_offset))
                .and_then(|n| n.checked_add(element_size))
                .ok_or(err("reads past its buffer view"))?;
            if end > data.len() {
                return Err(err("reads past its buffer view"));
            }
        }
        Ok((data, acc.byte_offset, stride))
    }

    fn positions(&self, index: usize) -> Result<Vec<Vec3>, GlbError> {
        let acc = self
            .doc
            .accessors
            .get(index)
            .ok_or(GlbError::Accessor { index, reason: "does not exist" })?;
        if acc.component_type != FLOAT || acc.kind != "VEC3" {
            return Err(GlbError::Accessor { index, reason: "positions must be float VEC3" });
        }
        let (data, start, stride) = self.view(index, 12)?;
        (0..acc.count)
            .map(|i| {
                let at = start + i * stride;
                match (read_f32(data, at), read_f32(data, at + 4), read_f32(data, at + 8)) {
                    (Some(x), Some(y), Some(z)) => Ok(Vec3::new(x, y, z)),
                    _ => Err(GlbError::Accessor { index, reason: "reads past its buffer view" }),
                }
            })
            .collect()
    }

    fn indices(&self, index: usize) -> Result<Vec<u32>, GlbError> {
        let acc = self
            .doc
            .accessors
            .get(index)
            .ok_or(GlbError::Accessor { index, reason: "does not exist" })?;
        if acc.kind != "SCALAR" {
            return Err(GlbError::Accessor { index, reason: "indices must be SCALAR" });
        }
        let size = match acc.component_type {
            UNSIGNED_BYTE => 1,
            UNSIGNED_SHORT => 2,
            UNSIGNED_INT => 4,
            _ => return Err(GlbError::Accessor { index, reason: "unsupported index type" }),
        };
        let (data, start, stride) = self.view(index, size)?;
        (0..acc.count)
            .map(|i| {
                let at = start + i * stride;
                let value = match size {
                    1 => data.get(at).map(|b| *b as u32),
                    2 => data
                        .get(at..at + 2)
                        .map(|b| u16::from_le_bytes([b[0], b[1]]) as u32),
                    _ => read_u32(data, at),
                };
                value.ok_or(GlbError::Accessor { index, reason: "reads past its buffer view" })
            })
            .collect()
    }

    fn primitive_mesh(&self, prim: &Primitive) -> Result<Option<MeshData>, GlbError> {
        if prim.mode != MODE_TRIANGLES {
            return Ok(None);
        }
        let Some(&pos_idx) = prim.attributes.get("POSITION") else {
            return Ok(None);
        };
        let positions = self.positions(pos_idx)?;
        let indices = match prim.indices {
            Some(idx) => self.indices(idx)?,
            None => (0..positions.len() as u32).collect(),
        };
        if indices.iter().any(|&i| i as usize >= positions.len()) {
            return Err(GlbError::Accessor {
                index: prim.indices.unwrap_or(pos_idx),
                reason: "index out of range",
            });
        }
        Ok(Some(MeshData { positions, indices }))
    }
}

/// Decode every triangle primitive reachable from the default scene.
pub fn parse_glb(bytes: &[u8]) -> Result<MeshScene, GlbError> {
    let (json, bin) = split_chunks(bytes)?;
    let doc: Document = serde_json::from_slice(json)?;
    let reader = Reader { doc: &doc, bin };

    let roots: Vec<usize> = match doc.scenes.get(doc.scene.unwrap_or(0)) {
        Some(scene) => scene.nodes.clone(),
        None => {
            // No scene list: every node that is nobody's child is a root
            let children: Vec<usize> = doc.nodes.iter().flat_map(|n| n.children.iter().copied()).collect();
            (0..doc.nodes.len()).filter(|i| !children.contains(i)).collect()
        }
    };

    let mut meshes = Vec::new();
    let mut visited = vec![false; doc.nodes.len()];
    let mut stack: Vec<(usize, Mat4)> = roots.into_iter().rev().map(|n| (n, Mat4::IDENTITY)).collect();

    while let Some((node_idx, parent)) = stack.pop() {
        let node = doc.nodes.get(node_idx).ok_or(GlbError::MissingNode(node_idx))?;
        if std::mem::replace(&mut visited[node_idx], true) {
            continue;
        }
        let world = parent * node.local_transform();

        if let Some(mesh) = node.mesh.and_then(|m| doc.meshes.get(m)) {
            for prim in &mesh.primitives {
                if let Some(data) = reader.primitive_mesh(prim)? {
                    meshes.push(SceneMesh {
                        name: node
                            .name
                            .clone()
                            .or_else(|| mesh.name.clone())
                            .unwrap_or_else(|| format!("node{node_idx}")),
                        mesh: data,
                        world,
                    });
                }
            }
        }

        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }

    Ok(MeshScene { meshes })
}

// ── Writing ──────────────────────────────────────────────────

/// Build a GLB file with one node/mesh per entry. Node transforms are written
/// as matrices when they are not the identity.
pub fn build_glb(meshes: &[SceneMesh]) -> Vec<u8> {
    let mut bin_data: Vec<u8> = Vec::new();
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut gltf_meshes = Vec::new();
    let mut nodes = Vec::new();

    for entry in meshes {
        let mesh = &entry.mesh;
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            continue;
        }
        let i = gltf_meshes.len();

        let (pos_min, pos_max) = match mesh.bounds() {
            Some(b) => (b.min, b.max),
            None => (Vec3::ZERO, Vec3::ZERO),
        };

        // Positions
        let pos_offset = bin_data.len();
        for p in &mesh.positions {
            for c in p.to_array() {
                bin_data.extend_from_slice(&c.to_le_bytes());
            }
        }
        let pos_length = bin_data.len() - pos_offset;

        // Indices
        let idx_offset = bin_data.len();
        for v in &mesh.indices {
            bin_data.extend_from_slice(&v.to_le_bytes());
        }
        let idx_length = bin_data.len() - idx_offset;

        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": pos_offset,
            "byteLength": pos_length,
            "target": ARRAY_BUFFER
        }));
        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": idx_offset,
            "byteLength": idx_length,
            "target": ELEMENT_ARRAY_BUFFER
        }));

        accessors.push(serde_json::json!({
            "bufferView": i * 2,
            "componentType": FLOAT,
            "count": mesh.positions.len(),
            "type": "VEC3",
            "min": pos_min.to_array(),
            "max": pos_max.to_array()
        }));
        accessors.push(serde_json::json!({
            "bufferView": i * 2 + 1,
            "componentType": UNSIGNED_INT,
            "count": mesh.indices.len(),
            "type": "SCALAR"
        }));

        gltf_meshes.push(serde_json::json!({
            "name": entry.name,
            "primitives": [{
                "attributes": { "POSITION": i * 2 },
                "indices": i * 2 + 1,
                "mode": MODE_TRIANGLES
            }]
        }));

        let mut node = serde_json::json!({ "name": entry.name, "mesh": i });
        if entry.world != Mat4::IDENTITY {
            node["matrix"] = serde_json::json!(entry.world.to_cols_array());
        }
        nodes.push(node);
    }

    let node_indices: Vec<usize> = (0..nodes.len()).collect();
    let gltf_json = serde_json::json!({
        "asset": { "version": "2.0", "generator": "nfinit" },
        "scene": 0,
        "scenes": [{ "nodes": node_indices }],
        "nodes": nodes,
        "meshes": gltf_meshes,
        "accessors": accessors,
        "bufferViews": buffer_views,
        "buffers": [{ "byteLength": bin_data.len() }]
    });

    let mut json_bytes = serde_json::to_vec(&gltf_json).unwrap_or_default();

    // Pad JSON with spaces and BIN with zeros to 4-byte alignment
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    while bin_data.len() % 4 != 0 {
        bin_data.push(0);
    }

    let json_chunk_length = json_bytes.len() as u32;
    let bin_chunk_length = bin_data.len() as u32;
    let total_length: u32 = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length as usize);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_length.to_le_bytes());

    glb.extend_from_slice(&json_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);

    glb.extend_from_slice(&bin_chunk_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin_data);

    glb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;

    fn glb_from_json(json: &serde_json::Value, bin: &[u8]) -> Vec<u8> {
        let mut j = serde_json::to_vec(json).unwrap();
        while j.len() % 4 != 0 {
            j.push(b' ');
        }
        let total = (12 + 8 + j.len() + 8 + bin.len()) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&GLB_VERSION.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&(j.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
        out.extend_from_slice(&j);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
        out.extend_from_slice(bin);
        out
    }

    #[test]
    fn test_written_cube_is_readable() {
        let glb = build_glb(&[SceneMesh {
            name: "part".into(),
            mesh: cube(10.0, 10.0, 10.0),
            world: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        }]);
        assert_eq!(glb.len() % 4, 0);

        let scene = parse_glb(&glb).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].name, "part");
        assert_eq!(scene.meshes[0].mesh, cube(10.0, 10.0, 10.0));
        let b = scene.bounds().unwrap();
        assert!((b.center() - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_bad_magic() {
        assert!(matches!(parse_glb(b"not a glb at all"), Err(GlbError::BadMagic)));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(parse_glb(&GLB_MAGIC.to_le_bytes()), Err(GlbError::Truncated(_))));
    }

    #[test]
    fn test_truncated_file() {
        let glb = build_glb(&[SceneMesh {
            name: "a".into(),
            mesh: cube(1.0, 1.0, 1.0),
            world: Mat4::IDENTITY,
        }]);
        assert!(matches!(parse_glb(&glb[..glb.len() - 4]), Err(GlbError::Truncated(_))));
    }

    #[test]
    fn test_wrong_version() {
        let mut glb = build_glb(&[SceneMesh {
            name: "a".into(),
            mesh: cube(1.0, 1.0, 1.0),
            world: Mat4::IDENTITY,
        }]);
        glb[4..8].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(parse_glb(&glb), Err(GlbError::UnsupportedVersion(1))));
    }

    #[test]
    fn test_node_hierarchy_and_u16_indices() {
        // One triangle, u16 indices, child node translated under a scaled parent
        let mut bin = Vec::new();
        for c in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            bin.extend_from_slice(&c.to_le_bytes());
        }
        for i in [0u16, 1, 2, 0] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        let json = serde_json::json!({
            "scenes": [{ "nodes": [0] }],
            "nodes": [
                { "scale": [2.0, 2.0, 2.0], "children": [1] },
                { "translation": [1.0, 0.0, 0.0], "mesh": 0 }
            ],
            "meshes": [{ "name": "tri", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
            "accessors": [
                { "bufferView": 0, "componentType": FLOAT, "count": 3, "type": "VEC3" },
                { "bufferView": 1, "componentType": UNSIGNED_SHORT, "count": 3, "type": "SCALAR" }
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
                { "buffer": 0, "byteOffset": 36, "byteLength": 8 }
            ],
            "buffers": [{ "byteLength": 44 }]
        });
        let scene = parse_glb(&glb_from_json(&json, &bin)).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].name, "tri");
        assert_eq!(scene.meshes[0].mesh.indices, vec![0, 1, 2]);
        let p = scene.meshes[0].world.transform_point3(Vec3::X);
        assert!((p - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_non_indexed_and_non_triangle_primitives() {
        let mut bin = Vec::new();
        for c in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            bin.extend_from_slice(&c.to_le_bytes());
        }
        let json = serde_json::json!({
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [
                { "attributes": { "POSITION": 0 } },
                { "attributes": { "POSITION": 0 }, "mode": 1 }
            ] }],
            "accessors": [{ "bufferView": 0, "componentType": FLOAT, "count": 3, "type": "VEC3" }],
            "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
            "buffers": [{ "byteLength": 36 }]
        });
        let scene = parse_glb(&glb_from_json(&json, &bin)).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].mesh.indices, vec![0, 1, 2]);
        assert_eq!(scene.meshes[0].name, "node0");
    }

    #[test]
    fn test_accessor_past_view_is_rejected() {
        let bin = vec![0u8; 24];
        let json = serde_json::json!({
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "accessors": [{ "bufferView": 0, "componentType": FLOAT, "count": 3, "type": "VEC3" }],
            "bufferViews": [{ "buffer": 0, "byteLength": 24 }],
            "buffers": [{ "byteLength": 24 }]
        });
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &bin)),
            Err(GlbError::Accessor { index: 0, .. })
        ));
    }

    fn positions_only(view: serde_json::Value, count: u64) -> serde_json::Value {
        serde_json::json!({
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "accessors": [{ "bufferView": 0, "componentType": FLOAT, "count": count, "type": "VEC3" }],
            "bufferViews": [view],
            "buffers": [{ "byteLength": 12 }]
        })
    }

    #[test]
    fn test_zero_stride_cannot_repeat_one_vertex() {
        let json = positions_only(
            serde_json::json!({ "buffer": 0, "byteLength": 12, "byteStride": 0 }),
            3_000_000,
        );
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &[0u8; 12])),
            Err(GlbError::Accessor { index: 0, reason: "invalid byte stride" })
        ));
    }

    #[test]
    fn test_stride_narrower_than_element_rejected() {
        let json = positions_only(serde_json::json!({ "buffer": 0, "byteLength": 12, "byteStride": 8 }), 1);
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &[0u8; 12])),
            Err(GlbError::Accessor { reason: "invalid byte stride", .. })
        ));
    }

    #[test]
    fn test_wide_stride_reads_interleaved_positions() {
        // Two vertices, 16 bytes apart
        let mut bin = Vec::new();
        for v in [[1.0f32, 2.0, 3.0, 0.0], [4.0, 5.0, 6.0, 0.0]] {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let json = positions_only(serde_json::json!({ "buffer": 0, "byteLength": 32, "byteStride": 16 }), 2);
        let doc: Document = serde_json::from_value(json).unwrap();
        let reader = Reader { doc: &doc, bin: Some(&bin) };
        let positions = reader.positions(0).unwrap();
        assert_eq!(positions, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn test_huge_view_offset_is_an_error_not_a_panic() {
        let json = positions_only(
            serde_json::json!({ "buffer": 0, "byteOffset": u64::MAX, "byteLength": 12 }),
            1,
        );
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &[0u8; 12])),
            Err(GlbError::Accessor { index: 0, .. })
        ));
    }

    #[test]
    fn test_huge_accessor_count_is_an_error_not_a_panic() {
        let json = positions_only(serde_json::json!({ "buffer": 0, "byteLength": 12 }), u64::MAX);
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &[0u8; 12])),
            Err(GlbError::Accessor { index: 0, reason: "reads past its buffer view" })
        ));
    }

    #[test]
    fn test_external_buffer_rejected() {
        let json = serde_json::json!({
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "accessors": [{ "bufferView": 0, "componentType": FLOAT, "count": 1, "type": "VEC3" }],
            "bufferViews": [{ "buffer": 0, "byteLength": 12 }],
            "buffers": [{ "byteLength": 12, "uri": "data.bin" }]
        });
        assert!(matches!(
            parse_glb(&glb_from_json(&json, &[0u8; 12])),
            Err(GlbError::ExternalBuffer(0))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let glb = glb_from_json(&serde_json::json!("just a string"), &[]);
        assert!(matches!(parse_glb(&glb), Err(GlbError::Json(_))));
    }
}
