//! Synthesized STL and GLB buffers for tests.

use serde_json::{json, Value};

pub(crate) type Triangle = ([f32; 3], [[f32; 3]; 3]);

/// The triangle used throughout the tests: normal +Z, right angle at origin.
pub(crate) const UNIT_TRIANGLE: Triangle = (
    [0.0, 0.0, 1.0],
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
);

/// Binary STL with a zeroed header.
pub(crate) fn stl(triangles: &[Triangle]) -> Vec<u8> {
    stl_with_header(&[], triangles)
}

/// Binary STL whose header starts with `header` (truncated to 80 bytes).
pub(crate) fn stl_with_header(header: &[u8], triangles: &[Triangle]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    let len = header.len().min(80);
    bytes[..len].copy_from_slice(&header[..len]);
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for (normal, vertices) in triangles {
        push_f32s(&mut bytes, normal);
        for vertex in vertices {
            push_f32s(&mut bytes, vertex);
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

/// `count` distinct triangles, each shifted along X by its index.
pub(crate) fn triangle_strip(count: usize) -> Vec<Triangle> {
    (0..count)
        .map(|i| {
            let x = i as f32;
            let (normal, [a, b, c]) = UNIT_TRIANGLE;
            (
                normal,
                [
                    [a[0] + x, a[1], a[2]],
                    [b[0] + x, b[1], b[2]],
                    [c[0] + x, c[1], c[2]],
                ],
            )
        })
        .collect()
}

/// Fixed JSON chunk length, so file-relative offsets are known up front.
pub(crate) const JSON_CHUNK_LEN: u32 = 1024;

/// File offset of the first data byte of the BIN chunk in [`glb`] output.
pub(crate) const BIN_DATA_START: u32 = 20 + JSON_CHUNK_LEN + 8;

/// GLB container with `document` as JSON chunk and `bin` as BIN chunk.
pub(crate) fn glb(document: &Value, bin: &[u8]) -> Vec<u8> {
    glb_from_text(&document.to_string(), bin)
}

/// GLB container with verbatim JSON chunk text, padded with spaces.
pub(crate) fn glb_from_text(text: &str, bin: &[u8]) -> Vec<u8> {
    assert!(text.len() <= JSON_CHUNK_LEN as usize, "fixture JSON too long");
    let mut json_chunk = text.as_bytes().to_vec();
    json_chunk.resize(JSON_CHUNK_LEN as usize, b' ');

    let mut bin_chunk = bin.to_vec();
    while bin_chunk.len() % 4 != 0 {
        bin_chunk.push(0);
    }

    let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
    let mut bytes = Vec::with_capacity(total);
    bytes.extend_from_slice(b"glTF");
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&(total as u32).to_le_bytes());
    bytes.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"JSON");
    bytes.extend_from_slice(&json_chunk);
    bytes.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"BIN\0");
    bytes.extend_from_slice(&bin_chunk);
    bytes
}

/// Three vertices of [`UNIT_TRIANGLE`] followed by indices `[0, 1, 2]` and
/// two bytes of padding. Positions occupy `[0, 36)`, indices `[36, 42)`.
pub(crate) fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for vertex in UNIT_TRIANGLE.1 {
        push_f32s(&mut bin, &vertex);
    }
    for index in [0u16, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    bin
}

/// One mesh, one indexed triangle primitive over [`triangle_bin`] placed at
/// `base` (a file offset or a BIN chunk offset).
pub(crate) fn triangle_document(base: u32) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "byteLength": 44 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": base, "byteLength": 36 },
            { "buffer": 0, "byteOffset": base + 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "meshes": [
            { "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }
        ]
    })
}

pub(crate) fn push_f32s(bytes: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
}
