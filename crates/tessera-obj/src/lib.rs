//! Reader for Wavefront **OBJ** geometry.
//!
//! Turns the plain-text `v` / `vt` / `vn` / `f` directive stream into flat,
//! face-vertex-expanded attribute arrays that can be uploaded as-is.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_data` (raw pools + triangulated faces) |
//! | [`data`] | `ObjData`, `FaceIndex`, `Bounds`, `ObjMesh`, normalization, expansion |
//! | [`error`] | `ObjError` |
//!
//! # Quick start
//!
//! ```rust
//! let src = "v 0 0 0\nv 2 0 0\nv 0 1 0\nf 1 2 3\n";
//!
//! let mesh = tessera_obj::parse_str(src).unwrap();
//! assert_eq!(mesh.vertex_count(), 3);
//! assert!(mesh.uvs.is_none());
//! ```

pub mod data;
pub mod error;
pub mod lexer;
pub mod parser;

pub use data::{Bounds, FaceIndex, ObjData, ObjMesh};
pub use error::{AttributeKind, ObjError};
pub use parser::parse_data;

/// Parses OBJ source, normalizes the vertex pool, and expands it per face-vertex.
pub fn parse_str(src: &str) -> Result<ObjMesh, ObjError> {
    let mut data = parse_data(src)?;
    data.normalize()?;
    Ok(data.expand())
}

/// Byte-buffer variant of [`parse_str`] for callers with their own file source.
///
/// Invalid UTF-8 sequences are replaced; OBJ geometry is ASCII in practice.
pub fn parse(bytes: &[u8]) -> Result<ObjMesh, ObjError> {
    parse_str(&String::from_utf8_lossy(bytes))
}
