use std::fmt;

/// Attribute pool a face sub-index refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeKind {
    Vertex,
    Uv,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeKind::Vertex => "vertex",
            AttributeKind::Uv => "uv",
            AttributeKind::Normal => "normal",
        })
    }
}

/// An error produced while reading OBJ text.
///
/// Every variant raised by the parser carries the 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjError {
    /// A token that should have been a number did not parse as one.
    InvalidNumber { line: usize, token: String },

    /// A directive ended before all of its required components.
    MissingComponent {
        line: usize,
        directive: &'static str,
        expected: usize,
        found: usize,
    },

    /// A `/` or other token appeared where the directive does not allow it.
    UnexpectedToken { line: usize, found: String },

    /// A face line with fewer than three index groups.
    FaceTooSmall { line: usize, groups: usize },

    /// OBJ indices are 1-based; `0` is never valid.
    ZeroIndex { line: usize },

    /// A face referenced an attribute that has not been declared.
    IndexOutOfRange {
        line: usize,
        kind: AttributeKind,
        index: i64,
        len: usize,
    },

    /// Normalization needs a non-zero X extent to divide by.
    DegenerateExtent { x_min: f32, x_max: f32 },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::InvalidNumber { line, token } => {
                write!(f, "obj parse error at line {line}: invalid number {token:?}")
            }
            ObjError::MissingComponent { line, directive, expected, found } => write!(
                f,
                "obj parse error at line {line}: '{directive}' needs {expected} components, got {found}"
            ),
            ObjError::UnexpectedToken { line, found } => {
                write!(f, "obj parse error at line {line}: unexpected {found}")
            }
            ObjError::FaceTooSmall { line, groups } => write!(
                f,
                "obj parse error at line {line}: face needs at least 3 vertices, got {groups}"
            ),
            ObjError::ZeroIndex { line } => {
                write!(f, "obj parse error at line {line}: index 0 is not valid (indices are 1-based)")
            }
            ObjError::IndexOutOfRange { line, kind, index, len } => write!(
                f,
                "obj parse error at line {line}: {kind} index {index} out of range ({len} declared)"
            ),
            ObjError::DegenerateExtent { x_min, x_max } => write!(
                f,
                "obj normalization error: zero X extent (min {x_min}, max {x_max})"
            ),
        }
    }
}

impl std::error::Error for ObjError {}
