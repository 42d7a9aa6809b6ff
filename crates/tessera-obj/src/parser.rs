use crate::data::{FaceIndex, ObjData};
use crate::error::{AttributeKind, ObjError};
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser<'s> {
    tokens: Vec<TokenWithPos<'s>>,
    pos: usize,
    data: ObjData,
}

impl<'s> Parser<'s> {
    pub fn new(tokens: Vec<TokenWithPos<'s>>) -> Self {
        Self { tokens, pos: 0, data: ObjData::default() }
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn peek(&self) -> Token<'s> {
        self.tokens.get(self.pos).map_or(Token::Eof, |t| t.token)
    }

    fn advance(&mut self) -> Token<'s> {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), Token::Newline | Token::Eof)
    }

    /// Drops the rest of the current line, including its newline.
    fn skip_line(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        self.advance();
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(mut self) -> Result<ObjData, ObjError> {
        loop {
            match self.advance() {
                Token::Eof => break,
                Token::Newline => continue,
                Token::Word("v") => {
                    let [x, y, z] = self.parse_floats::<3>("v", 3)?;
                    self.data.vertices.push([x, y, z]);
                }
                Token::Word("vt") => {
                    let [u, v] = self.parse_floats::<2>("vt", 1)?;
                    self.data.uvs.push([u, v]);
                }
                Token::Word("vn") => {
                    let [x, y, z] = self.parse_floats::<3>("vn", 3)?;
                    self.data.normals.push([x, y, z]);
                }
                Token::Word("f") => self.parse_face()?,
                // Groups, objects, smoothing and material statements carry no geometry.
                Token::Word(_) => self.skip_line(),
                Token::Slash => {
                    return Err(ObjError::UnexpectedToken {
                        line: self.line(),
                        found: "'/' at start of line".to_string(),
                    });
                }
            }
        }

        Ok(self.data)
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// Reads up to `N` leading floats from the current line; extra components
    /// (`w`, vertex colors, a third texture coordinate) are ignored. At least
    /// `required` must be present; the rest default to 0.
    fn parse_floats<const N: usize>(
        &mut self,
        directive: &'static str,
        required: usize,
    ) -> Result<[f32; N], ObjError> {
        let mut out = [0.0f32; N];
        let mut found = 0;

        while !self.at_line_end() {
            let line = self.line();
            match self.advance() {
                Token::Word(w) if found < N => {
                    out[found] = w.parse::<f32>().map_err(|_| ObjError::InvalidNumber {
                        line,
                        token: w.to_string(),
                    })?;
                    found += 1;
                }
                Token::Word(_) => {}
                _ => {
                    return Err(ObjError::UnexpectedToken {
                        line,
                        found: format!("'/' in '{directive}' directive"),
                    });
                }
            }
        }

        if found < required {
            return Err(ObjError::MissingComponent {
                line: self.line(),
                directive,
                expected: required,
                found,
            });
        }

        self.advance(); // consume the newline
        Ok(out)
    }

    // ── Faces ─────────────────────────────────────────────────────────────

    /// Parses `f g0 g1 g2 ...` and appends triangles to the face list.
    ///
    /// Polygons with more than three groups are fan-triangulated around the
    /// first group: `(0, i, i + 1)`.
    fn parse_face(&mut self) -> Result<(), ObjError> {
        let line = self.line();
        let mut groups: Vec<FaceIndex> = Vec::with_capacity(4);

        while !self.at_line_end() {
            groups.push(self.parse_group(line)?);
        }
        self.advance(); // consume the newline

        if groups.len() < 3 {
            return Err(ObjError::FaceTooSmall { line, groups: groups.len() });
        }

        for i in 1..groups.len() - 1 {
            self.data.faces.push(groups[0]);
            self.data.faces.push(groups[i]);
            self.data.faces.push(groups[i + 1]);
        }

        Ok(())
    }

    /// Parses one `v`, `v/vt`, `v//vn`, or `v/vt/vn` group.
    fn parse_group(&mut self, line: usize) -> Result<FaceIndex, ObjError> {
        let vertex = match self.advance() {
            Token::Word(w) => Some(self.resolve(w, line, AttributeKind::Vertex)?),
            _ => {
                return Err(ObjError::UnexpectedToken {
                    line,
                    found: "'/' where a vertex index was expected".to_string(),
                });
            }
        };

        let mut uv = None;
        let mut normal = None;

        if self.peek() == Token::Slash {
            self.advance();
            if let Token::Word(w) = self.peek() {
                self.advance();
                uv = Some(self.resolve(w, line, AttributeKind::Uv)?);
            }

            if self.peek() == Token::Slash {
                self.advance();
                if let Token::Word(w) = self.peek() {
                    self.advance();
                    normal = Some(self.resolve(w, line, AttributeKind::Normal)?);
                }
            }
        }

        Ok(FaceIndex { vertex, uv, normal })
    }

    /// Converts a 1-based (or negative, end-relative) OBJ index to a 0-based
    /// index into the pool declared so far.
    fn resolve(&self, word: &str, line: usize, kind: AttributeKind) -> Result<usize, ObjError> {
        let raw = word.parse::<i64>().map_err(|_| ObjError::InvalidNumber {
            line,
            token: word.to_string(),
        })?;

        let len = match kind {
            AttributeKind::Vertex => self.data.vertices.len(),
            AttributeKind::Uv => self.data.uvs.len(),
            AttributeKind::Normal => self.data.normals.len(),
        };

        let resolved = match raw {
            0 => return Err(ObjError::ZeroIndex { line }),
            r if r > 0 => r - 1,
            r => len as i64 + r,
        };

        if resolved < 0 || resolved >= len as i64 {
            return Err(ObjError::IndexOutOfRange { line, kind, index: raw, len });
        }

        Ok(resolved as usize)
    }
}

// ── Public parse entry points ─────────────────────────────────────────────

/// Parses OBJ source into raw attribute pools and triangulated face indices.
///
/// No normalization or expansion is applied.
pub fn parse_data(src: &str) -> Result<ObjData, ObjError> {
    let tokens = Lexer::new(src).tokenize();
    Parser::new(tokens).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI_POOL: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
v 0 0 1
v 1 0 1
v 0 1 1
v 1 1 1
v 2 2 2
vt 0 0
vt 1 0
vt 0 1
vt 1 1
vt 0.5 0.5
vt 0.5 0
vt 0 0.5
vt 1 0.5
vt 0.5 1
vn 0 0 1
vn 0 1 0
vn 1 0 0
vn 0 0 -1
vn 0 -1 0
vn -1 0 0
vn 1 1 0
vn 1 0 1
vn 0 1 1
";

    fn face(v: usize, uv: Option<usize>, n: Option<usize>) -> FaceIndex {
        FaceIndex { vertex: Some(v), uv, normal: n }
    }

    #[test]
    fn full_triples_are_zero_based() {
        let src = format!("{TRI_POOL}f 1/2/3 4/5/6 7/8/9\n");
        let data = parse_data(&src).unwrap();
        assert_eq!(
            data.faces,
            vec![
                face(0, Some(1), Some(2)),
                face(3, Some(4), Some(5)),
                face(6, Some(7), Some(8)),
            ]
        );
    }

    #[test]
    fn missing_uv_is_absent_not_zero() {
        let src = format!("{TRI_POOL}f 1//3 2//4 3//5\n");
        let data = parse_data(&src).unwrap();
        assert_eq!(data.faces.len(), 3);
        for (f, (v, n)) in data.faces.iter().zip([(0, 2), (1, 3), (2, 4)]) {
            assert_eq!(f.uv, None);
            assert_eq!(f.vertex, Some(v));
            assert_eq!(f.normal, Some(n));
        }
    }

    #[test]
    fn vertex_and_uv_only() {
        let data = parse_data("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n").unwrap();
        assert_eq!(data.faces[1], face(1, Some(0), None));
    }

    #[test]
    fn bare_vertex_indices() {
        let data = parse_data("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        assert_eq!(data.faces, vec![face(0, None, None), face(1, None, None), face(2, None, None)]);
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let data = parse_data("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let verts: Vec<_> = data.faces.iter().map(|f| f.vertex.unwrap()).collect();
        assert_eq!(verts, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_indices_are_end_relative() {
        let data = parse_data("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        let verts: Vec<_> = data.faces.iter().map(|f| f.vertex.unwrap()).collect();
        assert_eq!(verts, vec![0, 1, 2]);
    }

    #[test]
    fn extra_components_are_ignored() {
        let data = parse_data("v 1 2 3 1.0\nv 1 2 3 0.5 0.5 0.5\nvt 0.25 0.75 0\n").unwrap();
        assert_eq!(data.vertices, vec![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0]]);
        assert_eq!(data.uvs, vec![[0.25, 0.75]]);
    }

    #[test]
    fn unknown_directives_are_skipped() {
        let src = "mtllib cube.mtl\no Cube\ng side\ns off\nusemtl Red\nv 0 0 0\n";
        let data = parse_data(src).unwrap();
        assert_eq!(data.vertices.len(), 1);
    }

    #[test]
    fn empty_source_yields_empty_pools() {
        let data = parse_data("").unwrap();
        assert!(data.vertices.is_empty());
        assert!(data.faces.is_empty());
    }

    #[test]
    fn err_malformed_number() {
        let err = parse_data("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert_eq!(err, ObjError::InvalidNumber { line: 2, token: "x".to_string() });
    }

    #[test]
    fn err_missing_component() {
        let err = parse_data("vn 0 1\n").unwrap_err();
        assert!(matches!(err, ObjError::MissingComponent { directive: "vn", expected: 3, found: 2, .. }));
    }

    #[test]
    fn single_component_uv_defaults_v_to_zero() {
        let data = parse_data("v 0 0 0\nvt 0.5\nvt 0.25 0.75 1\n").unwrap();
        assert_eq!(data.uvs, vec![[0.5, 0.0], [0.25, 0.75]]);
    }

    #[test]
    fn err_uv_without_components() {
        let err = parse_data("vt\n").unwrap_err();
        assert!(matches!(err, ObjError::MissingComponent { directive: "vt", expected: 1, found: 0, .. }));
    }

    #[test]
    fn err_zero_index() {
        let err = parse_data("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert_eq!(err, ObjError::ZeroIndex { line: 4 });
    }

    #[test]
    fn err_index_out_of_range() {
        let err = parse_data("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1 2/1 3/1\n").unwrap_err();
        assert!(matches!(err, ObjError::IndexOutOfRange { kind: AttributeKind::Uv, len: 0, .. }));
    }

    #[test]
    fn err_degenerate_face() {
        let err = parse_data("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert_eq!(err, ObjError::FaceTooSmall { line: 3, groups: 2 });
    }
}
