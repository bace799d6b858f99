//! Mesh index stream assembly.
//!
//! A mesh list is a flat `i32` stream. Non-negative tokens are vertex (or
//! normal) indices; negative tokens are control codes that open and close
//! primitives or end the stream. [`IndexAssembler`] walks the stream one
//! token at a time and turns every closed triangle primitive into
//! triangles. Line primitives are checked and contribute nothing.

use thiserror::Error;

/// Ends the whole stream.
pub const END: i32 = -1;
/// Opens a polyline.
pub const BGNLINE: i32 = -2;
pub const ENDLINE: i32 = -3;
/// Opens a triangle strip.
pub const BGNTRI: i32 = -4;
/// Closes a triangle strip.
pub const ENDTRI: i32 = -5;
/// Inside a strip: the next vertex replaces the newer retained vertex.
pub const SWAP: i32 = -10;
/// The next token is a normal index rather than a vertex.
pub const NORMAL: i32 = -20;
/// Opens independent triangles given as plain vertex indices.
pub const BGNPOLY: i32 = -21;
/// Closes any of the independent-triangle primitives.
pub const ENDPOLY: i32 = -22;
/// Opens independent triangles given as (normal, vertex) index pairs.
pub const BGNPOLYNORM: i32 = -23;
/// Same as [`BGNPOLY`]; written by tools for very large polygons.
pub const BGNBIGPOLY: i32 = -24;
/// Opens independent triangles of vertex indices whose normal sits at the
/// following vertex slot.
pub const BGNPOLYNORM2: i32 = -25;

/// Why an index stream was rejected. `token` is the position in the stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshFault {
    #[error("token {token}: index {index} is outside the {vertex_count} vertices")]
    IndexOutOfRange {
        token: usize,
        index: i64,
        vertex_count: usize,
    },
    #[error("token {token}: {pending} pending indices do not form whole triangles")]
    Unpartitioned { token: usize, pending: usize },
    #[error("token {token}: unknown control code {code}")]
    UnknownCode { token: usize, code: i32 },
    #[error("token {token}: index outside of any primitive")]
    StrayIndex { token: usize },
    #[error("token {token}: control code {code} inside an open primitive")]
    NestedPrimitive { token: usize, code: i32 },
    #[error("token {token}: control code {code} closes no open primitive")]
    UnbalancedEnd { token: usize, code: i32 },
    #[error("token {token}: primitive still open at end of stream")]
    Unterminated { token: usize },
    #[error("token {token}: tokens after the end-of-stream marker")]
    TrailingTokens { token: usize },
    #[error("stream of {len} tokens has no end-of-stream marker")]
    MissingEnd { len: usize },
}

impl MeshFault {
    /// Stream position of the offending token.
    pub fn token(&self) -> usize {
        match *self {
            MeshFault::IndexOutOfRange { token, .. }
            | MeshFault::Unpartitioned { token, .. }
            | MeshFault::UnknownCode { token, .. }
            | MeshFault::StrayIndex { token }
            | MeshFault::NestedPrimitive { token, .. }
            | MeshFault::UnbalancedEnd { token, .. }
            | MeshFault::Unterminated { token }
            | MeshFault::TrailingTokens { token } => token,
            MeshFault::MissingEnd { len } => len,
        }
    }
}

/// Active primitive-assembly mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between primitives.
    Idle,
    /// Disjoint triangles. `stride` tokens describe one corner, the vertex
    /// index being the last of them.
    Independent { stride: usize },
    /// Triangle strip over a running two-vertex window.
    Strip,
    /// Polyline; indices are bounds-checked only.
    Line,
    /// `END` was seen.
    Ended,
}

/// Explicit state machine over a mesh index stream.
#[derive(Debug)]
pub struct IndexAssembler {
    vertex_count: usize,
    mode: Mode,
    pending: Vec<u32>,
    /// Set by [`NORMAL`]: the next index is skipped as a normal.
    normal_next: bool,
    /// Set by [`SWAP`] inside a strip.
    swap_next: bool,
    window: [u32; 2],
    strip_len: usize,
    triangles: Vec<[u32; 3]>,
    position: usize,
}

impl IndexAssembler {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            mode: Mode::Idle,
            pending: Vec::new(),
            normal_next: false,
            swap_next: false,
            window: [0; 2],
            strip_len: 0,
            triangles: Vec::new(),
            position: 0,
        }
    }

    /// Feeds the next token.
    pub fn push(&mut self, token: i32) -> Result<(), MeshFault> {
        let at = self.position;
        self.position += 1;
        if self.mode == Mode::Ended {
            return Err(MeshFault::TrailingTokens { token: at });
        }
        if token >= 0 {
            return self.index(at, token);
        }
        match token {
            END => {
                if self.mode != Mode::Idle {
                    return Err(MeshFault::Unterminated { token: at });
                }
                self.mode = Mode::Ended;
            }
            BGNPOLY | BGNBIGPOLY | BGNPOLYNORM2 => {
                self.open(at, token, Mode::Independent { stride: 1 })?
            }
            BGNPOLYNORM => self.open(at, token, Mode::Independent { stride: 2 })?,
            BGNTRI => self.open(at, token, Mode::Strip)?,
            BGNLINE => self.open(at, token, Mode::Line)?,
            ENDLINE => match self.mode {
                Mode::Line => self.reset_primitive(),
                _ => return Err(MeshFault::UnbalancedEnd { token: at, code: token }),
            },
            ENDPOLY => match self.mode {
                Mode::Independent { stride } => self.close_independent(at, stride)?,
                _ => return Err(MeshFault::UnbalancedEnd { token: at, code: token }),
            },
            ENDTRI => match self.mode {
                Mode::Strip => {
                    if self.strip_len == 1 || self.strip_len == 2 {
                        return Err(MeshFault::Unpartitioned {
                            token: at,
                            pending: self.strip_len,
                        });
                    }
                    self.reset_primitive();
                }
                _ => return Err(MeshFault::UnbalancedEnd { token: at, code: token }),
            },
            NORMAL => {
                if self.mode == Mode::Idle {
                    return Err(MeshFault::StrayIndex { token: at });
                }
                self.normal_next = true;
            }
            SWAP => {
                if self.mode != Mode::Strip {
                    return Err(MeshFault::UnknownCode { token: at, code: token });
                }
                self.swap_next = true;
            }
            code => return Err(MeshFault::UnknownCode { token: at, code }),
        }
        Ok(())
    }

    /// Finishes the stream and returns the triangles.
    ///
    /// An empty stream yields no triangles; any other stream must have been
    /// closed with [`END`].
    pub fn finish(self) -> Result<Vec<[u32; 3]>, MeshFault> {
        match self.mode {
            Mode::Ended => Ok(self.triangles),
            Mode::Idle if self.position == 0 => Ok(self.triangles),
            Mode::Idle => Err(MeshFault::MissingEnd { len: self.position }),
            _ => Err(MeshFault::Unterminated {
                token: self.position,
            }),
        }
    }

    fn open(&mut self, at: usize, code: i32, mode: Mode) -> Result<(), MeshFault> {
        if self.mode != Mode::Idle {
            return Err(MeshFault::NestedPrimitive { token: at, code });
        }
        self.mode = mode;
        Ok(())
    }

    fn reset_primitive(&mut self) {
        self.mode = Mode::Idle;
        self.pending.clear();
        self.normal_next = false;
        self.swap_next = false;
        self.strip_len = 0;
    }

    fn checked(&self, at: usize, token: i32) -> Result<u32, MeshFault> {
        let index = token as u32;
        if index as usize >= self.vertex_count {
            return Err(MeshFault::IndexOutOfRange {
                token: at,
                index: token as i64,
                vertex_count: self.vertex_count,
            });
        }
        Ok(index)
    }

    fn index(&mut self, at: usize, token: i32) -> Result<(), MeshFault> {
        let index = self.checked(at, token)?;
        match self.mode {
            Mode::Idle | Mode::Ended => Err(MeshFault::StrayIndex { token: at }),
            Mode::Independent { .. } => {
                if std::mem::take(&mut self.normal_next) {
                    return Ok(());
                }
                self.pending.push(index);
                Ok(())
            }
            Mode::Strip => {
                if std::mem::take(&mut self.normal_next) {
                    return Ok(());
                }
                self.strip_vertex(index);
                Ok(())
            }
            Mode::Line => {
                self.normal_next = false;
                Ok(())
            }
        }
    }

    fn strip_vertex(&mut self, c: u32) {
        let [a, b] = self.window;
        match self.strip_len {
            0 => self.window[0] = c,
            1 => self.window[1] = c,
            n => {
                // Every other triangle is flipped to keep one winding.
                let tri = if n % 2 == 0 { [a, b, c] } else { [b, a, c] };
                self.triangles.push(tri);
                if std::mem::take(&mut self.swap_next) {
                    self.window = [a, c];
                } else {
                    self.window = [b, c];
                }
            }
        }
        self.strip_len += 1;
    }

    fn close_independent(&mut self, at: usize, stride: usize) -> Result<(), MeshFault> {
        let per_triangle = 3 * stride;
        if self.pending.len() % per_triangle != 0 {
            return Err(MeshFault::Unpartitioned {
                token: at,
                pending: self.pending.len(),
            });
        }
        for corners in self.pending.chunks_exact(per_triangle) {
            let vertex = |k: usize| corners[k * stride + stride - 1];
            self.triangles.push([vertex(0), vertex(1), vertex(2)]);
        }
        self.reset_primitive();
        Ok(())
    }
}

/// Assembles a whole stream into triangles.
pub fn assemble(tokens: &[i32], vertex_count: usize) -> Result<Vec<[u32; 3]>, MeshFault> {
    let mut assembler = IndexAssembler::new(vertex_count);
    for &token in tokens {
        assembler.push(token)?;
    }
    assembler.finish()
}

/// Builds the canonical stream for `triangles`: one [`BGNPOLY`] primitive
/// of disjoint triples and the [`END`] marker, or only [`END`] when there
/// are no triangles.
pub fn canonical(triangles: &[[u32; 3]], vertex_count: usize) -> Result<Vec<i32>, MeshFault> {
    if triangles.is_empty() {
        return Ok(vec![END]);
    }
    let mut tokens = Vec::with_capacity(triangles.len() * 3 + 3);
    tokens.push(BGNPOLY);
    for &index in triangles.iter().flatten() {
        match i32::try_from(index) {
            Ok(token) if (index as usize) < vertex_count => tokens.push(token),
            _ => {
                return Err(MeshFault::IndexOutOfRange {
                    token: tokens.len(),
                    index: index as i64,
                    vertex_count,
                })
            }
        }
    }
    tokens.push(ENDPOLY);
    tokens.push(END);
    Ok(tokens)
}
