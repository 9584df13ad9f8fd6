//! Rasterizer scanline clipping policies.
//!
//! Port of `agg_rasterizer_sl_clip.h` — coordinate conversion (double → 24.8
//! fixed-point, or double-precision equivalent) and rectangular viewport
//! clipping for the scanline rasterizer.
//!
//! `RasterizerSlClip<C>` is generic over a [`ConvPolicy`][crate::conv::ConvPolicy],
//! matching the C++ `rasterizer_sl_clip<Conv>` template — each concrete `C`
//! monomorphizes to its own clipper rather than switching on a runtime tag.
//! Type aliases below name the five concrete instantiations.
//!
//! Also provides `RasterizerSlNoClip` — passthrough, no clipping.

use core::marker::PhantomData;

use crate::basics::Rect;
use crate::clip_liang_barsky::{clipping_flags, clipping_flags_y};
use crate::conv::{ConvDbl, ConvDbl3x, ConvInt, ConvInt3x, ConvIntSat, ConvPolicy};
use crate::rasterizer_cells_aa::RasterizerCellsAa;

// ============================================================================
// RasterizerSlClip<C> — clipping policy with viewport clipping
// ============================================================================

/// Scanline rasterizer clipping policy that clips line segments against
/// a viewport rectangle, then converts to subpixel fixed-point coordinates.
///
/// Port of C++ `rasterizer_sl_clip<Conv>`. Implements the 13-case (9
/// reachable) rectangle clip switch: cases where both endpoints fall past
/// the same X boundary collapse the segment onto that boundary rather than
/// being dropped, which preserves winding contribution for polygons that
/// graze the clip edge.
pub struct RasterizerSlClip<C: ConvPolicy> {
    clip_box: Rect<C::Coord>,
    x1: C::Coord,
    y1: C::Coord,
    f1: u32,
    clipping: bool,
    _conv: PhantomData<C>,
}

impl<C: ConvPolicy> RasterizerSlClip<C> {
    pub fn new() -> Self {
        Self {
            clip_box: Rect::new(
                C::Coord::default(),
                C::Coord::default(),
                C::Coord::default(),
                C::Coord::default(),
            ),
            x1: C::Coord::default(),
            y1: C::Coord::default(),
            f1: 0,
            clipping: false,
            _conv: PhantomData,
        }
    }

    /// Disable clipping.
    pub fn reset_clipping(&mut self) {
        self.clipping = false;
    }

    /// Set the clipping rectangle in the policy's native coordinate space.
    pub fn clip_box(&mut self, x1: C::Coord, y1: C::Coord, x2: C::Coord, y2: C::Coord) {
        self.clip_box = Rect::new(x1, y1, x2, y2);
        self.clip_box.normalize();
        self.clipping = true;
    }

    /// Record a move_to in the policy's native coordinate space.
    pub fn move_to(&mut self, x1: C::Coord, y1: C::Coord) {
        self.x1 = x1;
        self.y1 = y1;
        if self.clipping {
            self.f1 = clipping_flags(x1, y1, &self.clip_box);
        }
    }

    /// Record a move_to from double (user-space) coordinates.
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.move_to(C::upscale_x(x), C::upscale_y(y));
    }

    /// Clip and emit a line segment to the cell rasterizer.
    ///
    /// Implements the 13-case clipping switch from C++ `line_to`.
    pub fn line_to(&mut self, ras: &mut RasterizerCellsAa, x2: C::Coord, y2: C::Coord) {
        if self.clipping {
            let f2 = clipping_flags(x2, y2, &self.clip_box);

            // Both endpoints invisible by Y on the same side → skip
            if (self.f1 & 10) == (f2 & 10) && (self.f1 & 10) != 0 {
                self.x1 = x2;
                self.y1 = y2;
                self.f1 = f2;
                return;
            }

            let x1 = self.x1;
            let y1 = self.y1;
            let f1 = self.f1;

            match ((f1 & 5) << 1) | (f2 & 5) {
                0 => {
                    // Visible by X
                    self.line_clip_y(ras, x1, y1, x2, y2, f1, f2);
                }
                1 => {
                    // x2 > clip.x2
                    let y3 = y1 + C::mul_div(self.clip_box.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    self.line_clip_y(ras, x1, y1, self.clip_box.x2, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x2, y3, self.clip_box.x2, y2, f3, f2);
                }
                2 => {
                    // x1 > clip.x2
                    let y3 = y1 + C::mul_div(self.clip_box.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    self.line_clip_y(ras, self.clip_box.x2, y1, self.clip_box.x2, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x2, y3, x2, y2, f3, f2);
                }
                3 => {
                    // x1 > clip.x2 && x2 > clip.x2
                    self.line_clip_y(ras, self.clip_box.x2, y1, self.clip_box.x2, y2, f1, f2);
                }
                4 => {
                    // x2 < clip.x1
                    let y3 = y1 + C::mul_div(self.clip_box.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    self.line_clip_y(ras, x1, y1, self.clip_box.x1, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x1, y3, self.clip_box.x1, y2, f3, f2);
                }
                6 => {
                    // x1 > clip.x2 && x2 < clip.x1
                    let y3 = y1 + C::mul_div(self.clip_box.x2 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + C::mul_div(self.clip_box.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    let f4 = clipping_flags_y(y4, &self.clip_box);
                    self.line_clip_y(ras, self.clip_box.x2, y1, self.clip_box.x2, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x2, y3, self.clip_box.x1, y4, f3, f4);
                    self.line_clip_y(ras, self.clip_box.x1, y4, self.clip_box.x1, y2, f4, f2);
                }
                8 => {
                    // x1 < clip.x1
                    let y3 = y1 + C::mul_div(self.clip_box.x1 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    self.line_clip_y(ras, self.clip_box.x1, y1, self.clip_box.x1, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x1, y3, x2, y2, f3, f2);
                }
                9 => {
                    // x1 < clip.x1 && x2 > clip.x2
                    let y3 = y1 + C::mul_div(self.clip_box.x1 - x1, y2 - y1, x2 - x1);
                    let y4 = y1 + C::mul_div(self.clip_box.x2 - x1, y2 - y1, x2 - x1);
                    let f3 = clipping_flags_y(y3, &self.clip_box);
                    let f4 = clipping_flags_y(y4, &self.clip_box);
                    self.line_clip_y(ras, self.clip_box.x1, y1, self.clip_box.x1, y3, f1, f3);
                    self.line_clip_y(ras, self.clip_box.x1, y3, self.clip_box.x2, y4, f3, f4);
                    self.line_clip_y(ras, self.clip_box.x2, y4, self.clip_box.x2, y2, f4, f2);
                }
                12 => {
                    // x1 < clip.x1 && x2 < clip.x1
                    self.line_clip_y(ras, self.clip_box.x1, y1, self.clip_box.x1, y2, f1, f2);
                }
                _ => {
                    // cases 5, 7, 10, 11 — cannot happen with valid clipping flags
                }
            }
            self.f1 = f2;
        } else {
            ras.line(
                C::downscale_x(self.x1),
                C::downscale_y(self.y1),
                C::downscale_x(x2),
                C::downscale_y(y2),
            );
        }
        self.x1 = x2;
        self.y1 = y2;
    }

    /// Emit a line_to from double (user-space) coordinates.
    pub fn line_to_d(&mut self, ras: &mut RasterizerCellsAa, x: f64, y: f64) {
        self.line_to(ras, C::upscale_x(x), C::upscale_y(y));
    }

    /// Clip a line segment in Y and emit to the rasterizer.
    #[allow(clippy::too_many_arguments)]
    fn line_clip_y(
        &self,
        ras: &mut RasterizerCellsAa,
        x1: C::Coord,
        y1: C::Coord,
        x2: C::Coord,
        y2: C::Coord,
        f1: u32,
        f2: u32,
    ) {
        let f1 = f1 & 10;
        let f2 = f2 & 10;

        if (f1 | f2) == 0 {
            // Fully visible
            ras.line(
                C::downscale_x(x1),
                C::downscale_y(y1),
                C::downscale_x(x2),
                C::downscale_y(y2),
            );
        } else if f1 != f2 {
            // Partially visible — clip in Y
            let mut tx1 = x1;
            let mut ty1 = y1;
            let mut tx2 = x2;
            let mut ty2 = y2;

            if f1 & 8 != 0 {
                // y1 < clip.y1
                tx1 = x1 + C::mul_div(self.clip_box.y1 - y1, x2 - x1, y2 - y1);
                ty1 = self.clip_box.y1;
            }

            if f1 & 2 != 0 {
                // y1 > clip.y2
                tx1 = x1 + C::mul_div(self.clip_box.y2 - y1, x2 - x1, y2 - y1);
                ty1 = self.clip_box.y2;
            }

            if f2 & 8 != 0 {
                // y2 < clip.y1
                tx2 = x1 + C::mul_div(self.clip_box.y1 - y1, x2 - x1, y2 - y1);
                ty2 = self.clip_box.y1;
            }

            if f2 & 2 != 0 {
                // y2 > clip.y2
                tx2 = x1 + C::mul_div(self.clip_box.y2 - y1, x2 - x1, y2 - y1);
                ty2 = self.clip_box.y2;
            }

            ras.line(
                C::downscale_x(tx1),
                C::downscale_y(ty1),
                C::downscale_x(tx2),
                C::downscale_y(ty2),
            );
        }
        // else: f1 == f2, both invisible by Y on same side → skip
    }
}

impl<C: ConvPolicy> Default for RasterizerSlClip<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-integer clipper: the common case, coordinates in 24.8 subpixel
/// fixed point with no overflow protection.
pub type RasterizerSlClipInt = RasterizerSlClip<ConvInt>;
/// Saturating-integer clipper: clamps coordinates to `±POLY_MAX_COORD`.
pub type RasterizerSlClipIntSat = RasterizerSlClip<ConvIntSat>;
/// Integer clipper with X coordinates tripled (subpixel LCD text rendering).
pub type RasterizerSlClipInt3x = RasterizerSlClip<ConvInt3x>;
/// Double-precision clipper: clip arithmetic stays in `f64` until cells are emitted.
pub type RasterizerSlClipDbl = RasterizerSlClip<ConvDbl>;
/// Double-precision clipper with X coordinates tripled.
pub type RasterizerSlClipDbl3x = RasterizerSlClip<ConvDbl3x>;

// ============================================================================
// RasterizerSlNoClip — passthrough (no clipping)
// ============================================================================

/// Scanline rasterizer policy that performs no clipping, just coordinate
/// conversion (double → 24.8 fixed-point) and direct passthrough to the
/// cell rasterizer.
///
/// Port of C++ `rasterizer_sl_no_clip`.
pub struct RasterizerSlNoClip {
    x1: i32,
    y1: i32,
}

impl RasterizerSlNoClip {
    pub fn new() -> Self {
        Self { x1: 0, y1: 0 }
    }

    pub fn reset_clipping(&mut self) {}

    pub fn clip_box(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32) {}

    pub fn move_to(&mut self, x1: i32, y1: i32) {
        self.x1 = x1;
        self.y1 = y1;
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.move_to(ConvInt::upscale_x(x), ConvInt::upscale_y(y));
    }

    pub fn line_to(&mut self, ras: &mut RasterizerCellsAa, x2: i32, y2: i32) {
        ras.line(self.x1, self.y1, x2, y2);
        self.x1 = x2;
        self.y1 = y2;
    }

    pub fn line_to_d(&mut self, ras: &mut RasterizerCellsAa, x: f64, y: f64) {
        self.line_to(ras, ConvInt::upscale_x(x), ConvInt::upscale_y(y));
    }
}

impl Default for RasterizerSlNoClip {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Public helpers
// ============================================================================

/// Upscale a double coordinate to 24.8 fixed-point using the plain integer
/// policy. Convenience wrapper for callers that only ever use `ConvInt`.
pub fn poly_coord(v: f64) -> i32 {
    ConvInt::upscale_x(v)
}

// ============================================================================
// Tests
// ============================================================================
