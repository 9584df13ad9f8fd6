//! # rasterizer-core
//!
//! Anti-aliased polygon rasterizer core, ported from Anti-Grain Geometry
//! (AGG) 2.6's rasterizer stage — subpixel coordinate conversion, the cell
//! accumulator and cell store, the edge walker, rectangular scanline
//! clipping, and the scanline coverage sweep (solid and compound/layered).
//!
//! This crate covers the middle stage of AGG's five-stage pipeline:
//!
//! 1. Vertex Source — *out of scope*
//! 2. Coordinate Conversion (transforms, strokes, dashes, curves) — *out of scope*
//! 3. **Scanline Rasterizer** — subpixel cells, edge walking, clipping, coverage sweep
//! 4. **Scanline Container** — coverage spans between rasterizer and renderer
//! 5. Renderer (pixel blending) — *out of scope*
//!
//! Pixel formats, blenders, gamma application downstream of coverage, path
//! construction (curves/strokes/dashes), transforms, image filtering,
//! gradients, text, and windowing are outside this crate's scope.

pub mod basics;
pub mod clip_liang_barsky;
pub mod conv;
pub mod rasterizer_cells_aa;
pub mod rasterizer_compound_aa;
pub mod rasterizer_scanline_aa;
pub mod rasterizer_sl_clip;
pub mod scanline_bin;
pub mod scanline_p;
pub mod scanline_u;

pub use basics::{FillingRule, Rect, POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};
pub use conv::{ConvDbl, ConvDbl3x, ConvInt, ConvInt3x, ConvIntSat, ConvPolicy};
pub use rasterizer_cells_aa::RasterizerCellsAa;
pub use rasterizer_compound_aa::{CellStyleAa, LayerOrder, RasterizerCompoundAa};
pub use rasterizer_scanline_aa::{RasterizerScanlineAa, Scanline};
pub use rasterizer_sl_clip::{
    RasterizerSlClip, RasterizerSlClipDbl, RasterizerSlClipDbl3x, RasterizerSlClipInt,
    RasterizerSlClipInt3x, RasterizerSlClipIntSat, RasterizerSlNoClip,
};
pub use scanline_bin::ScanlineBin;
pub use scanline_p::ScanlineP8;
pub use scanline_u::ScanlineU8;
