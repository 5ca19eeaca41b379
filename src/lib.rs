//! stamp-match: press a shape onto two surfaces, then check whether the two
//! stamps look the same.
//!
//! Two independent halves:
//! - [`capture`]: contact samples → reconstructed footprint → RGBA buffer
//! - [`compare`]: two RGBA buffers + tolerance → similarity result
//!
//! Data only flows one way (capture → buffer → compare), and neither half
//! keeps shared mutable state.

pub mod capture;
pub mod compare;
pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod types;

pub use capture::{Footprint, GestureEvent, GestureKind, StampSurface, reconstruct};
pub use compare::{BufferStats, ComparisonResult, compare, compare_with, has_content, stats};
pub use config::{CompareConfig, SurfaceConfig};
pub use error::Error;
pub use raster::RasterBuffer;
pub use types::{ContactSample, FrameBuffer, Mode};
