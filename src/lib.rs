//! Procedural Android launcher icons, rasterized in software and written
//! as PNG files with a self-contained encoder.

pub mod crc32;
pub mod densities;
pub mod icon_gen;
pub mod png;
pub mod raster;

pub use icon_gen::{generate_icons, render_icon, Args};
pub use png::{encode, write_png, PngError};
