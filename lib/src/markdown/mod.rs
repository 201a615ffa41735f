//! A plugin-driven markdown to HTML pipeline.

mod plugin;
#[allow(clippy::module_inception)]
mod markdown;
mod extension;
mod diagram;
mod image;
mod abbr;
mod auto_heading;
mod toc;
mod render;

pub use plugin::*;
pub use markdown::*;
pub use extension::*;
pub use diagram::*;
pub use image::*;
pub use abbr::*;
pub use auto_heading::*;
pub use toc::*;
pub use render::*;
