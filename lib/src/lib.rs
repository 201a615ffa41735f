#![doc = svgbobdoc::transform!(
//! Turns a single Markdown document into a standalone HTML documentation page.
//!
//! # Overview
//!
//! A page is built by a straight-line pipeline. Every buffer lives for one
//! run only; the template file is regenerated before each conversion.
//!
//! ```svgbob
//!  +-----------+     +------------------+     +---------------+
//!  | template  |     | documentation.md |     |   index.html  |
//!  | generator |     +--------+---------+     +-------^-------+
//!  +-----+-----+              |                       |
//!        |           +--------v---------+             |
//!        |           |  DiagramBlocks   |             |
//!        |           +--------+---------+             |
//!        |           +--------v---------+             |
//!        |           |   ImageEmbeds    |             |
//!        |           +--------+---------+             |
//!        |           +--------v---------+     +-------+-------+
//!        |           | Markdown + exts  +---->|    compose    |
//!        |           +------------------+     +-------^-------+
//!        |                                            |
//!        +--------------> template.html --------------+
//! ```
//!
//! In words:
//!
//!   1. [`TemplateGenerator`](template::TemplateGenerator) writes the page
//!      skeleton, which holds a single `{{CONTENT}}` placeholder.
//!   2. The source is read and rewritten: fenced ```` ```mermaid ```` blocks
//!      become diagram containers, `![[name]]` embeds become images under
//!      `images/`.
//!   3. The remaining markdown is rendered with the `extra` and `toc`
//!      [extensions](markdown::Extension).
//!   4. The fragment replaces the placeholder and the page is written out.
//!
//! [`Converter`] drives steps 2 to 4; [`Converter::build`] runs all four.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod buffer;
pub mod markdown;
pub mod template;
pub mod convert;

pub use convert::*;
