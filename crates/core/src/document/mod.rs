//! Document layer: turns input bytes into per-page content streams.

pub mod source;

pub use source::{LopdfSource, PageContent, PageSource, RawPages};
