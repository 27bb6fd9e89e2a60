//! Core library for the topo-sheets command line application.
//!
//! The library turns a tab-separated export of climbing routes into a
//! printable workbook. IO adapters live under [`io`], data representations in
//! [`model`], field renaming and sector cleanup in [`transform`], hold-color
//! decoding in [`colors`], sheet layout in [`compose`], and the end-to-end
//! orchestration in [`convert`].

pub mod colors;
pub mod compose;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod transform;

pub use config::TopoConfig;
pub use error::{Result, ToolError};
