//! Core of the photo grid splitter.
//!
//! This crate holds everything that does not depend on where it runs: the
//! catalog of grid layouts, the rectangle arithmetic for cropping, padding and
//! slicing, the raster operations themselves, ZIP bundling, and the wizard
//! state machine that sequences them. The `web` crate drives it from DOM
//! events in the browser; the `cli` crate drives it from the command line.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`wizard`] | Session state machine and the [`wizard::Action`]s it emits |
//! | [`options`] | Grid layout catalog and best-fit selection |
//! | [`geometry`] | Crop boxes, pad placement, and tile rectangles |
//! | [`color`] | Pad colour parsing and `auto` resolution |
//! | [`raster`] | Decode, crop, pad, split, and PNG encoding |
//! | [`archive`] | ZIP bundling of generated tiles |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared numeric and naming constants |

pub mod archive;
pub mod color;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod options;
pub mod raster;
pub mod wizard;

pub use error::{Result, TilesError};
