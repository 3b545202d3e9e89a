//! Export of laid-out graphs to rendering surfaces.
//!
//! The only built-in surface is SVG; interactive consumers can instead read
//! the node/edge sets from a [`crate::view::ExplorerView`] directly.

pub mod svg;
