//! Skillgraph Core Types and Definitions
//!
//! This crate provides the foundational types for the skillgraph taxonomy
//! explorer. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Stroke definitions for rendered edges ([`draw`] module)
//! - **Datasets**: Taxonomy dataset and record model ([`dataset`] module)
//! - **Taxonomy**: Node/relation kinds and their visual rules ([`taxonomy`] module)

pub mod color;
pub mod dataset;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod taxonomy;
