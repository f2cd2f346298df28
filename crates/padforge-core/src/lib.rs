//! Padforge Core Types and Definitions
//!
//! This crate provides the value types that footprint scripts produce and the
//! pure operations on them. It includes:
//!
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Layers**: Layer names and per-variant layer sets ([`layer`] module)
//! - **Elements**: The closed set of footprint primitives ([`element`] module)
//! - **Layout**: Dual-row and single-row pad generators ([`layout`] module)
//! - **Flatten**: Normalization of nested results ([`flatten`] module)
//! - **Records**: Tagged, JSON-ready records for every element ([`record`] module)

pub mod element;
pub mod flatten;
pub mod geometry;
pub mod layer;
pub mod layout;
pub mod record;
