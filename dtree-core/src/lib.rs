//! Core library for growing a 2-D decision tree one split at a time.
//!
//! Main components:
//! - [`dataset`] — labelled point cloud generation and rescaling.
//! - [`split`] — Gini impurity and best-threshold search.
//! - [`tree`] — tree nodes, split planning and application.
//! - [`scheduler`] — split clock, iteration budget and tick source.
//! - [`simulation`] — a session tying points, tree and clock together.
//! - [`scene`] — projection of the tree into drawable geometry.
//! - [`render`] — the drawing-backend trait and glyph types.
//! - [`config`] — tunable parameters.
//! - [`types`] — shared ids, features and labels.

pub mod config;
pub mod dataset;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod simulation;
pub mod split;
pub mod tree;
pub mod types;
