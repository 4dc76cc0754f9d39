//! Graph classification service built around a small pretrained GIN model.
//!
//! An edge list goes through [`features::preprocess_edgelist`], the resulting
//! tensors through [`model::LightGin::predict`], and [`server`] exposes the
//! two over HTTP.

pub mod config;
pub mod edgelist;
pub mod errors;
pub mod features;
pub mod graph;
pub mod model;
pub mod server;
