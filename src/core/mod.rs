// ReviewScope - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library plus pure data crates (csv, regex, rayon).
// Must NOT depend on: ui, platform, app.

pub mod aggregate;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod model;
pub mod sentiment;
pub mod wordcloud;
