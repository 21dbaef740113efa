// ReviewScope - app/mod.rs
//
// Application layer: orchestration, state management, lexicon loading.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod lexicon_mgr;
pub mod load;
pub mod state;
