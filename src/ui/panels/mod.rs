// ReviewScope - ui/panels/mod.rs

pub mod about;
pub mod charts;
pub mod filters;
pub mod kpis;
pub mod load_summary;
pub mod wordcloud;
