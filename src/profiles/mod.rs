//! Per-kind rule tables and entry points. Each profile feeds the shared
//! engine with its own fields, thresholds, and templates.

pub mod engagement;
pub mod funding;
pub mod revenue;
