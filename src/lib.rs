//! U.S. median household income by state, drawn as a choropleth, with a
//! county-level drill-down table for one selected state.

pub mod choropleth;
pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod server;
pub mod states;
pub mod types;
