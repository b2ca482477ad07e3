//! Read-only HTTP views over a pre-computed basketball video `report.json`.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod report;
pub mod routes;
pub mod views;
