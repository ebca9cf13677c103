pub mod analyzers;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod output;
