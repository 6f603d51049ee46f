//! Recursive multi-step forecasting and the four forecasting pipelines.

pub mod error;
pub mod pipeline;
pub mod recursive;
