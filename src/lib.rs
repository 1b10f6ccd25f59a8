//! Win-probability prediction for football fixtures.
//!
//! The pipeline loads a CSV of historical per-team matches, encodes its
//! categorical columns, derives trailing-window form averages per team,
//! fits a random forest chronologically under two split strategies, keeps
//! the more precise one, and answers single-fixture prediction requests
//! with a win probability and a qualitative category.

pub mod dataset;
pub mod encode;
pub mod error;
pub mod forest;
pub mod predict;
pub mod rolling;
pub mod split;
pub mod train;
