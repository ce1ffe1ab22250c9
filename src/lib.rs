//! Benefit Engine for the Korean Earned Income Tax Credit
//!
//! This crate computes the earned income tax credit (근로장려금) payable to a
//! household from its type and reported income, either from piecewise-linear
//! schedules or from a sampled table, and then applies the asset, late-filing
//! and age adjustments with a full audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
