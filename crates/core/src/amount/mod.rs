//! Fixed-point point amounts.

mod amount_model;
#[cfg(test)]
mod amount_model_tests;

pub use amount_model::PointAmount;
