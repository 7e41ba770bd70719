//! Utility functions and helpers for the flexifit library.

pub mod finite_difference;
pub mod matrix_convert;
