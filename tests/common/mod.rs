//! Common utilities for integration tests
#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{LinearDiffusivity, NegativeDiffusivity};
pub use test_helpers::{
    assert_fields_close,
    gaussian_scenario,
    relative_error,
    within_bounds,
};
