//! Military vs civilian compensation comparison.
//!
//! `milciv-core` holds the reference-data models and the four calculators:
//! regular military compensation, civilian take-home pay, equity vesting and
//! a multi-year projection. Rate tables are passed in explicitly; nothing in
//! this crate reads files or global state.

pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{
    compute_civilian_compensation, compute_military_compensation, compute_projection,
    compute_vesting_schedule,
};
pub use error::{InputError, MAX_HORIZON_YEARS};
pub use models::*;
