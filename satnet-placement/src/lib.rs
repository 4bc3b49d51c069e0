//! Placement & admission controller (§4.1).

pub mod addressing;
pub mod bestfit;
pub mod controller;

pub use controller::run_placement;
