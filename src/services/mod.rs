//! Business logic services

pub mod allowance;
pub mod geo;
pub mod locations;
pub mod planner;
pub mod trip;
