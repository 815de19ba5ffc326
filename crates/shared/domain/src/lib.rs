//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `chrono`,
//! `rust_decimal`). Keep it lean: no I/O or pricing/routing logic, just data and simple helpers.

pub mod booking;
pub mod config;
pub mod constants;
pub mod coupon;
pub mod error;
pub mod location;
pub mod money;
pub mod package;
pub mod quote;
pub mod route;
pub mod tier;
pub mod tracking;
