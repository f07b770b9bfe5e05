//! Top-down action game core library crate.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg_attr(coverage_nightly, coverage(off))]
pub mod error;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod events;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod formatter;

pub mod animation;
pub mod asset;
pub mod config;
pub mod constants;
pub mod direction;
pub mod game;
pub mod systems;
