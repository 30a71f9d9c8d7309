//! Board-agnostic core logic for the DMX-driven time circuits display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Display driver traits (clock units, speedometer)
//! - Quantization tables mapping raw channel values to display fields
//! - The signal decoder: change detection, blink, liveness
//! - Configuration types and the fixture config parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod decoder;
pub mod quantize;
pub mod traits;
