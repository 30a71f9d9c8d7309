//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the display traits
//! defined in tcd-core for HT16K33-backed LED segment displays:
//!
//! - Clock units (3 × 14-segment month, 7-segment day/year/hour/minute)
//! - The two-digit speedometer
//! - 7- and 14-segment font tables

#![no_std]
#![deny(unsafe_code)]

pub mod display;
