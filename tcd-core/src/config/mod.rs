//! Configuration types
//!
//! Board-agnostic fixture configuration. The firmware embeds a
//! `fixture.toml` and parses it at boot with [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
