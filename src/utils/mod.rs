//! Utility modules for the oracle.
//!
//! This module contains shared utilities used by both roles:
//! - Cryptographic primitives
//! - Fixed-point price conversion
//! - Constants

pub mod constants;
pub mod crypto;
pub mod math;

pub use constants::*;
pub use crypto::*;
pub use math::*;
