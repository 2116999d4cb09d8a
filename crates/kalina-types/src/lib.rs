//! Kalina Types - Core type definitions for the KALINA governance engine.
//!
//! This crate provides the fundamental types shared by every engine crate:
//! - Addresses (20-byte, Bech32m encoded) for voters, proposers and recipients
//! - Amount, the treasury's quantity unit
//! - Error types for address parsing and amount arithmetic

pub mod address;
pub mod amount;
pub mod error;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;
