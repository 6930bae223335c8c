//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie construction and parsing
//! - Cryptographically secure random bytes

pub mod cookie;
pub mod crypto;
