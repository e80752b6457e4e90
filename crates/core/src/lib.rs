//! Jangada Core - Shared domain types.
//!
//! This crate provides the types shared by the Jangada components:
//! - `web` - Public site and admin panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Menu items, categories, site settings, chat messages
//! - [`filter`] - Pure catalog filtering by category and free-text query
//! - [`seed`] - Default catalog and settings used to seed empty stores

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod seed;
pub mod types;

pub use filter::filter_menu;
pub use types::*;
