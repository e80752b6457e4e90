//! Core types for Jangada.
//!
//! This module provides type-safe wrappers for the domain concepts shared
//! between the public site and the admin panel.

pub mod category;
pub mod chat;
pub mod email;
pub mod id;
pub mod menu_item;
pub mod settings;

pub use category::{Category, CategoryFilter, CategoryParseError};
pub use chat::{ChatMessage, ChatRole, SourceLink};
pub use email::{Email, EmailError};
pub use id::MenuItemId;
pub use menu_item::{MenuItem, MenuItemError, MenuItemPatch, NewMenuItem};
pub use settings::{SettingsPatch, SiteSettings};
