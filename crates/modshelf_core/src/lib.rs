//! Core shared logic for modshelf mod management.
//!
//! This crate provides the pieces every other modshelf crate agrees on: the
//! naming convention that encodes a mod folder's enabled state, the on-disk
//! layout of a mod library, and folder-name sanitation.

pub mod layout;
pub mod marker;
pub mod naming;

pub use marker::DISABLED_PREFIX;
