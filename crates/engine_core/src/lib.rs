//! Core engine types and utilities for Starfolio.
//!
//! This crate provides the foundational types shared by the scene crates:
//! - Transform and spatial components
//! - Frame clock
//! - Easing curves used by the camera rig and transition overlays

pub mod components;
pub mod ease;
pub mod time;
pub mod transform;

pub use components::*;
pub use ease::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
