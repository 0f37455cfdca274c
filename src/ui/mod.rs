// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Screens follow the Elm-style "state down, messages up" pattern: each
//! component owns its local state, emits `Message`s, and reports the
//! outcome to the application as an `Event`.
//!
//! # Screens
//!
//! - [`input_view`] - Stream address editor with paste and play buttons
//! - [`playback_view`] - Video surface with the auto-hiding controls overlay
//! - [`alert`] - Modal error dialog
//!
//! # Shared Infrastructure
//!
//! - [`widgets`] - Custom Iced widgets (spinner, video canvas)
//! - [`styles`] - Centralized styling (buttons, containers, overlays)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management

pub mod alert;
pub mod design_tokens;
pub mod input_view;
pub mod playback_view;
pub mod styles;
pub mod theming;
pub mod widgets;
