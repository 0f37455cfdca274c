// SPDX-License-Identifier: MPL-2.0
//! `m3u8_player` is a lightweight HLS (M3U8) stream player built with the
//! Iced GUI framework.
//!
//! The user pastes or types a stream address, presses play, and the stream
//! is opened through FFmpeg. Loading is bounded by a timeout; failures are
//! reported in a modal alert with a localized hint for the error code.

#![doc(html_root_url = "https://docs.rs/m3u8_player/0.1.0")]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod i18n;
pub mod player;
pub mod ui;
