// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! This module provides localization capabilities using the Fluent localization system.
//! Translation bundles are embedded at compile time from `assets/i18n/`.
//!
//! # Features
//!
//! - Locale detection from CLI, config, or system settings
//! - Bare-language fallback (`zh` resolves to `zh-CN`)
//! - Argument interpolation for error details
//! - Fallback to `en-US` when no candidate locale is bundled

pub mod fluent;
