// SPDX-License-Identifier: MPL-2.0
//! System clipboard access.

/// Reads the current clipboard text.
///
/// Returns `None` when the clipboard is unavailable or holds no text.
#[must_use]
pub fn read_text() -> Option<String> {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(err) => {
            log::warn!("Clipboard unavailable: {}", err);
            return None;
        }
    };

    match clipboard.get_text() {
        Ok(text) => Some(text),
        Err(err) => {
            log::debug!("Clipboard holds no text: {}", err);
            None
        }
    }
}
