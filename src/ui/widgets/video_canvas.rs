// SPDX-License-Identifier: MPL-2.0
//! Widget for rendering video frames.
//!
//! Frames arrive as shared RGBA buffers and are turned into an image handle
//! only when their sequence number changes, so polling the player every UI
//! tick does not re-upload the same frame. The handle shares the frame's
//! buffer; no pixels are copied.

use crate::player::VideoFrame;
use iced::widget::{container, image, text};
use iced::{ContentFit, Element, Length};

/// Video frame surface.
pub struct VideoCanvas<Message> {
    frame_handle: Option<image::Handle>,
    /// Sequence number of the frame behind `frame_handle`.
    sequence: Option<u64>,
    _phantom: std::marker::PhantomData<Message>,
}

impl<Message> VideoCanvas<Message> {
    pub fn new() -> Self {
        Self {
            frame_handle: None,
            sequence: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Shows `frame` unless it is the one already displayed.
    ///
    /// Returns true when the displayed image changed.
    pub fn present(&mut self, frame: VideoFrame) -> bool {
        if self.sequence == Some(frame.sequence) {
            return false;
        }
        self.sequence = Some(frame.sequence);
        self.frame_handle = Some(image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.rgba_data,
        ));
        true
    }

    /// Clears the current frame and releases memory.
    pub fn clear(&mut self) {
        self.frame_handle = None;
        self.sequence = None;
    }

    pub fn has_frame(&self) -> bool {
        self.frame_handle.is_some()
    }

    /// Renders the frame letterboxed into the available space.
    pub fn view(&self) -> Element<'_, Message>
    where
        Message: 'static,
    {
        match &self.frame_handle {
            Some(handle) => image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        }
    }
}

impl<Message> Default for VideoCanvas<Message> {
    fn default() -> Self {
        Self::new()
    }
}
