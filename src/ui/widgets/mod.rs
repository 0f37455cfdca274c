// SPDX-License-Identifier: MPL-2.0
pub mod animated_spinner;
pub mod video_canvas;

pub use animated_spinner::AnimatedSpinner;
pub use video_canvas::VideoCanvas;
