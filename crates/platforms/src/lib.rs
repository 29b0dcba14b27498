//! Live-stream extraction for CAM4 rooms.
//!
//! The [`extractor`] module holds the platform-independent plumbing and the
//! CAM4 implementation; [`recorder`] drives `ffmpeg` to save a stream.

pub mod extractor;
pub mod media;
pub mod recorder;
