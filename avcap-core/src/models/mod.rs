pub mod audio_format;
pub mod error;
pub mod state;
pub mod video_format;
