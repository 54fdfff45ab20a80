pub mod audio_endpoint;
pub mod video_device;
