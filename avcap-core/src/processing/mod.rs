pub mod channel_mixer;
pub mod format_select;
pub mod quantum_buffer;
pub mod rate_converter;
