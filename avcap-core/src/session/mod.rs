pub mod audio;
pub mod worker;
