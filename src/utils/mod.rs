pub mod format;
pub mod log;
pub mod visibility;
