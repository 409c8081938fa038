pub mod adaptors;
pub mod export;
pub mod uploads;
