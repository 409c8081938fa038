pub mod jobs;
pub mod probes;
pub mod uploads;
