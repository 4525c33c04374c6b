pub mod analyze;
pub mod config;
pub mod export;
pub mod init;
pub mod point;
pub mod report;
