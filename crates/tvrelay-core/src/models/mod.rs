//! Data models for tvrelay

pub mod alert;

pub use alert::*;
