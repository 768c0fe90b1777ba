//! Audit observers.

pub mod file_observer;
pub mod http_observer;
pub mod log_observer;

pub use file_observer::FileObserver;
pub use http_observer::HttpObserver;
pub use log_observer::LogObserver;
