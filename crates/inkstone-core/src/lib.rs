pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod session;
pub mod suggestion;
pub mod view;
pub mod wordcount;

// Re-export common error type
pub use error::EditorError;
