pub mod http;

pub use http::HttpEditorApi;
