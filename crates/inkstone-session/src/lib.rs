pub mod controller;

pub use controller::EditorSession;
