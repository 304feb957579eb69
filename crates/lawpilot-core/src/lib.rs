pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod flow;
pub mod prompt;
pub mod schema;

pub use backend::GenerationBackend;
pub use error::{FieldError, FlowError};
pub use flow::{Flow, Invoker};
