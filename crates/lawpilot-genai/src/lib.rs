pub mod googleai;

pub use googleai::GoogleAiBackend;
