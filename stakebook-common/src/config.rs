//! Configuration types shared across Stakebook crates.

pub mod network;
pub mod parser;
pub mod service;
pub mod validator;

// Re-export commonly used types at module root for ergonomic imports.
pub use network::Network;
pub use parser::ParserConfig;
pub use service::ServiceConfig;
pub use validator::ValidatorConfig;
