pub mod cli;
pub mod config;
pub mod llm;
pub mod logging;
pub mod outlet;
pub mod research;
pub mod web;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use workflow::launch;
