pub mod analyzers;
pub mod filters;
pub mod loader;
pub mod output;
pub mod prompt;
