mod config;
mod event;
mod harness;
mod rewrite;
mod utils;

// Re-export public API
pub use config::RewriteConfig;
pub use event::{Event, Request, handle};
pub use harness::{Input, run};
pub use rewrite::{RewritePolicy, Rewriter};
