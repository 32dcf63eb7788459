pub mod handlers;
pub mod optimizer;
pub mod prompts;
