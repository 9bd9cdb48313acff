pub mod email;
pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod store;
