pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod reference_selector;
