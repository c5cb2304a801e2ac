pub mod editing;
pub mod filter;
pub mod models;
pub mod sanitize;
pub mod template;
pub mod time;
