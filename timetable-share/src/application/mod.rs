pub mod dto;
pub mod error;
pub mod payload;
pub mod share;
pub mod url_budget;
