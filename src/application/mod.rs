pub mod alerts;
pub mod chat;
pub mod cli;
pub mod dashboard;
pub mod filings;
