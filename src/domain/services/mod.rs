pub mod actions;
mod alert_monitor;
mod alerts;
pub mod calculations;
mod chat_archive;
mod chat_store;
mod citations;
pub mod evaluation;
mod filings;
pub mod formatters;
mod grid;
mod highlight;
mod preferences;
pub mod validation;

pub use alert_monitor::*;
pub use alerts::*;
pub use chat_archive::*;
pub use chat_store::*;
pub use citations::*;
pub use filings::*;
pub use grid::*;
pub use highlight::*;
pub use preferences::*;
