pub mod backends;
pub mod market_data;
pub mod notifiers;
pub mod storage;
pub mod surfaces;
