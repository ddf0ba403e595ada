mod simulated;

pub use simulated::*;
