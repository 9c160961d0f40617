pub mod core;
pub mod ensemble;
pub mod likelihood;
pub mod scorers;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
