pub mod filter;
pub mod session;
pub mod store;
pub mod summary;
pub mod task;
