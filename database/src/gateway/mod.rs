pub mod memory;
pub mod mongo;
pub mod options;
pub mod query;
pub mod store;
