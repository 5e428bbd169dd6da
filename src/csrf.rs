pub mod binding;
pub mod guard;
pub mod memory_store;
pub mod redis_store;
pub mod store;
pub mod token;
pub mod vault;
