pub mod category;
pub mod resolution;
pub mod store;
