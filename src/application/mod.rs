pub mod browse;
pub mod detail;
pub mod error;
pub mod filters;
pub mod mounts;
pub mod pagination;
pub mod provider;
pub mod scroll;
pub mod session;
pub mod store;
pub mod stream;
