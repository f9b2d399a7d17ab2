//! Server-driven blog browser: category filters mirrored in the URL,
//! incremental loading and per-post detail views over a post-listing service.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub(crate) mod util;
