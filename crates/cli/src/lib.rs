//! Serving support for the `ebook-catalog` binary.

pub mod server;

pub use server::{build_router, start_server, AppState, FILES_PREFIX};
