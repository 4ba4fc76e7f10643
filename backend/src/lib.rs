//! DocVault: upload PDFs, extract their text, and keep it for later viewing.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the services and
//! ports, [`inbound`] adapts HTTP requests onto them, and [`outbound`]
//! implements the driven ports against PostgreSQL, the filesystem, and the
//! PDF parser.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
