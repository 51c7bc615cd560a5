//! `ibm_db2` extension backend for `ibmi`.
mod connection;
mod driver;
mod native;
mod prepared;

pub use connection::*;
pub use driver::*;
pub use native::*;
pub use prepared::*;
