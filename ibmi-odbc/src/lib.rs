//! ODBC backend for `ibmi`, targeting the IBM i Access ODBC driver.
mod connection;
mod driver;
mod native;
mod prepared;

pub use connection::*;
pub use driver::*;
pub use native::*;
pub use prepared::*;
