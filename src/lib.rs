//! Uniform connection layer for DB2 for IBM i.
//!
//! Reaches the server through the native `ibm_db2` extension ([`db2`]) or the
//! generic ODBC layer ([`odbc`]) and exposes both behind [`IbmiConnection`].
mod connection;
mod manager;

pub use ::ibmi_core::*;
pub use ::ibmi_db2 as db2;
pub use ::ibmi_odbc as odbc;
pub use connection::*;
pub use manager::*;
