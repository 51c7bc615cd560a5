mod as_value;
mod connection;
mod driver;
mod dsn;
mod error;
mod params;
mod platform;
mod prepared;
mod row;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use connection::*;
pub use driver::*;
pub use dsn::*;
pub use error::*;
pub use params::*;
pub use platform::*;
pub use prepared::*;
pub use row::*;
pub use util::*;
pub use value::*;

/// Result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
/// Error reported by the native backend libraries, before translation.
pub type NativeError = anyhow::Error;
/// Result type of the native backend libraries.
pub type NativeResult<T> = anyhow::Result<T>;
