use crate::{BackendKind, NamingMode, Prepared, Result};

/// How a value interpolated by `quote` is rendered.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterType {
    /// Escaped and wrapped in single quotes.
    #[default]
    String,
    /// Escaped, left unwrapped.
    Integer,
}

/// A live database session over one native handle.
///
/// Both backends implement it; the handle is owned exclusively and released
/// exactly once, by `close` or when the connection is dropped.
///
/// # Transactions
/// The session starts in autocommit mode. `begin_transaction` disables
/// autocommit, `commit` and `rollback` end the unit of work and enable it
/// again. Calling `commit` or `rollback` outside a transaction, or
/// `begin_transaction` inside one, does nothing and returns `Ok(true)`.
pub trait Connection {
    /// Prepared statement, borrowing the connection.
    type Prepared<'c>: Prepared
    where
        Self: 'c;
    /// Borrowed view of the native handle.
    type NativeHandle<'c>
    where
        Self: 'c;

    fn kind(&self) -> BackendKind;

    /// Naming mode fixed at connect time.
    fn naming(&self) -> NamingMode;

    /// Prepare `sql`. Only failures reported by the backend are errors.
    fn prepare(&mut self, sql: &str) -> Result<Self::Prepared<'_>>;

    /// Prepare and execute `sql`, returning the statement positioned before the first row.
    fn query(&mut self, sql: &str) -> Result<Self::Prepared<'_>> {
        let mut prepared = self.prepare(sql)?;
        prepared.execute()?;
        Ok(prepared)
    }

    /// Execute a statement without result set, returning the affected rows.
    fn exec(&mut self, sql: &str) -> Result<u64>;

    /// Escape `value` with the native escaping primitive for interpolation in SQL.
    fn quote(&self, value: &str, kind: ParameterType) -> Result<String>;

    fn server_version(&self) -> Result<String>;

    fn in_transaction(&self) -> bool;

    fn begin_transaction(&mut self) -> Result<bool>;

    fn commit(&mut self) -> Result<bool>;

    fn rollback(&mut self) -> Result<bool>;

    /// The native handle, for callers needing direct backend access.
    ///
    /// Ownership stays with the connection, the handle must not be closed through this reference.
    fn native_handle(&self) -> Self::NativeHandle<'_>;

    /// Release the native handle.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
