use ibmi_core::{DriverOptions, NativeResult, ParameterType, RowLabeled, Value};

/// Entry point of the generic ODBC data-access layer.
pub trait OdbcApi: Send + Sync {
    /// Open a connection. `dsn` carries the `odbc:` scheme prefix.
    fn connect(
        &self,
        dsn: &str,
        user: &str,
        password: &str,
        persistent: bool,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn OdbcHandle>>;
}

/// A native ODBC connection, released when dropped.
///
/// Every failure is raised as an error once raise-on-error is enabled.
pub trait OdbcHandle: Send {
    fn set_raise_on_error(&mut self, enabled: bool) -> NativeResult<()>;
    /// Execute a statement without result set, returning the affected rows.
    fn exec(&mut self, sql: &str) -> NativeResult<u64>;
    fn prepare<'s>(&'s mut self, sql: &str) -> NativeResult<Box<dyn OdbcStatement + 's>>;
    /// Quote `value` for interpolation, honoring the parameter type hint.
    fn quote(&self, value: &str, kind: ParameterType) -> NativeResult<String>;
    fn server_version(&self) -> NativeResult<String>;
    fn begin_transaction(&mut self) -> NativeResult<bool>;
    fn commit(&mut self) -> NativeResult<bool>;
    fn rollback(&mut self) -> NativeResult<bool>;
}

/// A native ODBC statement.
pub trait OdbcStatement {
    fn execute(&mut self, params: &[Value]) -> NativeResult<bool>;
    /// Next row, `None` once the result set is exhausted.
    fn fetch(&mut self) -> NativeResult<Option<RowLabeled>>;
    fn row_count(&self) -> NativeResult<u64>;
}
