use ibmi_core::{DriverOptions, NativeResult, RowLabeled, Value};

/// Server information reported by `db2_server_info`.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Db2ServerInfo {
    /// `DBMS_NAME`, for example `AS`.
    pub dbms_name: String,
    /// `DBMS_VER`, for example `07.05.0000`.
    pub dbms_ver: String,
}

/// Entry points of the `ibm_db2` client library.
///
/// Connect receives the connection string built by the driver (a catalog alias
/// or an uncataloged string with inline credentials), no separate user and
/// password, and the driver options.
pub trait Db2Api: Send + Sync {
    /// `db2_connect`.
    fn connect(
        &self,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn Db2Handle>>;

    /// `db2_pconnect`: reuse a persistent connection of the process when one matches.
    fn pconnect(
        &self,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn Db2Handle>>;
}

/// A native `ibm_db2` connection resource.
///
/// Transaction primitives follow the C convention of the extension: they
/// return `false` on failure and the diagnostic is read with `conn_error`.
pub trait Db2Handle: Send {
    /// `db2_prepare`.
    fn prepare<'s>(&'s mut self, sql: &str) -> NativeResult<Box<dyn Db2Statement + 's>>;
    /// `db2_exec` followed by `db2_num_rows`.
    fn exec(&mut self, sql: &str) -> NativeResult<u64>;
    /// `db2_escape_string`.
    fn escape_string(&self, value: &str) -> String;
    /// `db2_server_info`.
    fn server_info(&self) -> Option<Db2ServerInfo>;
    /// `db2_autocommit` with `DB2_AUTOCOMMIT_ON` / `DB2_AUTOCOMMIT_OFF`.
    fn autocommit(&mut self, enabled: bool) -> bool;
    /// `db2_commit`.
    fn commit(&mut self) -> bool;
    /// `db2_rollback`.
    fn rollback(&mut self) -> bool;
    /// `db2_conn_errormsg`.
    fn conn_error(&self) -> String;
    /// `db2_close`.
    fn close(&mut self) -> bool;
}

/// A native `ibm_db2` statement resource.
pub trait Db2Statement {
    /// `db2_execute`.
    fn execute(&mut self, params: &[Value]) -> bool;
    /// `db2_fetch_assoc`, `None` once the result set is exhausted.
    fn fetch_assoc(&mut self) -> Option<RowLabeled>;
    /// `db2_num_rows`.
    fn num_rows(&self) -> Option<u64>;
    /// `db2_stmt_errormsg`.
    fn error(&self) -> String;
}
