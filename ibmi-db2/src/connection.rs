use crate::{Db2Handle, Db2Prepared};
use ibmi_core::{
    BackendKind, Connection, Error, NamingMode, ParameterType, Result, log_error, truncate_long,
};

/// Connection over a native `ibm_db2` resource.
///
/// The resource is closed exactly once: by [`Connection::close`] or, when
/// that was not called, on drop.
pub struct Db2Connection {
    pub(crate) handle: Box<dyn Db2Handle>,
    pub(crate) naming: NamingMode,
    pub(crate) persistent: bool,
    pub(crate) in_transaction: bool,
    pub(crate) closed: bool,
}

impl Db2Connection {
    pub(crate) fn new(handle: Box<dyn Db2Handle>, naming: NamingMode, persistent: bool) -> Self {
        Self {
            handle,
            naming,
            persistent,
            in_transaction: false,
            closed: false,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn connection_error(&self, context: &str) -> Error {
        log_error(Error::Connection {
            native: format!("{context}: {}", self.handle.conn_error()),
        })
    }

    /// Back to autocommit once the unit of work ended on the server.
    ///
    /// The state leaves IN_TRANSACTION only when the session is really in
    /// autocommit mode again.
    fn end_transaction(&mut self, ended: &str) -> Result<bool> {
        if !self.handle.autocommit(true) {
            return Err(self.connection_error(&format!(
                "Transaction {ended}, but autocommit could not be enabled again"
            )));
        }
        self.in_transaction = false;
        log::debug!("Transaction {ended}");
        Ok(true)
    }
}

impl Connection for Db2Connection {
    type Prepared<'c> = Db2Prepared<'c>;
    type NativeHandle<'c> = &'c dyn Db2Handle;

    fn kind(&self) -> BackendKind {
        BackendKind::Db2
    }

    fn naming(&self) -> NamingMode {
        self.naming
    }

    fn prepare(&mut self, sql: &str) -> Result<Db2Prepared<'_>> {
        let statement = self.handle.prepare(sql).map_err(|e| {
            log_error(Error::PrepareFailed {
                sql: truncate_long!(sql, true),
                native: format!("{e:#}"),
            })
        })?;
        Ok(Db2Prepared::new(statement, sql))
    }

    fn exec(&mut self, sql: &str) -> Result<u64> {
        self.handle.exec(sql).map_err(|e| {
            log_error(Error::Statement {
                sql: truncate_long!(sql, true),
                native: format!("{e:#}"),
            })
        })
    }

    fn quote(&self, value: &str, kind: ParameterType) -> Result<String> {
        let escaped = self.handle.escape_string(value);
        Ok(match kind {
            ParameterType::Integer => escaped,
            ParameterType::String => format!("'{escaped}'"),
        })
    }

    fn server_version(&self) -> Result<String> {
        self.handle
            .server_info()
            .map(|v| v.dbms_ver)
            .ok_or_else(|| self.connection_error("While reading the server information"))
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn begin_transaction(&mut self) -> Result<bool> {
        if self.in_transaction {
            log::warn!("A transaction is already active, begin_transaction has no effect");
            return Ok(true);
        }
        if !self.handle.autocommit(false) {
            log::warn!(
                "Could not disable autocommit: {}",
                self.handle.conn_error()
            );
            return Ok(false);
        }
        log::debug!("Transaction started");
        self.in_transaction = true;
        Ok(true)
    }

    fn commit(&mut self) -> Result<bool> {
        if !self.in_transaction {
            log::debug!("No active transaction, commit has no effect");
            return Ok(true);
        }
        if !self.handle.commit() {
            return Err(self.connection_error("While committing the transaction"));
        }
        self.end_transaction("committed")
    }

    fn rollback(&mut self) -> Result<bool> {
        if !self.in_transaction {
            log::debug!("No active transaction, rollback has no effect");
            return Ok(true);
        }
        if !self.handle.rollback() {
            return Err(self.connection_error("While rolling back the transaction"));
        }
        self.end_transaction("rolled back")
    }

    fn native_handle(&self) -> &dyn Db2Handle {
        self.handle.as_ref()
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        if !self.handle.close() {
            return Err(self.connection_error("While closing the connection"));
        }
        log::debug!("Connection closed");
        Ok(())
    }
}

impl Drop for Db2Connection {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.handle.close() {
            log::error!(
                "While closing the connection on drop: {}",
                self.handle.conn_error()
            );
        }
    }
}
