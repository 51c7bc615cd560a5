use crate::{OdbcHandle, OdbcPrepared};
use ibmi_core::{
    BackendKind, Connection, Error, ErrorContext, NamingMode, NativeError, ParameterType, Result,
    log_error, truncate_long,
};

/// Connection over the generic ODBC layer, raising on every native failure.
pub struct OdbcConnection {
    pub(crate) handle: Box<dyn OdbcHandle>,
    pub(crate) naming: NamingMode,
    pub(crate) in_transaction: bool,
}

impl OdbcConnection {
    pub(crate) fn new(handle: Box<dyn OdbcHandle>, naming: NamingMode) -> Self {
        Self {
            handle,
            naming,
            in_transaction: false,
        }
    }
}

fn connection_error(error: NativeError) -> Error {
    log_error(Error::Connection {
        native: format!("{error:#}"),
    })
}

impl Connection for OdbcConnection {
    type Prepared<'c> = OdbcPrepared<'c>;
    type NativeHandle<'c> = &'c dyn OdbcHandle;

    fn kind(&self) -> BackendKind {
        BackendKind::Odbc
    }

    fn naming(&self) -> NamingMode {
        self.naming
    }

    fn prepare(&mut self, sql: &str) -> Result<OdbcPrepared<'_>> {
        let statement = self.handle.prepare(sql).map_err(|e| {
            log_error(Error::PrepareFailed {
                sql: truncate_long!(sql, true),
                native: format!("{e:#}"),
            })
        })?;
        Ok(OdbcPrepared::new(statement, sql))
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
        self.handle
            .quote(value, kind)
            .context("While quoting a value")
            .map_err(connection_error)
    }

    fn server_version(&self) -> Result<String> {
        self.handle
            .server_version()
            .context("While reading the server version")
            .map_err(connection_error)
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn begin_transaction(&mut self) -> Result<bool> {
        if self.in_transaction {
            log::warn!("A transaction is already active, begin_transaction has no effect");
            return Ok(true);
        }
        let started = self
            .handle
            .begin_transaction()
            .context("While starting a transaction")
            .map_err(connection_error)?;
        if started {
            log::debug!("Transaction started");
            self.in_transaction = true;
        }
        Ok(started)
    }

    fn commit(&mut self) -> Result<bool> {
        if !self.in_transaction {
            log::debug!("No active transaction, commit has no effect");
            return Ok(true);
        }
        let committed = self
            .handle
            .commit()
            .context("While committing the transaction")
            .map_err(connection_error)?;
        if committed {
            log::debug!("Transaction committed");
            self.in_transaction = false;
        }
        Ok(committed)
    }

    fn rollback(&mut self) -> Result<bool> {
        if !self.in_transaction {
            log::debug!("No active transaction, rollback has no effect");
            return Ok(true);
        }
        let rolled_back = self
            .handle
            .rollback()
            .context("While rolling back the transaction")
            .map_err(connection_error)?;
        if rolled_back {
            log::debug!("Transaction rolled back");
            self.in_transaction = false;
        }
        Ok(rolled_back)
    }

    fn native_handle(&self) -> &dyn OdbcHandle {
        self.handle.as_ref()
    }

    fn close(self) -> Result<()> {
        drop(self.handle);
        log::debug!("Connection closed");
        Ok(())
    }
}
