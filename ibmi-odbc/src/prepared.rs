use crate::OdbcStatement;
use ibmi_core::{
    Bindings, Error, NativeError, Prepared, Result, RowLabeled, log_error, truncate_long,
};
use std::fmt::{self, Debug, Display, Formatter};

/// ODBC prepared statement, borrowing its connection.
pub struct OdbcPrepared<'c> {
    pub(crate) statement: Box<dyn OdbcStatement + 'c>,
    pub(crate) sql: String,
    pub(crate) bindings: Bindings,
}

impl<'c> OdbcPrepared<'c> {
    pub(crate) fn new(statement: Box<dyn OdbcStatement + 'c>, sql: &str) -> Self {
        Self {
            statement,
            sql: sql.to_string(),
            bindings: Default::default(),
        }
    }

    fn statement_error(&self, error: NativeError) -> Error {
        log_error(Error::Statement {
            sql: truncate_long!(self.sql.as_str(), true),
            native: format!("{error:#}"),
        })
    }
}

impl Prepared for OdbcPrepared<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    fn execute(&mut self) -> Result<&mut Self> {
        match self.statement.execute(self.bindings.values()) {
            Ok(true) => Ok(self),
            Ok(false) => Err(self.statement_error(NativeError::msg(
                "The statement execution reported failure",
            ))),
            Err(e) => Err(self.statement_error(e)),
        }
    }

    fn fetch(&mut self) -> Result<Option<RowLabeled>> {
        self.statement.fetch().map_err(|e| self.statement_error(e))
    }

    fn row_count(&self) -> Result<u64> {
        self.statement.row_count().map_err(|e| self.statement_error(e))
    }
}

impl Debug for OdbcPrepared<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdbcPrepared")
            .field("sql", &self.sql)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl Display for OdbcPrepared<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
