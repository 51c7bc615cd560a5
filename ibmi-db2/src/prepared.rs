use crate::Db2Statement;
use ibmi_core::{Bindings, Error, Prepared, Result, RowLabeled, log_error, truncate_long};
use std::fmt::{self, Debug, Display, Formatter};

/// Statement prepared through `db2_prepare`, borrowing its connection.
pub struct Db2Prepared<'c> {
    pub(crate) statement: Box<dyn Db2Statement + 'c>,
    pub(crate) sql: String,
    pub(crate) bindings: Bindings,
    pub(crate) executed: bool,
}

impl<'c> Db2Prepared<'c> {
    pub(crate) fn new(statement: Box<dyn Db2Statement + 'c>, sql: &str) -> Self {
        Self {
            statement,
            sql: sql.to_string(),
            bindings: Default::default(),
            executed: false,
        }
    }

    fn statement_error(&self, native: String) -> Error {
        log_error(Error::Statement {
            sql: truncate_long!(self.sql.as_str(), true),
            native,
        })
    }
}

impl Prepared for Db2Prepared<'_> {
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
        if !self.statement.execute(self.bindings.values()) {
            let native = self.statement.error();
            return Err(self.statement_error(native));
        }
        self.executed = true;
        Ok(self)
    }

    fn fetch(&mut self) -> Result<Option<RowLabeled>> {
        if !self.executed {
            return Err(self.statement_error("The statement was not executed".into()));
        }
        Ok(self.statement.fetch_assoc())
    }

    fn row_count(&self) -> Result<u64> {
        self.statement
            .num_rows()
            .ok_or_else(|| self.statement_error(self.statement.error()))
    }
}

impl Debug for Db2Prepared<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db2Prepared")
            .field("sql", &self.sql)
            .field("bindings", &self.bindings)
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}

impl Display for Db2Prepared<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
