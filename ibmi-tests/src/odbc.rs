use crate::{Call, MockServer};
use anyhow::{anyhow, bail};
use ibmi_core::{
    DriverOptions, NativeResult, ParameterType, RowLabeled, Value, write_escaped,
};
use ibmi_odbc::{OdbcApi, OdbcHandle, OdbcStatement};
use std::collections::VecDeque;

/// Spy ODBC layer backed by a [`MockServer`].
///
/// Failures are raised only once raise-on-error was enabled, otherwise they
/// are reported as `false` or as empty results.
#[derive(Clone, Debug)]
pub struct MockOdbcApi {
    server: MockServer,
}

impl MockOdbcApi {
    pub fn new(server: MockServer) -> Self {
        Self { server }
    }
}

impl OdbcApi for MockOdbcApi {
    fn connect(
        &self,
        dsn: &str,
        user: &str,
        password: &str,
        persistent: bool,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn OdbcHandle>> {
        self.server.record(Call::Connect {
            dsn: dsn.into(),
            user: Some(user.into()),
            password: Some(password.into()),
            persistent,
        });
        let mut state = self.server.state();
        state.connect_options = Some(options.clone());
        if let Some(error) = &state.connect_failure {
            bail!("SQLSTATE[08001] SQLDriverConnect: {error}");
        }
        state.open_handles += 1;
        state.autocommit = true;
        Ok(Box::new(MockOdbcHandle {
            server: self.server.clone(),
            raise: false,
        }))
    }
}

pub struct MockOdbcHandle {
    server: MockServer,
    raise: bool,
}

impl MockOdbcHandle {
    fn fail<T: Default>(&self, error: String) -> NativeResult<T> {
        if self.raise {
            Err(anyhow!("SQLSTATE[HY000]: {error}"))
        } else {
            Ok(T::default())
        }
    }
}

impl OdbcHandle for MockOdbcHandle {
    fn set_raise_on_error(&mut self, enabled: bool) -> NativeResult<()> {
        self.server.record(Call::RaiseOnError(enabled));
        self.raise = enabled;
        Ok(())
    }

    fn exec(&mut self, sql: &str) -> NativeResult<u64> {
        self.server.record(Call::Exec(sql.into()));
        let outcome = self.server.state().run(sql);
        match outcome {
            Ok((_, affected)) => Ok(affected),
            Err(error) => self.fail(error),
        }
    }

    fn prepare<'s>(&'s mut self, sql: &str) -> NativeResult<Box<dyn OdbcStatement + 's>> {
        self.server.record(Call::Prepare(sql.into()));
        if let Some(error) = self.server.state().prepare_failures.get(sql) {
            return Err(anyhow!("SQLSTATE[42S02]: {error}"));
        }
        Ok(Box::new(MockOdbcStatement {
            server: self.server.clone(),
            sql: sql.into(),
            rows: Default::default(),
            affected: 0,
            raise: self.raise,
        }))
    }

    fn quote(&self, value: &str, kind: ParameterType) -> NativeResult<String> {
        self.server.record(Call::Quote(value.into()));
        let mut out = String::with_capacity(value.len() + 2);
        match kind {
            ParameterType::Integer => write_escaped(&mut out, value, '\'', "''"),
            ParameterType::String => {
                out.push('\'');
                write_escaped(&mut out, value, '\'', "''");
                out.push('\'');
            }
        }
        Ok(out)
    }

    fn server_version(&self) -> NativeResult<String> {
        self.server.record(Call::ServerVersion);
        Ok(self.server.state().server_version.clone())
    }

    fn begin_transaction(&mut self) -> NativeResult<bool> {
        self.server.record(Call::Begin);
        self.server.state().autocommit = false;
        Ok(true)
    }

    fn commit(&mut self) -> NativeResult<bool> {
        self.server.record(Call::Commit);
        let failure = self.server.state().commit_failure.clone();
        if let Some(error) = failure {
            return self.fail(error);
        }
        self.server.state().autocommit = true;
        Ok(true)
    }

    fn rollback(&mut self) -> NativeResult<bool> {
        self.server.record(Call::Rollback);
        let failure = self.server.state().rollback_failure.clone();
        if let Some(error) = failure {
            return self.fail(error);
        }
        self.server.state().autocommit = true;
        Ok(true)
    }
}

impl Drop for MockOdbcHandle {
    fn drop(&mut self) {
        self.server.record(Call::Close);
        let mut state = self.server.state();
        state.open_handles = state.open_handles.saturating_sub(1);
    }
}

pub struct MockOdbcStatement {
    server: MockServer,
    sql: String,
    rows: VecDeque<RowLabeled>,
    affected: u64,
    raise: bool,
}

impl OdbcStatement for MockOdbcStatement {
    fn execute(&mut self, params: &[Value]) -> NativeResult<bool> {
        self.server.record(Call::Execute {
            sql: self.sql.clone(),
            params: params.to_vec(),
        });
        let outcome = self.server.state().run(&self.sql);
        match outcome {
            Ok((rows, affected)) => {
                self.rows = rows;
                self.affected = affected;
                Ok(true)
            }
            Err(error) if self.raise => Err(anyhow!("SQLSTATE[HY000]: {error}")),
            Err(..) => Ok(false),
        }
    }

    fn fetch(&mut self) -> NativeResult<Option<RowLabeled>> {
        Ok(self.rows.pop_front())
    }

    fn row_count(&self) -> NativeResult<u64> {
        Ok(self.affected)
    }
}
