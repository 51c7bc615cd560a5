use crate::{Call, MockServer};
use anyhow::anyhow;
use ibmi_core::{DriverOptions, NativeResult, RowLabeled, Value, write_escaped};
use ibmi_db2::{Db2Api, Db2Handle, Db2ServerInfo, Db2Statement};
use std::collections::VecDeque;

/// Spy `ibm_db2` extension backed by a [`MockServer`].
#[derive(Clone, Debug)]
pub struct MockDb2Api {
    server: MockServer,
}

impl MockDb2Api {
    pub fn new(server: MockServer) -> Self {
        Self { server }
    }

    fn open(
        &self,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
        persistent: bool,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn Db2Handle>> {
        self.server.record(Call::Connect {
            dsn: database.into(),
            user: user.map(Into::into),
            password: password.map(Into::into),
            persistent,
        });
        let mut state = self.server.state();
        state.connect_options = Some(options.clone());
        if let Some(error) = &state.connect_failure {
            return Err(anyhow!("{error}"));
        }
        state.open_handles += 1;
        state.autocommit = true;
        Ok(Box::new(MockDb2Handle {
            server: self.server.clone(),
            error: String::new(),
            closed: false,
        }))
    }
}

impl Db2Api for MockDb2Api {
    fn connect(
        &self,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn Db2Handle>> {
        self.open(database, user, password, false, options)
    }

    fn pconnect(
        &self,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
        options: &DriverOptions,
    ) -> NativeResult<Box<dyn Db2Handle>> {
        self.open(database, user, password, true, options)
    }
}

pub struct MockDb2Handle {
    server: MockServer,
    error: String,
    closed: bool,
}

impl Db2Handle for MockDb2Handle {
    fn prepare<'s>(&'s mut self, sql: &str) -> NativeResult<Box<dyn Db2Statement + 's>> {
        self.server.record(Call::Prepare(sql.into()));
        if let Some(error) = self.server.state().prepare_failures.get(sql) {
            return Err(anyhow!("{error}"));
        }
        Ok(Box::new(MockDb2Statement {
            server: self.server.clone(),
            sql: sql.into(),
            rows: Default::default(),
            affected: None,
            error: String::new(),
        }))
    }

    fn exec(&mut self, sql: &str) -> NativeResult<u64> {
        self.server.record(Call::Exec(sql.into()));
        let (_, affected) = self.server.state().run(sql).map_err(|e| anyhow!(e))?;
        Ok(affected)
    }

    fn escape_string(&self, value: &str) -> String {
        self.server.record(Call::Quote(value.into()));
        let mut out = String::with_capacity(value.len());
        write_escaped(&mut out, value, '\'', "''");
        out
    }

    fn server_info(&self) -> Option<Db2ServerInfo> {
        self.server.record(Call::ServerVersion);
        Some(Db2ServerInfo {
            dbms_name: "AS".into(),
            dbms_ver: self.server.state().server_version.clone(),
        })
    }

    fn autocommit(&mut self, enabled: bool) -> bool {
        self.server.record(Call::Autocommit(enabled));
        let mut state = self.server.state();
        let failure = state
            .autocommit_failure
            .clone()
            .filter(|(failing, _)| *failing == enabled);
        if let Some((_, error)) = failure {
            self.error = error;
            return false;
        }
        state.autocommit = enabled;
        true
    }

    fn commit(&mut self) -> bool {
        self.server.record(Call::Commit);
        match self.server.state().commit_failure.clone() {
            Some(error) => {
                self.error = error;
                false
            }
            None => true,
        }
    }

    fn rollback(&mut self) -> bool {
        self.server.record(Call::Rollback);
        match self.server.state().rollback_failure.clone() {
            Some(error) => {
                self.error = error;
                false
            }
            None => true,
        }
    }

    fn conn_error(&self) -> String {
        self.error.clone()
    }

    fn close(&mut self) -> bool {
        self.server.record(Call::Close);
        if self.closed {
            self.error = "Connection is not open".into();
            return false;
        }
        self.closed = true;
        let mut state = self.server.state();
        state.open_handles = state.open_handles.saturating_sub(1);
        true
    }
}

pub struct MockDb2Statement {
    server: MockServer,
    sql: String,
    rows: VecDeque<RowLabeled>,
    affected: Option<u64>,
    error: String,
}

impl Db2Statement for MockDb2Statement {
    fn execute(&mut self, params: &[Value]) -> bool {
        self.server.record(Call::Execute {
            sql: self.sql.clone(),
            params: params.to_vec(),
        });
        let outcome = self.server.state().run(&self.sql);
        match outcome {
            Ok((rows, affected)) => {
                self.rows = rows;
                self.affected = Some(affected);
                true
            }
            Err(error) => {
                self.error = error;
                false
            }
        }
    }

    fn fetch_assoc(&mut self) -> Option<RowLabeled> {
        self.rows.pop_front()
    }

    fn num_rows(&self) -> Option<u64> {
        self.affected
    }

    fn error(&self) -> String {
        self.error.clone()
    }
}
