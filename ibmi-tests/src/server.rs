use ibmi_core::{Db2IbmiPlatform, DriverOptions, NamingMode, RowLabeled, RowNames, Value};
use ibmi_db2::Db2Api;
use ibmi_odbc::OdbcApi;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{MockDb2Api, MockOdbcApi};

/// Native call observed by the mock server.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Connect {
        dsn: String,
        user: Option<String>,
        password: Option<String>,
        persistent: bool,
    },
    RaiseOnError(bool),
    Prepare(String),
    Execute { sql: String, params: Vec<Value> },
    Exec(String),
    Quote(String),
    ServerVersion,
    Autocommit(bool),
    Begin,
    Commit,
    Rollback,
    Close,
}

/// Scripted result set.
#[derive(Default, Clone, Debug)]
pub struct ResultSet {
    pub labels: RowNames,
    pub rows: Vec<Box<[Value]>>,
}

impl ResultSet {
    pub fn new(labels: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            labels: labels.iter().map(|v| v.to_string()).collect(),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn cursor(&self) -> VecDeque<RowLabeled> {
        self.rows
            .iter()
            .map(|v| RowLabeled::new(self.labels.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct State {
    pub(crate) calls: Vec<Call>,
    pub(crate) results: HashMap<String, ResultSet>,
    pub(crate) affected: HashMap<String, u64>,
    pub(crate) prepare_failures: HashMap<String, String>,
    pub(crate) execute_failures: HashMap<String, String>,
    pub(crate) connect_failure: Option<String>,
    pub(crate) commit_failure: Option<String>,
    pub(crate) rollback_failure: Option<String>,
    pub(crate) autocommit_failure: Option<(bool, String)>,
    pub(crate) server_version: String,
    pub(crate) autocommit: bool,
    pub(crate) open_handles: usize,
    pub(crate) connect_options: Option<DriverOptions>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            calls: Default::default(),
            results: Default::default(),
            affected: Default::default(),
            prepare_failures: Default::default(),
            execute_failures: Default::default(),
            connect_failure: None,
            commit_failure: None,
            rollback_failure: None,
            autocommit_failure: None,
            server_version: "07.05.0000".into(),
            autocommit: true,
            open_handles: 0,
            connect_options: None,
        }
    }
}

impl State {
    /// Outcome of running `sql`: the rows it yields and the rows it affects.
    pub(crate) fn run(&mut self, sql: &str) -> Result<(VecDeque<RowLabeled>, u64), String> {
        if let Some(error) = self.execute_failures.get(sql) {
            return Err(error.clone());
        }
        let rows = self
            .results
            .get(sql)
            .map(ResultSet::cursor)
            .unwrap_or_default();
        let affected = self
            .affected
            .get(sql)
            .copied()
            .unwrap_or(rows.len() as u64);
        Ok((rows, affected))
    }
}

/// In memory stand-in for an IBM i server, shared by the spy native backends.
///
/// Records every native call and answers from scripted results. Clones share
/// the same state.
#[derive(Clone, Debug, Default)]
pub struct MockServer {
    pub(crate) state: Arc<Mutex<State>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    /// Rows returned by `sql`.
    pub fn with_result(&self, sql: &str, labels: &[&str], rows: Vec<Vec<Value>>) -> &Self {
        self.state()
            .results
            .insert(sql.into(), ResultSet::new(labels, rows));
        self
    }

    /// Rows affected by `sql`.
    pub fn with_affected(&self, sql: &str, affected: u64) -> &Self {
        self.state().affected.insert(sql.into(), affected);
        self
    }

    /// Answer the identity lookup of both naming modes with `value`, or with no row when `None`.
    pub fn with_identity(&self, value: Option<Value>) -> &Self {
        for naming in [NamingMode::Sql, NamingMode::System] {
            let sql = Db2IbmiPlatform::new(naming).identity_query();
            let rows = value.iter().map(|v| vec![v.clone()]).collect();
            self.with_result(&sql, &["VAL"], rows);
        }
        self
    }

    pub fn with_server_version(&self, version: &str) -> &Self {
        self.state().server_version = version.into();
        self
    }

    pub fn fail_prepare(&self, sql: &str, message: &str) -> &Self {
        self.state()
            .prepare_failures
            .insert(sql.into(), message.into());
        self
    }

    /// Make both direct execution and prepared execution of `sql` fail.
    pub fn fail_execute(&self, sql: &str, message: &str) -> &Self {
        self.state()
            .execute_failures
            .insert(sql.into(), message.into());
        self
    }

    pub fn fail_connect(&self, message: Option<&str>) -> &Self {
        self.state().connect_failure = message.map(Into::into);
        self
    }

    pub fn fail_commit(&self, message: Option<&str>) -> &Self {
        self.state().commit_failure = message.map(Into::into);
        self
    }

    pub fn fail_rollback(&self, message: Option<&str>) -> &Self {
        self.state().rollback_failure = message.map(Into::into);
        self
    }

    /// Make switching autocommit to `enabled` fail, `None` clears the failure.
    pub fn fail_autocommit(&self, failure: Option<(bool, &str)>) -> &Self {
        self.state().autocommit_failure = failure.map(|(enabled, v)| (enabled, v.into()));
        self
    }

    /// Native calls observed so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|v| predicate(v)).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Whether the session runs in autocommit mode on the server side.
    pub fn autocommit(&self) -> bool {
        self.state().autocommit
    }

    /// Native handles opened and not yet released.
    pub fn open_handles(&self) -> usize {
        self.state().open_handles
    }

    /// Driver options received by the last native connect.
    pub fn connect_options(&self) -> Option<DriverOptions> {
        self.state().connect_options.clone()
    }

    pub fn db2(&self) -> MockDb2Api {
        MockDb2Api::new(self.clone())
    }

    pub fn odbc(&self) -> MockOdbcApi {
        MockOdbcApi::new(self.clone())
    }

    pub fn db2_api(&self) -> Arc<dyn Db2Api> {
        Arc::new(self.db2())
    }

    pub fn odbc_api(&self) -> Arc<dyn OdbcApi> {
        Arc::new(self.odbc())
    }
}
