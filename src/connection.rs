use ibmi_core::{
    AsValue, BackendKind, Bindings, Connection, ConnectionParams, Db2IbmiPlatform, Error,
    NamingMode, ParameterType, Prepared, Result, RowLabeled, Value, log_error, resolve_database,
};
use ibmi_db2::{Db2Connection, Db2Handle, Db2Prepared};
use ibmi_odbc::{OdbcConnection, OdbcHandle, OdbcPrepared};

/// Backend adapter behind an [`IbmiConnection`].
pub enum IbmiBackend {
    Db2(Db2Connection),
    Odbc(OdbcConnection),
}

/// Statement prepared by either backend.
#[derive(Debug)]
pub enum IbmiPrepared<'c> {
    Db2(Db2Prepared<'c>),
    Odbc(OdbcPrepared<'c>),
}

/// Borrowed native handle of either backend.
pub enum IbmiNativeHandle<'c> {
    Db2(&'c dyn Db2Handle),
    Odbc(&'c dyn OdbcHandle),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            IbmiBackend::Db2($inner) => $body,
            IbmiBackend::Odbc($inner) => $body,
        }
    };
}

macro_rules! dispatch_prepared {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            IbmiPrepared::Db2($inner) => $body,
            IbmiPrepared::Odbc($inner) => $body,
        }
    };
}

impl Prepared for IbmiPrepared<'_> {
    fn sql(&self) -> &str {
        dispatch_prepared!(self, v => v.sql())
    }

    fn bindings(&self) -> &Bindings {
        dispatch_prepared!(self, v => v.bindings())
    }

    fn bindings_mut(&mut self) -> &mut Bindings {
        dispatch_prepared!(self, v => v.bindings_mut())
    }

    fn execute(&mut self) -> Result<&mut Self> {
        dispatch_prepared!(&mut *self, v => {
            v.execute()?;
        });
        Ok(self)
    }

    fn fetch(&mut self) -> Result<Option<RowLabeled>> {
        dispatch_prepared!(self, v => v.fetch())
    }

    fn row_count(&self) -> Result<u64> {
        dispatch_prepared!(self, v => v.row_count())
    }
}

/// Connection to DB2 for IBM i over either backend.
///
/// Delegates the common contract to the backend adapter and adds what does
/// not depend on it: schema separator resolution, the identity lookup and the
/// database name.
///
/// ```ignore
/// let manager = DriverManager::new().with_db2(Db2Driver::new(api));
/// let mut connection = manager.connect(&ConnectionParams::new().database("MYIBMI"), BackendKind::Db2)?;
/// connection.exec("INSERT INTO MYLIB.ORDERS (NAME) VALUES ('first')")?;
/// let id: i64 = connection.last_insert_id_as()?;
/// ```
pub struct IbmiConnection {
    backend: IbmiBackend,
}

impl IbmiConnection {
    pub fn new(backend: IbmiBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> BackendKind {
        dispatch!(&self.backend, v => v.kind())
    }

    pub fn adapter(&self) -> &IbmiBackend {
        &self.backend
    }

    /// Capabilities for SQL generation, keyed by the naming mode.
    pub fn platform(&self) -> Db2IbmiPlatform {
        Db2IbmiPlatform::new(self.naming())
    }

    /// `/` with system naming, `.` with SQL naming.
    pub fn schema_separator(&self) -> char {
        self.naming().separator()
    }

    /// Last identity value generated in this session.
    ///
    /// Runs `SELECT IDENTITY_VAL_LOCAL() AS VAL FROM QSYS2<sep>QSQPTABL` and
    /// returns the `VAL` column of its row.
    pub fn last_insert_id(&mut self) -> Result<Value> {
        let sql = self.platform().identity_query();
        let mut statement = self.query(&sql)?;
        let Some(mut row) = statement.fetch()? else {
            return Err(log_error(Error::IdentityLookupFailed {
                reason: "the identity query returned no row".into(),
            }));
        };
        row.take_column("VAL").ok_or_else(|| {
            log_error(Error::IdentityLookupFailed {
                reason: "the identity query returned no `VAL` column".into(),
            })
        })
    }

    /// [`IbmiConnection::last_insert_id`] converted to `T`.
    pub fn last_insert_id_as<T: AsValue>(&mut self) -> Result<T> {
        T::try_from_value(self.last_insert_id()?)
    }

    /// Database (default library) `params` point to on this backend, without any native call.
    pub fn database(&self, params: &ConnectionParams) -> Result<String> {
        resolve_database(params, self.backend())
    }
}

impl Connection for IbmiConnection {
    type Prepared<'c> = IbmiPrepared<'c>;
    type NativeHandle<'c> = IbmiNativeHandle<'c>;

    fn kind(&self) -> BackendKind {
        self.backend()
    }

    fn naming(&self) -> NamingMode {
        dispatch!(&self.backend, v => v.naming())
    }

    fn prepare(&mut self, sql: &str) -> Result<IbmiPrepared<'_>> {
        Ok(match &mut self.backend {
            IbmiBackend::Db2(v) => IbmiPrepared::Db2(v.prepare(sql)?),
            IbmiBackend::Odbc(v) => IbmiPrepared::Odbc(v.prepare(sql)?),
        })
    }

    fn exec(&mut self, sql: &str) -> Result<u64> {
        dispatch!(&mut self.backend, v => v.exec(sql))
    }

    fn quote(&self, value: &str, kind: ParameterType) -> Result<String> {
        dispatch!(&self.backend, v => v.quote(value, kind))
    }

    fn server_version(&self) -> Result<String> {
        dispatch!(&self.backend, v => v.server_version())
    }

    fn in_transaction(&self) -> bool {
        dispatch!(&self.backend, v => v.in_transaction())
    }

    fn begin_transaction(&mut self) -> Result<bool> {
        dispatch!(&mut self.backend, v => v.begin_transaction())
    }

    fn commit(&mut self) -> Result<bool> {
        dispatch!(&mut self.backend, v => v.commit())
    }

    fn rollback(&mut self) -> Result<bool> {
        dispatch!(&mut self.backend, v => v.rollback())
    }

    fn native_handle(&self) -> IbmiNativeHandle<'_> {
        match &self.backend {
            IbmiBackend::Db2(v) => IbmiNativeHandle::Db2(v.native_handle()),
            IbmiBackend::Odbc(v) => IbmiNativeHandle::Odbc(v.native_handle()),
        }
    }

    fn close(self) -> Result<()> {
        dispatch!(self.backend, v => v.close())
    }
}
