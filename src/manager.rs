use crate::{IbmiBackend, IbmiConnection};
use ibmi_core::{
    BackendKind, ConnectionParams, DataSourceName, Driver, Error, Result, log_error,
};
use ibmi_db2::Db2Driver;
use ibmi_odbc::OdbcDriver;

/// Picks the backend driver for a connection request.
///
/// Only registered backends can be reached; the native libraries are handed
/// in by the caller.
#[derive(Default, Clone, Debug)]
pub struct DriverManager {
    db2: Option<Db2Driver>,
    odbc: Option<OdbcDriver>,
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db2(mut self, driver: Db2Driver) -> Self {
        self.db2 = Some(driver);
        self
    }

    pub fn with_odbc(mut self, driver: OdbcDriver) -> Self {
        self.odbc = Some(driver);
        self
    }

    fn not_registered(kind: BackendKind) -> Error {
        log_error(Error::configuration(
            "backend",
            format!("the `{kind}` backend is not registered"),
        ))
    }

    /// Connect to the database described by `params` through the `kind` backend.
    pub fn connect(&self, params: &ConnectionParams, kind: BackendKind) -> Result<IbmiConnection> {
        params.validate(kind).map_err(log_error)?;
        log::debug!("Opening a connection through the `{kind}` backend");
        let backend = match kind {
            BackendKind::Db2 => IbmiBackend::Db2(
                self.db2
                    .as_ref()
                    .ok_or_else(|| Self::not_registered(kind))?
                    .connect(params)?,
            ),
            BackendKind::Odbc => IbmiBackend::Odbc(
                self.odbc
                    .as_ref()
                    .ok_or_else(|| Self::not_registered(kind))?
                    .connect(params)?,
            ),
        };
        Ok(IbmiConnection::new(backend))
    }

    /// Connect with a URL, the scheme selects the backend.
    pub fn connect_url(&self, url: &str) -> Result<IbmiConnection> {
        let (kind, params) = ConnectionParams::from_url(url)?;
        self.connect(&params, kind)
    }

    /// Connection string `kind` would receive for `params`.
    pub fn dsn(&self, params: &ConnectionParams, kind: BackendKind) -> Result<DataSourceName> {
        DataSourceName::from_params(params, kind)
    }
}
