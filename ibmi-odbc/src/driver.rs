use crate::{OdbcApi, OdbcConnection};
use ibmi_core::{BackendKind, ConnectionParams, Driver, Error, Result, log_error};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// Driver over the generic ODBC layer and the IBM i Access ODBC driver.
///
/// Credentials are passed to the native connect call separately from the
/// `odbc:` connection string.
#[derive(Clone)]
pub struct OdbcDriver {
    api: Arc<dyn OdbcApi>,
}

impl OdbcDriver {
    pub fn new(api: impl OdbcApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_arc(api: Arc<dyn OdbcApi>) -> Self {
        Self { api }
    }
}

impl Debug for OdbcDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdbcDriver").finish_non_exhaustive()
    }
}

impl Driver for OdbcDriver {
    type Connection = OdbcConnection;

    const KIND: BackendKind = BackendKind::Odbc;

    fn connect(&self, params: &ConnectionParams) -> Result<OdbcConnection> {
        let dsn = self.dsn(params)?;
        let naming = params.naming_mode();
        let mut options = params.driver_options.clone();
        options.naming = Some(naming);
        let user = params.user.as_deref().unwrap_or_default();
        let password = params.password.as_deref().unwrap_or_default();
        log::debug!(
            "Connecting to `{dsn}` as `{user}`{}",
            if params.persistent { " (persistent)" } else { "" }
        );
        let connection_failed = |e: ibmi_core::NativeError| {
            log_error(Error::ConnectionFailed {
                dsn: dsn.to_string(),
                cause: format!("{e:#}"),
            })
        };
        let mut handle = self
            .api
            .connect(dsn.as_str(), user, password, params.persistent, &options)
            .map_err(connection_failed)?;
        handle.set_raise_on_error(true).map_err(connection_failed)?;
        Ok(OdbcConnection::new(handle, naming))
    }
}
