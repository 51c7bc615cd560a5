use crate::{Db2Api, Db2Connection};
use ibmi_core::{BackendKind, ConnectionParams, Driver, Error, Result, log_error};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// Driver over the native `ibm_db2` extension.
///
/// The connection string is handed to the native connect primitive together
/// with the driver options; credentials travel inside it.
#[derive(Clone)]
pub struct Db2Driver {
    api: Arc<dyn Db2Api>,
}

impl Db2Driver {
    pub fn new(api: impl Db2Api + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_arc(api: Arc<dyn Db2Api>) -> Self {
        Self { api }
    }
}

impl Debug for Db2Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db2Driver").finish_non_exhaustive()
    }
}

impl Driver for Db2Driver {
    type Connection = Db2Connection;

    const KIND: BackendKind = BackendKind::Db2;

    fn connect(&self, params: &ConnectionParams) -> Result<Db2Connection> {
        let dsn = self.dsn(params)?;
        let naming = params.naming_mode();
        let mut options = params.driver_options.clone();
        options.naming = Some(naming);
        log::debug!(
            "Connecting to `{dsn}`{}",
            if params.persistent { " (persistent)" } else { "" }
        );
        let connected = if params.persistent {
            self.api.pconnect(dsn.as_str(), None, None, &options)
        } else {
            self.api.connect(dsn.as_str(), None, None, &options)
        };
        let handle = connected.map_err(|e| {
            log_error(Error::ConnectionFailed {
                dsn: dsn.to_string(),
                cause: format!("{e:#}"),
            })
        })?;
        Ok(Db2Connection::new(handle, naming, params.persistent))
    }
}
