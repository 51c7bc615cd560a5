use crate::{
    BackendKind, Connection, ConnectionParams, DataSourceName, Db2IbmiPlatform, Error, Result,
};
use std::fmt::Debug;

/// Backend connector: turns connection parameters into a live `Connection`.
pub trait Driver: Debug {
    /// Concrete connection.
    type Connection: Connection;

    /// Backend served by this driver.
    const KIND: BackendKind;

    /// Driver name (used in URLs).
    fn name(&self) -> &'static str {
        Self::KIND.name()
    }

    /// Connection string the driver would hand to the native connect primitive.
    fn dsn(&self, params: &ConnectionParams) -> Result<DataSourceName> {
        DataSourceName::from_params(params, Self::KIND)
    }

    /// Connect to the database described by `params`.
    ///
    /// Parameters are validated before any native call; a native failure is
    /// reported as `Error::ConnectionFailed`.
    fn connect(&self, params: &ConnectionParams) -> Result<Self::Connection>;

    /// Connect using a URL, whose scheme must name this driver.
    fn connect_url(&self, url: &str) -> Result<Self::Connection> {
        let (kind, params) = ConnectionParams::from_url(url)?;
        if kind != Self::KIND {
            return Err(Error::configuration(
                "url",
                format!("`{kind}` URLs cannot be opened by the `{}` driver", self.name()),
            ));
        }
        self.connect(&params)
    }

    /// Database (default library) the parameters point to.
    fn database(&self, params: &ConnectionParams) -> Result<String> {
        resolve_database(params, Self::KIND)
    }

    fn platform(&self, params: &ConnectionParams) -> Db2IbmiPlatform {
        Db2IbmiPlatform::new(params.naming_mode())
    }
}

/// Database name: the library override when present, otherwise the `DATABASE`
/// named by the connection string built from the same parameters.
pub fn resolve_database(params: &ConnectionParams, kind: BackendKind) -> Result<String> {
    if let Some(library) = params.driver_options.library() {
        return Ok(library.to_string());
    }
    DataSourceName::from_params(params, kind)?
        .database()
        .ok_or_else(|| {
            Error::configuration(
                "database",
                "neither the library override nor the connection string name a database",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_precedence() {
        let params = ConnectionParams::new().database("DB").library("LIB");
        assert_eq!(resolve_database(&params, BackendKind::Db2).unwrap(), "LIB");
        let params = ConnectionParams::new().database("DB");
        assert_eq!(resolve_database(&params, BackendKind::Db2).unwrap(), "DB");
        let params = ConnectionParams::new()
            .dsn("DRIVER={IBM i Access ODBC Driver};SYSTEM=h;DATABASE=FROMDSN;")
            .user("u")
            .password("p");
        assert_eq!(resolve_database(&params, BackendKind::Odbc).unwrap(), "FROMDSN");
        let params = ConnectionParams::new().dsn("DSN=MYIBMI");
        assert!(
            resolve_database(&params, BackendKind::Db2)
                .unwrap_err()
                .is_configuration()
        );
    }
}
