use crate::{BackendKind, ConnectionParams, Result, params::non_empty, write_escaped};
use std::fmt::{self, Debug, Display, Formatter};

/// Connection string handed to the native connect primitive.
///
/// `Display` and `Debug` hide the password, use [`DataSourceName::as_str`] to
/// get the real value.
#[derive(Clone, PartialEq, Eq)]
pub struct DataSourceName {
    kind: BackendKind,
    value: String,
}

impl DataSourceName {
    /// Wrap an existing connection string, adding the backend scheme if missing.
    pub fn new(kind: BackendKind, value: impl Into<String>) -> Self {
        let value = value.into();
        let prefix = kind.scheme_prefix();
        let value = if value.starts_with(prefix) {
            value
        } else {
            format!("{prefix}{value}")
        };
        Self { kind, value }
    }

    /// Build the connection string of `kind` from `params`.
    ///
    /// A non empty `dsn` parameter is used verbatim. Otherwise the ODBC backend
    /// composes `DRIVER`, `SYSTEM`, `PORT`, `DATABASE`, `PROTOCOL`, while the
    /// native extension either passes the catalog alias through or composes an
    /// uncataloged string with inline credentials.
    pub fn from_params(params: &ConnectionParams, kind: BackendKind) -> Result<Self> {
        params.validate(kind)?;
        if let Some(dsn) = non_empty(&params.dsn) {
            return Ok(Self::new(kind, dsn));
        }
        let mut out = String::with_capacity(128);
        out.push_str(kind.scheme_prefix());
        match kind {
            BackendKind::Odbc => {
                push_driver(&mut out, kind);
                if let Some(host) = non_empty(&params.host) {
                    push_pair(&mut out, "SYSTEM", host);
                }
                if let Some(port) = params.port {
                    push_pair(&mut out, "PORT", &port.to_string());
                }
                if let Some(database) = &params.database {
                    push_pair(&mut out, "DATABASE", database);
                }
                push_pair(&mut out, "PROTOCOL", params.effective_protocol());
            }
            BackendKind::Db2 => {
                let database = params.database.as_deref().unwrap_or_default();
                let uncataloged = non_empty(&params.host).is_some()
                    || params.port.is_some()
                    || params.user.is_some()
                    || params.password.is_some();
                if database.contains('=') || !uncataloged {
                    out.push_str(database);
                } else {
                    push_driver(&mut out, kind);
                    if let Some(host) = non_empty(&params.host) {
                        push_pair(&mut out, "HOSTNAME", host);
                    }
                    if let Some(port) = params.port {
                        push_pair(&mut out, "PORT", &port.to_string());
                    }
                    if let Some(database) = &params.database {
                        push_pair(&mut out, "DATABASE", database);
                    }
                    push_pair(&mut out, "PROTOCOL", params.effective_protocol());
                    if let Some(user) = &params.user {
                        push_pair(&mut out, "UID", user);
                    }
                    if let Some(password) = &params.password {
                        push_pair(&mut out, "PWD", password);
                    }
                }
            }
        }
        Ok(Self { kind, value: out })
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Full connection string, scheme included.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Connection string without the backend scheme.
    pub fn body(&self) -> &str {
        &self.value[self.kind.scheme_prefix().len()..]
    }

    /// A string without any `KEY=VALUE` pair is a name cataloged on the client.
    pub fn is_cataloged(&self) -> bool {
        !self.body().contains('=')
    }

    /// The `KEY=VALUE` pairs, in order, braces removed from the values.
    pub fn parameters(&self) -> Vec<(String, String)> {
        if self.is_cataloged() {
            return Vec::new();
        }
        parse_pairs(self.body())
    }

    /// Value of `key`, compared ignoring case.
    pub fn get(&self, key: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(key).then_some(v))
    }

    /// Database named by the connection string: the catalog alias or the `DATABASE` pair.
    pub fn database(&self) -> Option<String> {
        if self.is_cataloged() {
            let alias = self.body().trim();
            return (!alias.is_empty()).then(|| alias.to_string());
        }
        self.get("DATABASE").filter(|v| !v.is_empty())
    }

    fn write_redacted(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_cataloged() {
            return f.write_str(&self.value);
        }
        let mut out = String::with_capacity(self.value.len());
        out.push_str(self.kind.scheme_prefix());
        for (key, value) in parse_pairs(self.body()) {
            if key.eq_ignore_ascii_case("PWD") || key.eq_ignore_ascii_case("PASSWORD") {
                push_pair(&mut out, &key, "***");
            } else if key.eq_ignore_ascii_case("DRIVER") {
                out.push_str(&key);
                out.push_str("={");
                out.push_str(&value);
                out.push_str("};");
            } else {
                push_pair(&mut out, &key, &value);
            }
        }
        f.write_str(&out)
    }
}

impl Display for DataSourceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_redacted(f)
    }
}

impl Debug for DataSourceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("DataSourceName(")?;
        self.write_redacted(f)?;
        f.write_str(")")
    }
}

fn push_driver(out: &mut String, kind: BackendKind) {
    out.push_str("DRIVER=");
    out.push_str(kind.driver_token());
    out.push(';');
}

/// Values containing `;` or starting with `{` are braced, with `}` doubled.
fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    if value.contains(';') || value.starts_with('{') {
        out.push('{');
        write_escaped(out, value, '}', "}}");
        out.push('}');
    } else {
        out.push_str(value);
    }
    out.push(';');
}

fn parse_pairs(body: &str) -> Vec<(String, String)> {
    let mut result = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].trim();
        rest = &rest[eq + 1..];
        let value = if let Some(braced) = rest.trim_start().strip_prefix('{') {
            let mut value = String::new();
            let mut end = braced.len();
            let mut chars = braced.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c == '}' {
                    if let Some((_, '}')) = chars.peek() {
                        chars.next();
                        value.push('}');
                        continue;
                    }
                    end = i + 1;
                    break;
                }
                value.push(c);
            }
            rest = &braced[end..];
            value
        } else {
            let end = rest.find(';').unwrap_or(rest.len());
            let value = rest[..end].trim().to_string();
            rest = &rest[end..];
            value
        };
        let next = rest.find(';').map(|v| v + 1).unwrap_or(rest.len());
        rest = &rest[next..];
        if !key.is_empty() {
            result.push((key.to_string(), value));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, NamingMode};

    #[test]
    fn odbc_field_order() {
        let params = ConnectionParams::new()
            .host("h")
            .port(8471)
            .database("DB")
            .user("u")
            .password("p");
        let dsn = DataSourceName::from_params(&params, BackendKind::Odbc).unwrap();
        assert_eq!(
            dsn.as_str(),
            "odbc:DRIVER={IBM i Access ODBC Driver};SYSTEM=h;PORT=8471;DATABASE=DB;PROTOCOL=TCPIP;"
        );
        assert!(dsn.as_str().contains("SYSTEM=h;PORT=8471;DATABASE=DB;PROTOCOL=TCPIP;"));
        assert_eq!(dsn.body(), &dsn.as_str()[5..]);
    }

    #[test]
    fn odbc_optional_fields() {
        let params = ConnectionParams::new()
            .database("DB")
            .protocol("SSL")
            .user("u")
            .password("p");
        let dsn = DataSourceName::from_params(&params, BackendKind::Odbc).unwrap();
        assert_eq!(
            dsn.as_str(),
            "odbc:DRIVER={IBM i Access ODBC Driver};DATABASE=DB;PROTOCOL=SSL;"
        );
        assert!(!dsn.as_str().contains("SYSTEM="));
        assert!(!dsn.as_str().contains("PORT="));
        let params = params.host("");
        let dsn = DataSourceName::from_params(&params, BackendKind::Odbc).unwrap();
        assert!(!dsn.as_str().contains("SYSTEM="));
    }

    #[test]
    fn raw_dsn() {
        let params = ConnectionParams::new()
            .dsn("DSN=MYIBMI")
            .database("IGNORED")
            .user("u")
            .password("p");
        let odbc = DataSourceName::from_params(&params, BackendKind::Odbc).unwrap();
        assert_eq!(odbc.as_str(), "odbc:DSN=MYIBMI");
        let db2 = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert_eq!(db2.as_str(), "DSN=MYIBMI");
        let prefixed = ConnectionParams::new()
            .dsn("odbc:DSN=MYIBMI")
            .user("u")
            .password("p");
        let odbc = DataSourceName::from_params(&prefixed, BackendKind::Odbc).unwrap();
        assert_eq!(odbc.as_str(), "odbc:DSN=MYIBMI");
    }

    #[test]
    fn db2_cataloged() {
        let params = ConnectionParams::new().database("DOCTRINE_CATALOGED");
        let dsn = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert_eq!(dsn.as_str(), "DOCTRINE_CATALOGED");
        assert!(dsn.is_cataloged());
        assert!(dsn.parameters().is_empty());
        assert_eq!(dsn.database().as_deref(), Some("DOCTRINE_CATALOGED"));
    }

    #[test]
    fn db2_uncataloged() {
        let params = ConnectionParams::new()
            .host("ibmi")
            .port(50000)
            .database("SAMPLE")
            .user("ALAN")
            .password("secret")
            .naming(NamingMode::System);
        let dsn = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert_eq!(
            dsn.as_str(),
            "DRIVER={IBM DB2 ODBC DRIVER};HOSTNAME=ibmi;PORT=50000;DATABASE=SAMPLE;PROTOCOL=TCPIP;UID=ALAN;PWD=secret;"
        );
        assert!(!dsn.is_cataloged());
        assert_eq!(dsn.database().as_deref(), Some("SAMPLE"));
        assert_eq!(dsn.get("uid").as_deref(), Some("ALAN"));
        assert_eq!(
            dsn.to_string(),
            "DRIVER={IBM DB2 ODBC DRIVER};HOSTNAME=ibmi;PORT=50000;DATABASE=SAMPLE;PROTOCOL=TCPIP;UID=ALAN;PWD=***;"
        );
        assert!(!format!("{dsn:?}").contains("secret"));
    }

    #[test]
    fn db2_full_string_in_database() {
        let full = "DRIVER={IBM DB2 ODBC DRIVER};HOSTNAME=h;PORT=1;DATABASE=D;UID=u;PWD=p;";
        let params = ConnectionParams::new().database(full).host("ignored");
        let dsn = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert_eq!(dsn.as_str(), full);
        assert_eq!(dsn.database().as_deref(), Some("D"));
    }

    #[test]
    fn library_only() {
        let params = ConnectionParams::new().library("MYLIB");
        let dsn = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert_eq!(dsn.as_str(), "");
        assert_eq!(dsn.database(), None);
    }

    #[test]
    fn braced_values() {
        let params = ConnectionParams::new()
            .host("h")
            .database("DB")
            .user("u")
            .password("a;b}c");
        let dsn = DataSourceName::from_params(&params, BackendKind::Db2).unwrap();
        assert!(dsn.as_str().ends_with("UID=u;PWD={a;b}}c};"));
        assert_eq!(dsn.get("PWD").as_deref(), Some("a;b}c"));
        assert_eq!(dsn.get("DRIVER").as_deref(), Some("IBM DB2 ODBC DRIVER"));
    }

    #[test]
    fn missing_database() {
        let error = DataSourceName::from_params(&ConnectionParams::new().host("h"), BackendKind::Db2)
            .unwrap_err();
        assert!(matches!(error, Error::Configuration { .. }));
    }
}
