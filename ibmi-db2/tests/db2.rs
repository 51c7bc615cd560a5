#[cfg(test)]
mod tests {
    use ibmi_core::{
        Connection, ConnectionParams, Driver, DriverOptions, Error, NamingMode, Prepared,
    };
    use ibmi_db2::Db2Driver;
    use ibmi_tests::{Call, MockServer, execute_tests, init_logs, silent_logs};

    fn driver(server: &MockServer) -> Db2Driver {
        Db2Driver::from_arc(server.db2_api())
    }

    #[test]
    fn db2() {
        init_logs();
        let server = MockServer::new();
        let connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        execute_tests(connection, &server);
        assert_eq!(server.open_handles(), 0);
    }

    #[test]
    fn cataloged_connect() {
        init_logs();
        let server = MockServer::new();
        let connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI").library("APPLIB"))
            .expect("Could not connect");
        assert_eq!(
            server.calls()[0],
            Call::Connect {
                dsn: "MYIBMI".into(),
                user: None,
                password: None,
                persistent: false,
            }
        );
        let options = server.connect_options().expect("No connect recorded");
        assert_eq!(options.library(), Some("APPLIB"));
        assert_eq!(options.naming, Some(NamingMode::Sql));
        assert!(!connection.is_persistent());
    }

    #[test]
    fn uncataloged_connect() {
        init_logs();
        let server = MockServer::new();
        let params = ConnectionParams::new()
            .host("ibmi.example.com")
            .port(8471)
            .database("*LOCAL")
            .user("QUSER")
            .password("secret;1")
            .naming(NamingMode::System)
            .persistent(true);
        let connection = driver(&server)
            .connect(&params)
            .expect("Could not connect");
        assert_eq!(
            server.calls()[0],
            Call::Connect {
                dsn: "DRIVER={IBM DB2 ODBC DRIVER};HOSTNAME=ibmi.example.com;PORT=8471;\
                      DATABASE=*LOCAL;PROTOCOL=TCPIP;UID=QUSER;PWD={secret;1};"
                    .into(),
                user: None,
                password: None,
                persistent: true,
            }
        );
        assert!(connection.is_persistent());
        assert_eq!(connection.naming(), NamingMode::System);
        assert_eq!(
            server.connect_options().and_then(|v| v.naming),
            Some(NamingMode::System)
        );
    }

    #[test]
    fn naming_from_driver_options() {
        init_logs();
        let server = MockServer::new();
        let params = ConnectionParams::new()
            .database("MYIBMI")
            .driver_options(DriverOptions {
                naming: Some(NamingMode::System),
                ..Default::default()
            });
        let connection = driver(&server)
            .connect(&params)
            .expect("Could not connect");
        assert_eq!(connection.naming(), NamingMode::System);
        assert_eq!(driver(&server).platform(&params).schema_separator(), '/');
    }

    #[test]
    fn configuration_errors_do_not_reach_the_native_layer() {
        init_logs();
        let server = MockServer::new();
        let error = silent_logs! {
            driver(&server)
                .connect(&ConnectionParams::new().host("ibmi.example.com"))
                .err()
                .expect("Connect without database should fail")
        };
        assert!(error.is_configuration(), "{error:#}");
        let error = silent_logs! {
            driver(&server)
                .connect(&ConnectionParams::new().database("MYIBMI").port(0))
                .err()
                .expect("Connect with port 0 should fail")
        };
        assert!(error.is_configuration(), "{error:#}");
        assert!(server.calls().is_empty());
    }

    #[test]
    fn connection_failure() {
        init_logs();
        let server = MockServer::new();
        server.fail_connect(Some("SQL30081N A communication error has been detected."));
        let params = ConnectionParams::new()
            .host("ibmi.example.com")
            .database("*LOCAL")
            .user("QUSER")
            .password("hunter2");
        let error = silent_logs! {
            driver(&server)
                .connect(&params)
                .err()
                .expect("Connect should fail")
        };
        match error {
            Error::ConnectionFailed { dsn, cause } => {
                assert!(cause.contains("SQL30081N"), "{cause}");
                assert!(dsn.contains("HOSTNAME=ibmi.example.com"), "{dsn}");
                assert!(!dsn.contains("hunter2"), "{dsn}");
            }
            other => panic!("Unexpected error: {other:#}"),
        }
        assert_eq!(server.open_handles(), 0);
    }

    #[test]
    fn drop_closes_once() {
        init_logs();
        let server = MockServer::new();
        let mut connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        server.with_result("SELECT 1 FROM SYSIBM.SYSDUMMY1", &["1"], vec![]);
        let rows = connection
            .query("SELECT 1 FROM SYSIBM.SYSDUMMY1")
            .expect("Could not run the query")
            .fetch_all()
            .expect("Could not fetch");
        assert!(rows.is_empty());
        assert_eq!(server.open_handles(), 1);
        drop(connection);
        assert_eq!(server.open_handles(), 0);
        assert_eq!(server.count(|v| *v == Call::Close), 1);
    }

    #[test]
    fn fetch_before_execute() {
        init_logs();
        let server = MockServer::new();
        let mut connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        let mut statement = connection
            .prepare("SELECT 1 FROM SYSIBM.SYSDUMMY1")
            .expect("Could not prepare");
        let error = silent_logs! {
            statement.fetch().expect_err("Fetch before execute should fail")
        };
        assert!(matches!(error, Error::Statement { .. }), "{error:#}");
    }

    #[test]
    fn commit_keeps_the_transaction_until_autocommit_is_back() {
        init_logs();
        let server = MockServer::new();
        let mut connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        assert!(connection.begin_transaction().expect("Could not begin"));
        connection
            .exec("INSERT INTO MYLIB.ORDERS (ID) VALUES (1)")
            .expect("Could not insert");
        server.fail_autocommit(Some((true, "SQL7008 ORDERS in MYLIB not valid for operation.")));
        let error = silent_logs! {
            connection.commit().expect_err("Autocommit was not enabled again")
        };
        match error {
            Error::Connection { native } => assert!(native.contains("SQL7008"), "{native}"),
            other => panic!("Unexpected error: {other:#}"),
        }
        assert!(connection.in_transaction());
        assert!(!server.autocommit());

        server.fail_autocommit(None);
        connection
            .exec("INSERT INTO MYLIB.ORDERS (ID) VALUES (2)")
            .expect("Could not insert");
        assert!(connection.commit().expect("Could not commit"));
        assert_eq!(server.count(|v| *v == Call::Commit), 2);
        assert!(!connection.in_transaction());
        assert!(server.autocommit());
    }

    #[test]
    fn rollback_keeps_the_transaction_until_autocommit_is_back() {
        init_logs();
        let server = MockServer::new();
        let mut connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        assert!(connection.begin_transaction().expect("Could not begin"));
        server.fail_autocommit(Some((true, "SQL0901 SQL system error.")));
        let error = silent_logs! {
            connection.rollback().expect_err("Autocommit was not enabled again")
        };
        assert!(matches!(error, Error::Connection { .. }), "{error:#}");
        assert!(connection.in_transaction());
        server.fail_autocommit(None);
        assert!(connection.rollback().expect("Could not rollback"));
        assert_eq!(server.count(|v| *v == Call::Rollback), 2);
        assert!(!connection.in_transaction());
    }

    #[test]
    fn begin_reports_false_when_autocommit_stays_on() {
        init_logs();
        let server = MockServer::new();
        let mut connection = driver(&server)
            .connect(&ConnectionParams::new().database("MYIBMI"))
            .expect("Could not connect");
        server.fail_autocommit(Some((false, "SQL7008 Commitment control not started.")));
        let started = silent_logs! {
            connection.begin_transaction().expect("Begin should not raise")
        };
        assert!(!started);
        assert!(!connection.in_transaction());
        assert!(server.autocommit());
        assert!(connection.commit().expect("Commit outside a transaction failed"));
        assert_eq!(server.count(|v| *v == Call::Commit), 0);
    }

    #[test]
    fn autocommit_option_is_refused() {
        init_logs();
        let server = MockServer::new();
        let error = silent_logs! {
            driver(&server)
                .connect_url("db2:///MYIBMI?autocommit=false")
                .err()
                .expect("Connect with autocommit off should fail")
        };
        match error {
            Error::Configuration { field, .. } => assert_eq!(field, "autocommit"),
            other => panic!("Unexpected error: {other:#}"),
        }
        assert!(server.calls().is_empty());
    }

    #[test]
    fn connect_with_url() {
        init_logs();
        let server = MockServer::new();
        let connection = driver(&server)
            .connect_url("db2://QUSER:pw@ibmi.example.com:8471/*LOCAL?naming=system&library=APPLIB")
            .expect("Could not connect");
        assert_eq!(connection.naming(), NamingMode::System);
        let Call::Connect { dsn, .. } = &server.calls()[0] else {
            panic!("The first native call is not a connect");
        };
        assert!(dsn.starts_with("DRIVER={IBM DB2 ODBC DRIVER};HOSTNAME=ibmi.example.com;"));
        let error = silent_logs! {
            driver(&server)
                .connect_url("odbc://QUSER:pw@ibmi.example.com/*LOCAL")
                .err()
                .expect("An ODBC url should be refused")
        };
        assert!(error.is_configuration());
    }
}
