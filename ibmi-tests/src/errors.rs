use crate::{MockServer, silent_logs};
use ibmi_core::{Connection, Error, Prepared, Value};

/// Native failures surface as typed errors and leave the connection usable.
pub fn errors<C: Connection>(connection: &mut C, server: &MockServer) {
    let missing = "SELECT * FROM MYLIB.MISSING";
    server.fail_prepare(missing, "SQL0204 MISSING in MYLIB type *FILE not found.");
    let error = silent_logs! {
        connection.prepare(missing).expect_err("Prepare should fail")
    };
    match error {
        Error::PrepareFailed { sql, native } => {
            assert_eq!(sql, missing);
            assert!(native.contains("SQL0204"), "{native}");
        }
        other => panic!("Unexpected error: {other:#}"),
    }

    let insert = "INSERT INTO MYLIB.ORDERS (ID) VALUES (?)";
    server.fail_execute(insert, "SQL0803 Duplicate key value specified.");
    let error = silent_logs! {
        connection
            .exec(insert)
            .expect_err("Direct execution should fail")
    };
    assert!(
        matches!(&error, Error::Statement { native, .. } if native.contains("SQL0803")),
        "{error:#}"
    );

    let mut statement = connection
        .prepare(insert)
        .expect("Prepare of a failing insert should succeed");
    let error = silent_logs! {
        statement
            .bind(1)
            .expect("Could not bind the value")
            .execute()
            .expect_err("Execution should fail")
    };
    assert!(
        matches!(&error, Error::Statement { sql, .. } if sql == insert),
        "{error:#}"
    );
    drop(statement);

    let alive = "SELECT 1 FROM SYSIBM.SYSDUMMY1";
    server.with_result(alive, &["1"], vec![vec![Value::Int32(1)]]);
    let rows = connection
        .query(alive)
        .expect("The connection is not usable after a failure")
        .fetch_all()
        .expect("Could not fetch the rows");
    assert_eq!(rows.len(), 1);
}
