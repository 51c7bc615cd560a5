use crate::{Call, MockServer, silent_logs};
use ibmi_core::{Connection, Error};

/// Autocommit and transaction state machine.
pub fn transactions<C: Connection>(connection: &mut C, server: &MockServer) {
    assert!(!connection.in_transaction());
    assert!(server.autocommit());

    // Ending a transaction that does not exist touches nothing
    let before = server.calls().len();
    assert!(connection.commit().expect("Commit outside a transaction failed"));
    assert!(connection.rollback().expect("Rollback outside a transaction failed"));
    assert_eq!(server.calls().len(), before);
    assert!(!connection.in_transaction());

    // Commit
    assert!(connection.begin_transaction().expect("Could not begin"));
    assert!(connection.in_transaction());
    assert!(!server.autocommit());
    let before = server.calls().len();
    assert!(connection.begin_transaction().expect("Nested begin failed"));
    assert_eq!(server.calls().len(), before);
    connection
        .exec("INSERT INTO MYLIB.ORDERS (ID) VALUES (1)")
        .expect("Could not insert");
    let commits = server.count(|v| *v == Call::Commit);
    assert!(connection.commit().expect("Could not commit"));
    assert_eq!(server.count(|v| *v == Call::Commit), commits + 1);
    assert!(!connection.in_transaction());
    assert!(server.autocommit());

    // Rollback
    assert!(connection.begin_transaction().expect("Could not begin"));
    let rollbacks = server.count(|v| *v == Call::Rollback);
    assert!(connection.rollback().expect("Could not rollback"));
    assert_eq!(server.count(|v| *v == Call::Rollback), rollbacks + 1);
    assert!(!connection.in_transaction());
    assert!(server.autocommit());

    // Failed commit keeps the transaction open
    assert!(connection.begin_transaction().expect("Could not begin"));
    server.fail_commit(Some("SQL0913 Row or object ORDERS in MYLIB type *FILE in use."));
    let error = silent_logs! {
        connection.commit().expect_err("The commit should fail")
    };
    match error {
        Error::Connection { native } => assert!(native.contains("SQL0913"), "{native}"),
        other => panic!("Unexpected error: {other:#}"),
    }
    assert!(connection.in_transaction());
    assert!(!server.autocommit());
    server.fail_commit(None);

    // Failed rollback as well
    server.fail_rollback(Some("SQL0901 SQL system error."));
    let error = silent_logs! {
        connection.rollback().expect_err("The rollback should fail")
    };
    assert!(matches!(error, Error::Connection { .. }), "{error:#}");
    assert!(connection.in_transaction());
    server.fail_rollback(None);

    assert!(connection.rollback().expect("Could not rollback"));
    assert!(!connection.in_transaction());
    assert!(server.autocommit());
}
