use crate::{Call, MockServer};
use ibmi_core::{Connection, Prepared, Value};
use rust_decimal::Decimal;

/// Prepared statements, direct execution and cursors.
pub fn statements<C: Connection>(connection: &mut C, server: &MockServer) {
    let select = "SELECT ID, NAME, BALANCE FROM MYLIB.CUSTOMERS WHERE ID > ? AND NAME <> ?";
    server.with_result(
        select,
        &["ID", "NAME", "BALANCE"],
        vec![
            vec![
                Value::Int32(1),
                "Alice".into(),
                Value::Decimal(Decimal::new(10050, 2)),
            ],
            vec![Value::Int32(2), "Bob".into(), Value::Null],
        ],
    );

    // Select with bound values
    let mut statement = connection
        .prepare(select)
        .expect("Could not prepare the select");
    assert_eq!(statement.sql(), select);
    statement
        .bind(0)
        .expect("Could not bind the first value")
        .bind("Carol")
        .expect("Could not bind the second value")
        .execute()
        .expect("Could not execute the select");
    let first = statement
        .fetch()
        .expect("Could not fetch the first row")
        .expect("The first row is missing");
    assert_eq!(first.names(), ["ID", "NAME", "BALANCE"]);
    assert_eq!(first.get::<i64>("id").expect("ID is not an integer"), 1);
    assert_eq!(
        first.get::<Decimal>("BALANCE").expect("BALANCE is not a decimal"),
        Decimal::new(10050, 2)
    );
    let rest = statement.fetch_all().expect("Could not fetch the rows");
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].get::<String>("NAME").expect("NAME is not a string"), "Bob");
    assert_eq!(
        rest[0]
            .get::<Option<Decimal>>("BALANCE")
            .expect("BALANCE is not a nullable decimal"),
        None
    );
    assert!(
        statement
            .fetch()
            .expect("Fetching past the end must not fail")
            .is_none()
    );

    // Rebind and execute again
    statement
        .clear_bindings()
        .expect("Could not clear the bindings")
        .bind_index("Dave", 1)
        .expect("Could not bind by index")
        .bind_index(5, 0)
        .expect("Could not bind by index")
        .execute()
        .expect("Could not execute the select again");
    assert_eq!(
        statement.fetch_all().expect("Could not fetch the rows").len(),
        2
    );
    drop(statement);
    assert_eq!(
        server.count(|v| *v
            == Call::Execute {
                sql: select.into(),
                params: vec![Value::Int32(0), "Carol".into()],
            }),
        1
    );
    assert_eq!(
        server.count(|v| *v
            == Call::Execute {
                sql: select.into(),
                params: vec![Value::Int32(5), "Dave".into()],
            }),
        1
    );

    // Query shortcut
    let mut statement = connection
        .query(select)
        .expect("Could not run the select");
    assert_eq!(
        statement.fetch_all().expect("Could not fetch the rows").len(),
        2
    );
    drop(statement);

    // Affected rows
    let update = "UPDATE MYLIB.CUSTOMERS SET BALANCE = 0 WHERE ID = ?";
    server.with_affected(update, 1);
    let mut statement = connection
        .prepare(update)
        .expect("Could not prepare the update");
    statement
        .bind(2)
        .expect("Could not bind the value")
        .execute()
        .expect("Could not execute the update");
    assert_eq!(statement.row_count().expect("Could not read the row count"), 1);
    drop(statement);

    let delete = "DELETE FROM MYLIB.CUSTOMERS WHERE BALANCE = 0";
    server.with_affected(delete, 3);
    assert_eq!(connection.exec(delete).expect("Could not run the delete"), 3);
    assert_eq!(server.count(|v| *v == Call::Exec(delete.into())), 1);
}
