use crate::{Call, MockServer};
use ibmi_core::{Connection, ParameterType};

pub fn quoting<C: Connection>(connection: &mut C, server: &MockServer) {
    assert_eq!(
        connection
            .quote("O'Brien", ParameterType::String)
            .expect("Could not quote a string"),
        "'O''Brien'"
    );
    assert_eq!(
        connection
            .quote("42", ParameterType::Integer)
            .expect("Could not quote an integer"),
        "42"
    );
    assert_eq!(
        connection
            .quote("", ParameterType::String)
            .expect("Could not quote the empty string"),
        "''"
    );
    // Escaping is delegated to the native layer
    assert_eq!(server.count(|v| *v == Call::Quote("O'Brien".into())), 1);
}
