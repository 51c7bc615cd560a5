mod db2;
mod errors;
mod odbc;
mod quoting;
mod server;
mod statements;
mod transactions;

pub use db2::*;
pub use errors::*;
use ibmi_core::Connection;
#[doc(hidden)]
pub use log;
use log::LevelFilter;
pub use odbc::*;
pub use quoting::*;
pub use server::*;
use std::env;
pub use statements::*;
pub use transactions::*;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the shared suite against `connection`, opened on `server`, then close it.
pub fn execute_tests<C: Connection>(mut connection: C, server: &MockServer) {
    macro_rules! do_test {
        ($test_function:ident) => {
            $test_function(&mut connection, server)
        };
    }
    do_test!(statements);
    do_test!(quoting);
    do_test!(transactions);
    do_test!(errors);

    let version = server.state().server_version.clone();
    assert_eq!(
        connection
            .server_version()
            .expect("Could not read the server version"),
        version
    );

    let open = server.open_handles();
    let closes = server.count(|v| *v == Call::Close);
    connection.close().expect("Could not close the connection");
    assert_eq!(server.open_handles(), open - 1);
    assert_eq!(server.count(|v| *v == Call::Close), closes + 1);
}

/// Run `code` with logging disabled, evaluating to its value.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = $crate::log::max_level();
        $crate::log::set_max_level($crate::log::LevelFilter::Off);
        let result = { $($code)+ };
        $crate::log::set_max_level(level);
        result
    }};
}
