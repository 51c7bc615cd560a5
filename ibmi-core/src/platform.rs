use crate::NamingMode;
use std::fmt::Write;

/// Capabilities of DB2 for IBM i that depend on the session naming mode.
///
/// Handed to SQL generating collaborators. The only statement written by the
/// connection layer itself is the identity lookup.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Db2IbmiPlatform {
    naming: NamingMode,
}

impl Db2IbmiPlatform {
    pub const fn new(naming: NamingMode) -> Self {
        Self { naming }
    }

    pub const fn naming(&self) -> NamingMode {
        self.naming
    }

    pub const fn schema_separator(&self) -> char {
        self.naming.separator()
    }

    /// Write a `SCHEMA.TABLE` (or `LIBRARY/TABLE`) reference, the schema is omitted when empty.
    pub fn write_table_ref(&self, out: &mut impl Write, schema: &str, table: &str) {
        if !schema.is_empty() {
            let _ = out.write_str(schema);
            let _ = out.write_char(self.schema_separator());
        }
        let _ = out.write_str(table);
    }

    pub fn table_ref(&self, schema: &str, table: &str) -> String {
        let mut out = String::with_capacity(schema.len() + table.len() + 1);
        self.write_table_ref(&mut out, schema, table);
        out
    }

    /// The identity emulation query: `IDENTITY_VAL_LOCAL()` read from the one row `QSYS2` utility table.
    pub fn write_identity_query(&self, out: &mut impl Write) {
        let _ = out.write_str("SELECT IDENTITY_VAL_LOCAL() AS VAL FROM ");
        self.write_table_ref(out, "QSYS2", "QSQPTABL");
    }

    pub fn identity_query(&self) -> String {
        let mut out = String::with_capacity(64);
        self.write_identity_query(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_query() {
        assert_eq!(
            Db2IbmiPlatform::new(NamingMode::Sql).identity_query(),
            "SELECT IDENTITY_VAL_LOCAL() AS VAL FROM QSYS2.QSQPTABL"
        );
        assert_eq!(
            Db2IbmiPlatform::new(NamingMode::System).identity_query(),
            "SELECT IDENTITY_VAL_LOCAL() AS VAL FROM QSYS2/QSQPTABL"
        );
    }

    #[test]
    fn table_refs() {
        let sql = Db2IbmiPlatform::default();
        let system = Db2IbmiPlatform::new(NamingMode::System);
        assert_eq!(sql.table_ref("MYLIB", "ORDERS"), "MYLIB.ORDERS");
        assert_eq!(system.table_ref("MYLIB", "ORDERS"), "MYLIB/ORDERS");
        assert_eq!(system.table_ref("", "ORDERS"), "ORDERS");
    }
}
