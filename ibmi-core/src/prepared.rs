use crate::{AsValue, Result, RowLabeled, Value};
use std::fmt::Debug;

/// Positional values bound to a prepared statement.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Bindings {
    values: Vec<Value>,
    next: usize,
}

impl Bindings {
    /// Bind at the position following the last bound one.
    pub fn push(&mut self, value: Value) {
        self.set(self.next, value);
    }
    /// Bind at `index` (zero based), unset positions before it are NULL.
    pub fn set(&mut self, index: usize, value: Value) {
        if self.values.len() <= index {
            self.values.resize(index + 1, Value::Null);
        }
        self.values[index] = value;
        self.next = index + 1;
    }
    pub fn clear(&mut self) {
        self.values.clear();
        self.next = 0;
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A statement prepared by the backend, bound to the connection that created it.
///
/// After `execute` the statement acts as a forward-only cursor over its result set.
///
/// ```ignore
/// let mut statement = connection.prepare("SELECT NAME FROM MYLIB.USERS WHERE ID = ?")?;
/// statement.bind(42)?.execute()?;
/// while let Some(row) = statement.fetch()? { ... }
/// ```
pub trait Prepared: Debug {
    /// SQL text of the statement.
    fn sql(&self) -> &str;
    fn bindings(&self) -> &Bindings;
    fn bindings_mut(&mut self) -> &mut Bindings;
    /// Run the statement with the values currently bound.
    fn execute(&mut self) -> Result<&mut Self>;
    /// Next row of the result set, `None` when exhausted.
    fn fetch(&mut self) -> Result<Option<RowLabeled>>;
    /// Rows affected by the last execution.
    fn row_count(&self) -> Result<u64>;

    /// Append a bound value.
    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.bindings_mut().push(value.as_value());
        Ok(self)
    }
    /// Bind a value at a specific index (zero based).
    fn bind_index(&mut self, value: impl AsValue, index: usize) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.bindings_mut().set(index, value.as_value());
        Ok(self)
    }
    /// Clear all bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.bindings_mut().clear();
        Ok(self)
    }
    /// Drain the remaining rows.
    fn fetch_all(&mut self) -> Result<Vec<RowLabeled>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings() {
        let mut bindings = Bindings::default();
        bindings.push(Value::Int32(1));
        bindings.set(3, Value::from("x"));
        bindings.push(Value::Boolean(true));
        assert_eq!(
            bindings.values(),
            [
                Value::Int32(1),
                Value::Null,
                Value::Null,
                Value::from("x"),
                Value::Boolean(true)
            ]
        );
        bindings.clear();
        assert!(bindings.is_empty());
        bindings.push(Value::Int64(2));
        assert_eq!(bindings.values(), [Value::Int64(2)]);
    }
}
