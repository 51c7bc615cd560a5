use std::fmt::Write;

/// Write `value` escaping occurrences of `search` with `replace`.
pub fn write_escaped(out: &mut impl Write, value: &str, search: char, replace: &str) {
    let mut position = 0;
    for (i, c) in value.char_indices() {
        if c == search {
            let _ = out.write_str(&value[position..i]);
            let _ = out.write_str(replace);
            position = i + c.len_utf8();
        }
    }
    let _ = out.write_str(&value[position..]);
}

/// Log a translated error and hand it back, for use in `map_err` chains.
pub fn log_error<E: std::fmt::Display>(error: E) -> E {
    log::error!("{:#}", error);
    error
}

/// Longest prefix of `value` not exceeding `max` bytes and ending on a char boundary.
pub fn char_prefix(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
/// Truncate long strings for logging and error messages purpose.
///
/// Returns a `format_args!` that yields at most 497 characters from the start
/// of the input followed by `...` when truncation occurred.
///
/// If true is the second argument, it evaluates the first argument just once
/// and returns an owned `String`.
///
/// # Examples
/// ```
/// use ibmi_core::truncate_long;
/// let short = "SELECT 1";
/// assert_eq!(format!("{}", truncate_long!(short)), "SELECT 1");
/// let long = format!("SELECT {}", "X".repeat(600));
/// let logged = format!("{}", truncate_long!(long));
/// assert!(logged.starts_with("SELECT XXXXXX"));
/// assert!(logged.ends_with("...\n"));
/// ```
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::char_prefix(&$query, 497).trim(),
            if $query.len() > 497 { "...\n" } else { "" },
        )
    };
    ($query:expr,true) => {{
        let query = $query;
        format!(
            "{}{}",
            $crate::char_prefix(&query, 497).trim(),
            if query.len() > 497 { "...\n" } else { "" },
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quotes() {
        let mut out = String::new();
        write_escaped(&mut out, "O'Brien's", '\'', "''");
        assert_eq!(out, "O''Brien''s");
        let mut out = String::new();
        write_escaped(&mut out, "no quotes", '\'', "''");
        assert_eq!(out, "no quotes");
    }

    #[test]
    fn truncate() {
        let sql = "X".repeat(600);
        assert_eq!(truncate_long!(sql.as_str(), true).len(), 497 + 4);
        assert_eq!(format!("{}", truncate_long!("  SELECT 1  ")), "SELECT 1");
        let accented = "é".repeat(300);
        assert_eq!(char_prefix(&accented, 497).len(), 496);
    }
}
