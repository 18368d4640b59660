//! Escaping of caller-supplied values placed into LDAP filters and DNs
//!
//! Every metacharacter is replaced by a backslash followed by its two-digit
//! hex code (RFC 4515 for filters, RFC 4514 for DN attribute values). The
//! input is scanned once, so an inserted backslash is never escaped again.

use std::fmt::Write;

/// Characters with special meaning inside a search filter
const FILTER_META: [char; 5] = ['*', '(', ')', '\\', '\0'];

/// Characters with special meaning inside a distinguished name
const DN_META: [char; 9] = [',', '=', '+', '<', '>', ';', '\\', '"', '#'];

fn escape_with(value: &str, meta: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if meta.contains(&c) {
            // writing to a String cannot fail
            let _ = write!(escaped, "\\{:02x}", u32::from(c));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Escape a value for use inside a search filter
///
/// ```
/// use integration_ldap::escape::escape_filter_value;
///
/// assert_eq!(escape_filter_value("a*b"), r"a\2ab");
/// ```
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    escape_with(value, &FILTER_META)
}

/// Escape a value for use as an attribute value inside a DN
///
/// ```
/// use integration_ldap::escape::escape_dn_value;
///
/// assert_eq!(escape_dn_value("Doe, Jane"), r"Doe\2c Jane");
/// ```
#[must_use]
pub fn escape_dn_value(value: &str) -> String {
    escape_with(value, &DN_META)
}

/// Equality filter on a single attribute with an escaped value
#[must_use]
pub fn equality_filter(attribute: &str, value: &str) -> String {
    format!("({attribute}={})", escape_filter_value(value))
}
