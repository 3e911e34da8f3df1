//! Filter value escaping.

/// Escape special characters in LDAP filter values (RFC 4515).
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// `(&<base>(<attribute>=<value>))` with `value` escaped.
#[must_use]
pub fn and_equals(base: &str, attribute: &str, value: &str) -> String {
    format!("(&{}({}={}))", base, attribute, escape_filter_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("alice"), "alice");
        assert_eq!(escape_filter_value("a*b"), "a\\2ab");
        assert_eq!(escape_filter_value("(admin)"), "\\28admin\\29");
        assert_eq!(escape_filter_value("back\\slash"), "back\\5cslash");
    }

    #[test]
    fn test_and_equals() {
        assert_eq!(
            and_equals("(objectClass=inetOrgPerson)", "uid", "al*ce"),
            "(&(objectClass=inetOrgPerson)(uid=al\\2ace))"
        );
    }
}
