//! Page query string

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct MenuQuery {
    #[serde(rename = "tableNumber", default)]
    table_number: Option<String>,
}

/// `tableNumber` from a `location.search` string (leading `?` optional)
pub fn parse_table_number(search: &str) -> Option<String> {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return None;
    }
    match serde_qs::from_str::<MenuQuery>(query) {
        Ok(q) => q
            .table_number
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        Err(e) => {
            log::warn!("Unreadable query string '{}': {}", search, e);
            None
        }
    }
}

/// Table number of the page the customer opened from the QR code
pub fn current_table_number() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    parse_table_number(&search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_number_from_query() {
        assert_eq!(parse_table_number("?tableNumber=5").as_deref(), Some("5"));
        assert_eq!(
            parse_table_number("utm=qr&tableNumber=12").as_deref(),
            Some("12")
        );
        assert_eq!(parse_table_number("?tableNumber=A%201").as_deref(), Some("A 1"));
    }

    #[test]
    fn test_missing_table_number() {
        assert_eq!(parse_table_number(""), None);
        assert_eq!(parse_table_number("?"), None);
        assert_eq!(parse_table_number("?tableNumber="), None);
        assert_eq!(parse_table_number("?other=1"), None);
    }
}
