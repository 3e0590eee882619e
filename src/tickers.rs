/// Static stock code lookup for common names.
const STOCK_CODES: &[(&str, &str)] = &[
    ("Apple Inc", "AAPL"),
    ("Apple", "AAPL"),
    ("Microsoft", "MSFT"),
    ("Google", "GOOGL"),
    ("Alphabet", "GOOGL"),
    ("Amazon", "AMZN"),
    ("Nvidia", "NVDA"),
    ("Tesla", "TSLA"),
];

/// Resolve a company identifier to a ticker symbol, if possible.
///
/// Known names map through the static table; short all-uppercase inputs are
/// taken to already be tickers. Anything else returns None and the caller
/// queries the news provider with the raw string.
pub fn resolve(company: &str) -> Option<String> {
    let company = company.trim();

    for (name, code) in STOCK_CODES {
        if name.eq_ignore_ascii_case(company) {
            return Some((*code).to_string());
        }
    }

    if looks_like_ticker(company) {
        return Some(company.to_string());
    }

    None
}

fn looks_like_ticker(s: &str) -> bool {
    (1..=5).contains(&s.len())
        && s.chars().all(|c| c.is_ascii_uppercase() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve() {
        assert_eq!(resolve("Apple Inc").as_deref(), Some("AAPL"));
        assert_eq!(resolve("microsoft").as_deref(), Some("MSFT"));
        assert_eq!(resolve("  Google  ").as_deref(), Some("GOOGL"));
    }

    #[test]
    fn test_ticker_passthrough() {
        assert_eq!(resolve("TSM").as_deref(), Some("TSM"));
        assert_eq!(resolve("BRK.B").as_deref(), Some("BRK.B"));
    }

    #[test]
    fn test_unknown_names_do_not_resolve() {
        assert_eq!(resolve("Acme Corp"), None);
        // lowercase words are names, not tickers
        assert_eq!(resolve("acme"), None);
        assert_eq!(resolve("TOOLONGTICKER"), None);
    }
}
