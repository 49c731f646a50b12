//! The endpoint URIs for the web front-end and the transactions API.

/// The transactions page.
pub const ROOT: &str = "/";
/// The route that re-fetches transactions with a text query and returns the
/// updated list as an HTML fragment.
pub const SEARCH_TRANSACTIONS: &str = "/transactions/search";
/// The route the creation dialog submits new transactions to.
pub const CREATE_TRANSACTION: &str = "/api/transactions";

/// The transactions collection served by the API server, relative to its base URL.
pub const TRANSACTIONS_API: &str = "/transactions";

// These tests are here so that we know when we call `Uri::from_static` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::SEARCH_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::CREATE_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
    }
}
