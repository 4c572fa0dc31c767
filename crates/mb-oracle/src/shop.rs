//! Shopping search link

use url::Url;

/// Search page the recommendation links to
pub const SHOP_SEARCH_BASE: &str = "https://www.coupang.com/np/search";

/// Search URL for a keyword, query-encoded
pub fn shopping_search_url(keyword: &str) -> String {
    match Url::parse_with_params(SHOP_SEARCH_BASE, &[("q", keyword.trim())]) {
        Ok(url) => url.into(),
        // Base is a constant; only reachable if it is edited into garbage
        Err(e) => {
            log::error!("[Shop] Invalid search base: {}", e);
            SHOP_SEARCH_BASE.to_string()
        }
    }
}
