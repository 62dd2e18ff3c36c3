pub const SPOT_PROD_URL: &str = "https://api.binance.com";
pub const USDM_PROD_URL: &str = "https://fapi.binance.com";
pub const COINM_PROD_URL: &str = "https://dapi.binance.com";
pub const FUTURES_TESTNET_URL: &str = "https://testnet.binancefuture.com";
pub const PORTFOLIO_MARGIN_PROD_URL: &str = "https://papi.binance.com";

/// 상품군별 REST 경로 접두사와 기본 URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductLine {
    Spot,
    UsdMarginedFutures,
    CoinMarginedFutures,
    PortfolioMargin,
}

impl ProductLine {
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::Spot => "/api",
            Self::UsdMarginedFutures => "/fapi",
            Self::CoinMarginedFutures => "/dapi",
            Self::PortfolioMargin => "/papi",
        }
    }

    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Spot => SPOT_PROD_URL,
            Self::UsdMarginedFutures => USDM_PROD_URL,
            Self::CoinMarginedFutures => COINM_PROD_URL,
            Self::PortfolioMargin => PORTFOLIO_MARGIN_PROD_URL,
        }
    }
}

/// Product descriptor injected into the dispatcher's callers: base URL plus
/// product path prefix. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductConfig {
    line: ProductLine,
    base_url: String,
    product_url: String,
}

impl ProductConfig {
    pub fn new(line: ProductLine, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let product_url = format!("{}{}", base_url, line.path_prefix());
        Self {
            line,
            base_url,
            product_url,
        }
    }

    /// Production endpoint for `line`.
    pub fn production(line: ProductLine) -> Self {
        Self::new(line, line.default_base_url())
    }

    pub fn line(&self) -> ProductLine {
        self.line
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` + product path prefix, e.g. `https://fapi.binance.com/fapi`.
    pub fn product_url(&self) -> &str {
        &self.product_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url_composition() {
        let um = ProductConfig::production(ProductLine::UsdMarginedFutures);
        assert_eq!(um.product_url(), "https://fapi.binance.com/fapi");

        let cm = ProductConfig::new(ProductLine::CoinMarginedFutures, FUTURES_TESTNET_URL);
        assert_eq!(cm.product_url(), "https://testnet.binancefuture.com/dapi");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let spot = ProductConfig::new(ProductLine::Spot, "http://127.0.0.1:8080/");
        assert_eq!(spot.base_url(), "http://127.0.0.1:8080");
        assert_eq!(spot.product_url(), "http://127.0.0.1:8080/api");
    }
}
