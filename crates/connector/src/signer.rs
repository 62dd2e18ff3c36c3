use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `payload`의 HMAC-SHA256 (소문자 hex)
pub fn sign(secret_key: &[u8], payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// API 키와 시크릿. 시크릿은 서명 키로만 쓰이며 로그나 `Debug` 출력에 나타나지 않는다.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: Box<[u8]>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into().into_bytes().into_boxed_slice(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn has_secret_key(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// 시크릿 키로 `payload`를 서명한다.
    pub fn sign(&self, payload: &str) -> String {
        sign(&self.secret_key, payload)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example request from the Binance API documentation.
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_QUERY: &str = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

    #[test]
    fn test_sign_matches_reference() {
        assert_eq!(
            sign(DOC_SECRET.as_bytes(), DOC_QUERY),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign(b"test_secret", "symbol=BTCUSDT&timestamp=1700000000000");
        let b = sign(b"test_secret", "symbol=BTCUSDT&timestamp=1700000000000");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_sign_empty_payload() {
        assert_eq!(
            sign(b"test_secret", ""),
            "f7f9bd47fb987337b5796fdc1fdb9ba221d0d5396814bfcaf9521f43fd8927fd"
        );
    }

    #[test]
    fn test_credentials_sign_and_debug() {
        let credentials = Credentials::new("my-key", DOC_SECRET);
        assert_eq!(credentials.sign(DOC_QUERY), sign(DOC_SECRET.as_bytes(), DOC_QUERY));

        let debug = format!("{credentials:?}");
        assert!(debug.contains("my-key"));
        assert!(!debug.contains(DOC_SECRET));
    }

    #[test]
    fn test_credentials_emptiness() {
        let credentials = Credentials::new("", "");
        assert!(!credentials.has_api_key());
        assert!(!credentials.has_secret_key());
    }
}
