//! 바이낸스 선물 REST 클라이언트.
//!
//! 엔드포인트 파사드는 `connector::RequestHandler` 위에 얇게 올라가 있다.
//! 서명, 인코딩, 에러 분류는 모두 `connector`가 담당한다.

pub mod cm_futures;
pub mod config;
pub mod futures;
pub mod logger;
pub mod um_futures;

pub use cm_futures::{CmAccount, CmFuturesClient};
pub use config::ClientConfig;
pub use futures::{FuturesClient, FuturesClientBuilder, FuturesContext};
pub use um_futures::{UmAccount, UmFuturesClient};
