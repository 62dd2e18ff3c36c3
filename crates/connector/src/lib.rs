//! Binance REST 요청 서명 및 디스패치 엔진.
//!
//! 흐름: 파라미터 검증(`checker`) → 정규 쿼리 생성(`query`) → 서명(`signer`)
//! → 전송(`transport`) → 응답 분류(`response`). `RequestHandler`가 이 흐름을 묶는다.

pub mod checker;
pub mod query;
pub mod request_handler;
pub mod response;
pub mod signer;
pub mod transport;

pub use checker::{validate, ParamType, Rule};
pub use request_handler::{
    get_timestamp, RequestHandler, RequestSpec, API_KEY_HEADER, DEFAULT_RECV_WINDOW,
};
pub use signer::{sign, Credentials};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
