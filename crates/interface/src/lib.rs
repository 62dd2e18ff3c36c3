//! 커넥터 크레이트들이 공유하는 타입: 에러, 파라미터, 상품 설정, 응답.

pub mod error;
pub mod params;
pub mod product;
pub mod proxy;
pub mod request;
pub mod response;

pub use error::{ClientError, ConnectorError, ExchangeError, ValidationError};
pub use params::{ParamValue, ParameterSet};
pub use product::{ProductConfig, ProductLine};
pub use proxy::{ProxyAuth, ProxyConfig};
pub use request::{HttpMethod, SecurityType};
pub use response::{LimitUsage, Response};
