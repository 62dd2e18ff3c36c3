use interface::{ClientError, ExchangeError, LimitUsage, Response};

use crate::transport::HttpResponse;

/// 응답 분류: 2xx는 성공 payload, 그 외는 거래소 에러 코드를 담은 `ClientError`.
pub fn handle_response(
    response: HttpResponse,
    show_limit_usage: bool,
) -> Result<Response, ExchangeError> {
    if (200..300).contains(&response.status) {
        let limit_usage = show_limit_usage.then(|| {
            LimitUsage::from_headers(
                response
                    .headers
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            )
        });
        return Ok(Response::new(response.body, limit_usage));
    }

    Err(ClientError::from_body(response.status, response.body).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("x-mbx-used-weight-1m".to_string(), "7".to_string()),
            ],
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_without_limit_usage() {
        let out = handle_response(response(200, "{}"), false).unwrap();
        assert_eq!(out.data, "{}");
        assert!(out.limit_usage.is_none());
    }

    #[test]
    fn test_success_with_limit_usage() {
        let out = handle_response(response(200, "[]"), true).unwrap();
        let usage = out.limit_usage.unwrap();
        assert_eq!(usage.used_weight_1m(), Some(7));
        assert_eq!(usage.get("content-type"), None);
    }

    #[test]
    fn test_success_with_limit_usage_but_no_headers() {
        let raw = HttpResponse {
            status: 200,
            headers: vec![],
            body: "{}".to_string(),
        };
        let out = handle_response(raw, true).unwrap();
        assert_eq!(out.limit_usage, Some(LimitUsage::default()));
    }

    #[test]
    fn test_invalid_symbol_is_client_error() {
        let err = handle_response(
            response(400, r#"{"code": -1121, "msg": "Invalid symbol."}"#),
            false,
        )
        .unwrap_err();

        match err {
            ExchangeError::Client(e) => {
                assert_eq!(e.status, 400);
                assert_eq!(e.error_code, Some(-1121));
                assert_eq!(e.message, "Invalid symbol.");
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error_with_unparseable_body() {
        let err = handle_response(response(503, "Service Unavailable"), true).unwrap_err();
        match err {
            ExchangeError::Client(e) => {
                assert!(e.is_server_error());
                assert_eq!(e.error_code, None);
                assert_eq!(e.message, "Service Unavailable");
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }
}
