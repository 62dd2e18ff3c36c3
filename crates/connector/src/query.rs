//! 정규 쿼리 문자열 생성.
//!
//! 결과 문자열이 그대로 전송되는 쿼리(또는 form body)이자 서명 입력이다.
//! 둘 다 반드시 이 함수로 만들어야 한다.

use interface::{ParamValue, ParameterSet};

/// `params`를 삽입 순서대로 `k=v&k=v`로 인코딩한다.
/// 배열은 같은 키를 반복하고, 빈 배열은 아무것도 만들지 않는다.
pub fn encode(params: &ParameterSet) -> String {
    let mut out = String::new();
    for (name, value) in params {
        push_value(&mut out, name, value);
    }
    out
}

fn push_value(out: &mut String, name: &str, value: &ParamValue) {
    match value {
        ParamValue::Array(items) => {
            for item in items {
                push_value(out, name, item);
            }
        }
        scalar => push_pair(out, name, &scalar.to_string()),
    }
}

fn push_pair(out: &mut String, name: &str, value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    out.push_str(&urlencoding::encode(name));
    out.push('=');
    out.push_str(&urlencoding::encode(value));
}

/// `signature=<hex>`를 마지막 쌍으로 붙인다.
pub fn append_signature(query: &str, signature: &str) -> String {
    if query.is_empty() {
        format!("signature={signature}")
    } else {
        format!("{query}&signature={signature}")
    }
}
