//! 요청 전 파라미터 검증. 모든 함수는 순수 함수이며 네트워크에 닿기 전에 호출된다.

use interface::{ParamValue, ParameterSet, ValidationError};

/// [`check_parameter`]가 기대하는 파라미터 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    /// 정수 또는 유한한 실수
    Decimal,
    Boolean,
    Array,
}

impl ParamType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }

    pub fn accepts(self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::String, ParamValue::Str(_)) => true,
            (Self::Integer, ParamValue::Int(_) | ParamValue::UInt(_)) => true,
            (Self::Decimal, ParamValue::Int(_) | ParamValue::UInt(_)) => true,
            (Self::Decimal, ParamValue::Float(v)) => v.is_finite(),
            (Self::Boolean, ParamValue::Bool(_)) => true,
            (Self::Array, ParamValue::Array(_)) => true,
            _ => false,
        }
    }
}

/// 선언적 검증 단계 하나. 엔드포인트별 계약은 이 목록으로 표현한다.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required(&'static str, ParamType),
    NonEmpty(&'static str),
    OneOf(&'static [&'static str]),
    /// 파라미터가 있을 때만 검사
    Allowed(&'static str, &'static [&'static str]),
    /// 닫힌 구간 숫자 범위. 있을 때만 검사
    Range(&'static str, f64, f64),
}

impl Rule {
    pub fn check(&self, params: &ParameterSet) -> Result<(), ValidationError> {
        match *self {
            Self::Required(name, ty) => check_parameter(params, name, ty),
            Self::NonEmpty(name) => check_required_parameter(params, name),
            Self::OneOf(names) => check_or_parameters(params, names),
            Self::Allowed(name, allowed) => {
                if params.contains_key(name) {
                    check_parameter_value(params, name, allowed)
                } else {
                    Ok(())
                }
            }
            Self::Range(name, min, max) => {
                if params.contains_key(name) {
                    check_parameter_range(params, name, min, max)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// `rules`를 순서대로 실행하고 첫 실패에서 멈춘다.
pub fn validate(params: &ParameterSet, rules: &[Rule]) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(params))
}

/// `name`이 있어야 하고 `expected` 타입이어야 한다.
pub fn check_parameter(
    params: &ParameterSet,
    name: &str,
    expected: ParamType,
) -> Result<(), ValidationError> {
    let value = params
        .get(name)
        .ok_or_else(|| ValidationError::MissingParameter {
            name: name.to_string(),
        })?;

    if expected.accepts(value) {
        Ok(())
    } else {
        Err(ValidationError::WrongParameterType {
            name: name.to_string(),
            expected: expected.name().to_string(),
        })
    }
}

/// `name`이 있어야 하고, 문자열이면 공백만 있어서는 안 된다.
pub fn check_required_parameter(params: &ParameterSet, name: &str) -> Result<(), ValidationError> {
    match params.get(name) {
        None => Err(ValidationError::MissingParameter {
            name: name.to_string(),
        }),
        Some(ParamValue::Str(s)) if s.trim().is_empty() => Err(ValidationError::EmptyParameter {
            name: name.to_string(),
        }),
        Some(ParamValue::Array(items)) if items.is_empty() => {
            Err(ValidationError::EmptyParameter {
                name: name.to_string(),
            })
        }
        Some(_) => Ok(()),
    }
}

/// `names` 중 최소 하나는 있어야 한다.
pub fn check_or_parameters(params: &ParameterSet, names: &[&str]) -> Result<(), ValidationError> {
    if names.iter().any(|name| params.contains_key(name)) {
        Ok(())
    } else {
        Err(ValidationError::MissingOneOf {
            names: names.iter().map(|n| n.to_string()).collect(),
        })
    }
}

/// `name`이 있어야 하고 문자열로 바꾼 값이 `allowed` 중 하나여야 한다.
pub fn check_parameter_value(
    params: &ParameterSet,
    name: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    let value = params
        .get(name)
        .ok_or_else(|| ValidationError::MissingParameter {
            name: name.to_string(),
        })?;

    let rendered = value.to_string();
    if allowed.contains(&rendered.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidParameterValue {
            name: name.to_string(),
            value: rendered,
            expected: format!("one of {allowed:?}"),
        })
    }
}

/// `name`이 있어야 하고 `[min, max]` 범위의 숫자여야 한다.
pub fn check_parameter_range(
    params: &ParameterSet,
    name: &str,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    check_parameter(params, name, ParamType::Decimal)?;
    let value = params.get(name).and_then(ParamValue::as_f64).unwrap_or(f64::NAN);

    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidParameterValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: format!("between {min} and {max}"),
        })
    }
}

/// 모든 실수 값(배열 원소 포함)이 유한해야 한다. `NaN`/`inf`는 십진 표기가 없다.
pub fn check_finite_values(params: &ParameterSet) -> Result<(), ValidationError> {
    fn non_finite(value: &ParamValue) -> Option<&ParamValue> {
        match value {
            ParamValue::Float(v) if !v.is_finite() => Some(value),
            ParamValue::Array(items) => items.iter().find_map(non_finite),
            _ => None,
        }
    }

    for (name, value) in params {
        if let Some(bad) = non_finite(value) {
            return Err(ValidationError::InvalidParameterValue {
                name: name.clone(),
                value: bad.to_string(),
                expected: "a finite number".to_string(),
            });
        }
    }
    Ok(())
}

/// 커넥터가 채우는 키(`signature` 등)는 호출자가 넣을 수 없다.
pub fn check_reserved_parameters(
    params: &ParameterSet,
    reserved: &[&str],
) -> Result<(), ValidationError> {
    match reserved.iter().find(|name| params.contains_key(name)) {
        Some(name) => Err(ValidationError::ReservedParameter {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
