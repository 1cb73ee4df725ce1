//! # Standard Converters
//!
//! 바인더나 [`ConverterRegistry`](super::ConverterRegistry)에 등록해서 쓰는 재사용 변환기들입니다.
//! 내장 규칙과 달리 빈 문자열을 null로 받아들일지(`allow_empty`)를 고를 수 있어서,
//! nullable 프로퍼티(`Option<_>`)에 빈 값을 "없음"으로 바인딩할 때 씁니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `CustomBooleanEditor` | [`CustomBooleanConverter`] |
//! | `CustomNumberEditor` | [`CustomNumberConverter`] |
//! | `CustomDateEditor` | [`CustomDateConverter`] |
//! | `PropertyValuesEditor` | [`PropertyValuesConverter`] |
//!
//! ## 예제
//!
//! ```rust,ignore
//! wrapper.register_custom_converter(
//!     ValueType::Int,
//!     Some("product_age"),
//!     CustomNumberConverter::new(ValueType::Int, true),
//! );
//! wrapper.set_property_value("product_age", "")?; // → None
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use crate::binder::converters::{PropertyConverter, parse_bool};
use crate::domain::property_values::PropertyValues;
use crate::domain::value::{Value, ValueType};
use crate::utils::string_utils::is_blank;

fn empty_value(allow_empty: bool, kind: &str) -> Result<Value, String> {
    if allow_empty {
        Ok(Value::Null)
    } else {
        Err(format!("an empty string is not a valid {}", kind))
    }
}

/// `true` / `false` 문자열 변환기
#[derive(Debug, Clone, Copy)]
pub struct CustomBooleanConverter {
    allow_empty: bool,
}

impl CustomBooleanConverter {
    pub fn new(allow_empty: bool) -> Self {
        Self { allow_empty }
    }
}

impl PropertyConverter for CustomBooleanConverter {
    fn convert(&self, value: &Value, _target: &ValueType) -> Result<Value, String> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value.clone()),
            Value::Str(text) if is_blank(text) => empty_value(self.allow_empty, "boolean"),
            Value::Str(text) => parse_bool(text).map(Value::Bool),
            other => Err(format!("{} is not a boolean", other)),
        }
    }
}

/// 숫자 변환기
///
/// `number_type`은 `Int`, `Long`, `Float` 중 하나입니다. 정수 타입으로의 변환은 범위를 검사하며,
/// 소수부가 있는 실수는 정수 타입으로 바꾸지 않습니다.
#[derive(Debug, Clone)]
pub struct CustomNumberConverter {
    number_type: ValueType,
    allow_empty: bool,
}

impl CustomNumberConverter {
    pub fn new(number_type: ValueType, allow_empty: bool) -> Self {
        Self {
            number_type,
            allow_empty,
        }
    }

    fn parse(&self, text: &str) -> Result<Value, String> {
        let text = text.trim();
        match self.number_type {
            ValueType::Int => text.parse::<i32>().map(Value::Int).map_err(|e| e.to_string()),
            ValueType::Long => text.parse::<i64>().map(Value::Long).map_err(|e| e.to_string()),
            ValueType::Float => text.parse::<f64>().map(Value::Float).map_err(|e| e.to_string()),
            ref other => Err(format!("'{}' is not a number type", other)),
        }
    }

    fn integer_value(&self, v: i64) -> Result<Value, String> {
        match self.number_type {
            ValueType::Int => i32::try_from(v).map(Value::Int).map_err(|e| e.to_string()),
            ValueType::Long => Ok(Value::Long(v)),
            ValueType::Float => Ok(Value::Float(v as f64)),
            ref other => Err(format!("'{}' is not a number type", other)),
        }
    }

    fn float_value(&self, v: f64) -> Result<Value, String> {
        if self.number_type == ValueType::Float {
            return Ok(Value::Float(v));
        }
        if v.fract() != 0.0 || v < i64::MIN as f64 || v > i64::MAX as f64 {
            return Err(format!("{} cannot be represented as {}", v, self.number_type));
        }
        self.integer_value(v as i64)
    }
}

impl PropertyConverter for CustomNumberConverter {
    fn convert(&self, value: &Value, _target: &ValueType) -> Result<Value, String> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Str(text) if is_blank(text) => empty_value(self.allow_empty, "number"),
            Value::Str(text) => self.parse(text),
            Value::Int(v) => self.integer_value(i64::from(*v)),
            Value::Long(v) => self.integer_value(*v),
            Value::Float(v) => self.float_value(*v),
            other => Err(format!("{} is not a number", other)),
        }
    }
}

/// chrono 포맷 문자열(`%Y-%m-%d %H:%M` 등)로 날짜를 파싱하는 변환기
///
/// 시간 없는 포맷(`%Y-%m-%d`)은 그날 자정으로 해석합니다.
#[derive(Debug, Clone)]
pub struct CustomDateConverter {
    format: String,
    allow_empty: bool,
}

impl CustomDateConverter {
    pub fn new(format: impl Into<String>, allow_empty: bool) -> Self {
        Self {
            format: format.into(),
            allow_empty,
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    fn parse(&self, text: &str) -> Result<Value, String> {
        let text = text.trim();
        let parsed = match NaiveDateTime::parse_from_str(text, &self.format) {
            Ok(date_time) => Some(date_time),
            Err(_) => NaiveDate::parse_from_str(text, &self.format)
                .map_err(|e| {
                    format!("'{}' does not match date format '{}': {}", text, self.format, e)
                })?
                .and_hms_opt(0, 0, 0),
        };
        parsed
            .map(Value::Date)
            .ok_or_else(|| format!("'{}' is not a valid date", text))
    }
}

impl PropertyConverter for CustomDateConverter {
    fn convert(&self, value: &Value, _target: &ValueType) -> Result<Value, String> {
        match value {
            Value::Null | Value::Date(_) => Ok(value.clone()),
            Value::Str(text) if is_blank(text) => empty_value(self.allow_empty, "date"),
            Value::Str(text) => self.parse(text),
            other => Err(format!("{} is not a date", other)),
        }
    }
}

/// `key=value` 텍스트 블록을 문자열 항목의 `Map` 값으로 바꾸는 변환기
///
/// 블록은 [`PropertyValues`]로 먼저 읽히므로 텍스트 순서가 유지됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyValuesConverter;

impl PropertyConverter for PropertyValuesConverter {
    fn convert(&self, value: &Value, _target: &ValueType) -> Result<Value, String> {
        match value {
            Value::Null | Value::Map(_) => Ok(value.clone()),
            Value::Str(text) => {
                let Ok(pvs) = text.parse::<PropertyValues>();
                let entries: IndexMap<String, Value> =
                    pvs.into_iter().map(|pv| pv.into_parts()).collect();
                Ok(Value::Map(entries))
            }
            Value::Properties(props) => Ok(Value::Map(
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::Str(v.clone())))
                    .collect(),
            )),
            other => Err(format!("{} is not a property block", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> Value {
        Value::Date(
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|day| day.and_hms_opt(h, min, 0))
                .unwrap(),
        )
    }

    #[test]
    fn test_boolean_converter() {
        let strict = CustomBooleanConverter::new(false);
        let lenient = CustomBooleanConverter::new(true);

        assert_eq!(strict.convert(&Value::from("TRUE"), &ValueType::Bool), Ok(Value::Bool(true)));
        assert_eq!(strict.convert(&Value::from(" false "), &ValueType::Bool), Ok(Value::Bool(false)));
        assert!(strict.convert(&Value::from("yes"), &ValueType::Bool).is_err());
        assert!(strict.convert(&Value::from(""), &ValueType::Bool).is_err());

        assert_eq!(lenient.convert(&Value::from("  "), &ValueType::Bool), Ok(Value::Null));
        assert_eq!(lenient.convert(&Value::Null, &ValueType::Bool), Ok(Value::Null));
    }

    #[test]
    fn test_number_converter() {
        let long = CustomNumberConverter::new(ValueType::Long, true);
        assert_eq!(long.convert(&Value::from(" 42 "), &ValueType::Long), Ok(Value::Long(42)));
        assert_eq!(long.convert(&Value::Int(7), &ValueType::Long), Ok(Value::Long(7)));
        assert_eq!(long.convert(&Value::Float(3.0), &ValueType::Long), Ok(Value::Long(3)));
        assert!(long.convert(&Value::Float(3.5), &ValueType::Long).is_err());
        assert_eq!(long.convert(&Value::from(""), &ValueType::Long), Ok(Value::Null));

        let int = CustomNumberConverter::new(ValueType::Int, false);
        assert!(int.convert(&Value::Long(i64::MAX), &ValueType::Int).is_err());
        assert!(int.convert(&Value::from("x"), &ValueType::Int).is_err());
        assert!(int.convert(&Value::from(""), &ValueType::Int).is_err());

        let float = CustomNumberConverter::new(ValueType::Float, false);
        assert_eq!(float.convert(&Value::from("2.5"), &ValueType::Float), Ok(Value::Float(2.5)));

        let not_a_number = CustomNumberConverter::new(ValueType::Str, false);
        assert!(not_a_number.convert(&Value::from("1"), &ValueType::Str).is_err());
    }

    #[test]
    fn test_date_converter() {
        let day_only = CustomDateConverter::new("%Y-%m-%d", true);
        assert_eq!(
            day_only.convert(&Value::from("2004-03-24"), &ValueType::Date),
            Ok(date(2004, 3, 24, 0, 0))
        );
        assert_eq!(day_only.convert(&Value::from(""), &ValueType::Date), Ok(Value::Null));
        let err = day_only
            .convert(&Value::from("24/03/2004"), &ValueType::Date)
            .unwrap_err();
        assert!(err.contains("%Y-%m-%d"));

        let with_time = CustomDateConverter::new("%d.%m.%Y %H:%M", false);
        assert_eq!(with_time.format(), "%d.%m.%Y %H:%M");
        assert_eq!(
            with_time.convert(&Value::from("24.03.2004 18:30"), &ValueType::Date),
            Ok(date(2004, 3, 24, 18, 30))
        );
        assert!(with_time.convert(&Value::from(" "), &ValueType::Date).is_err());
    }

    #[test]
    fn test_property_values_converter() {
        let converter = PropertyValuesConverter;

        let converted = converter
            .convert(&Value::from("# pool\nsize=10\nname: main"), &ValueType::Map)
            .unwrap();
        assert_eq!(converted, Value::map([("size", "10"), ("name", "main")]));

        assert_eq!(
            converter.convert(&Value::from(""), &ValueType::Map),
            Ok(Value::Map(IndexMap::new()))
        );
        assert!(converter.convert(&Value::Int(1), &ValueType::Map).is_err());
    }
}
