//! # Property Converters
//!
//! 바인딩 값을 프로퍼티가 선언한 타입으로 바꾸는 변환기들입니다.
//! Spring의 `PropertyEditor` 대신 `(값, 대상 타입) → 값` 함수 하나로 표현합니다.
//!
//! ## 변환기 조회 순서
//!
//! 1. 바인더에 등록된 `(타입, 프로퍼티 이름)` 전용 변환기
//! 2. 바인더에 등록된 타입 전용 변환기
//! 3. 기본 변환기 ([`convert_builtin`]): 숫자/불리언 파싱, 문자열 배열, 로케일, 프로퍼티 블록, 클래스 이름
//! 4. 팩토리 단위의 대체(fallback) 레지스트리 [`ConverterRegistry`]
//!
//! 불리언 문자열은 `true` / `false`만 받습니다(대소문자 무시). 로케일 프로퍼티에 빈 문자열을 주면 null이 됩니다.
//! 빈 문자열을 숫자나 불리언의 null로 받고 싶다면 [`standard_converters`](super::standard_converters)의
//! 변환기를 등록합니다.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::class::ClassRegistry;
use crate::domain::value::{Locale, Properties, Value, ValueType};
use crate::utils::string_utils::{is_blank, parse_properties_block};

/// 값 변환기
///
/// 실패 메시지는 바인더가 `TypeMismatch` 에러의 사유로 사용합니다.
pub trait PropertyConverter: Send + Sync {
    fn convert(&self, value: &Value, target: &ValueType) -> Result<Value, String>;
}

impl<F> PropertyConverter for F
where
    F: Fn(&Value, &ValueType) -> Result<Value, String> + Send + Sync,
{
    fn convert(&self, value: &Value, target: &ValueType) -> Result<Value, String> {
        self(value, target)
    }
}

/// 바인더 하나에 등록된 사용자 정의 변환기
///
/// 경로 전용 변환기의 키는 바인더 기준의 전체 경로입니다.
/// 중첩 바인더가 만들어질 때 [`inherit`](Self::inherit)로 앞쪽 경로를 잘라낸 사본을 넘겨주며,
/// 그 이후 부모에 등록된 변환기는 이미 만들어진 중첩 바인더에 보이지 않습니다.
#[derive(Clone, Default)]
pub(crate) struct CustomConverters {
    by_type: HashMap<ValueType, Arc<dyn PropertyConverter>>,
    by_path: HashMap<(ValueType, String), Arc<dyn PropertyConverter>>,
}

impl CustomConverters {
    pub(crate) fn register(
        &mut self,
        target: ValueType,
        path: Option<&str>,
        converter: Arc<dyn PropertyConverter>,
    ) {
        match path {
            Some(path) => {
                self.by_path.insert((target, path.to_string()), converter);
            }
            None => {
                self.by_type.insert(target, converter);
            }
        }
    }

    pub(crate) fn find(
        &self,
        target: &ValueType,
        property: Option<&str>,
    ) -> Option<&Arc<dyn PropertyConverter>> {
        property
            .and_then(|name| self.by_path.get(&(target.clone(), name.to_string())))
            .or_else(|| self.by_type.get(target))
    }

    /// `prefix` 프로퍼티가 가리키는 중첩 객체용 사본
    pub(crate) fn inherit(&self, prefix: &str) -> Self {
        let by_path = self
            .by_path
            .iter()
            .filter_map(|((target, path), converter)| {
                let rest = path.strip_prefix(prefix)?.strip_prefix('.')?;
                Some(((target.clone(), rest.to_string()), Arc::clone(converter)))
            })
            .collect();

        Self {
            by_type: self.by_type.clone(),
            by_path,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_type.len() + self.by_path.len()
    }
}

/// 타입별 대체 변환기 레지스트리
///
/// 팩토리가 하나를 소유하고 자신이 만드는 모든 바인더에 공유합니다.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: RwLock<HashMap<ValueType, Arc<dyn PropertyConverter>>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, target: ValueType, converter: impl PropertyConverter + 'static) {
        self.converters.write().insert(target, Arc::new(converter));
    }

    pub fn find(&self, target: &ValueType) -> Option<Arc<dyn PropertyConverter>> {
        self.converters.read().get(target).cloned()
    }

    pub fn len(&self) -> usize {
        self.converters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.read().is_empty()
    }
}

/// 기본 변환 규칙
///
/// 해당하는 규칙이 없으면 `None`을 반환해 다음 단계로 넘깁니다.
/// 배열 대상 변환은 원소 단위 에러 보고가 필요하므로 바인더가 직접 처리합니다.
pub(crate) fn convert_builtin(
    value: &Value,
    target: &ValueType,
    classes: Option<&ClassRegistry>,
) -> Option<Result<Value, String>> {
    let converted = match (value, target) {
        (Value::Str(text), ValueType::Bool) => parse_bool(text).map(Value::Bool),
        (Value::Str(text), ValueType::Int) => text
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|e| e.to_string()),
        (Value::Str(text), ValueType::Long) => text
            .trim()
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|e| e.to_string()),
        (Value::Str(text), ValueType::Float) => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| e.to_string()),
        (Value::Int(v), ValueType::Long) => Ok(Value::Long(i64::from(*v))),
        (Value::Int(v), ValueType::Float) => Ok(Value::Float(f64::from(*v))),
        (Value::Long(v), ValueType::Float) => Ok(Value::Float(*v as f64)),
        (Value::Long(v), ValueType::Int) => i32::try_from(*v)
            .map(Value::Int)
            .map_err(|e| e.to_string()),
        (Value::Str(text), ValueType::Locale) if is_blank(text) => Ok(Value::Null),
        (Value::Str(text), ValueType::Locale) => Locale::parse(text)
            .map(Value::Locale)
            .ok_or_else(|| format!("'{}' is not a valid locale", text)),
        (Value::Str(text), ValueType::Properties) => {
            Ok(Value::Properties(parse_properties_block(text)))
        }
        (Value::Map(entries), ValueType::Properties) => entries
            .iter()
            .map(|(key, value)| match value {
                Value::Str(s) => Ok((key.clone(), s.clone())),
                other => Err(format!("entry '{}' is not a string: {}", key, other)),
            })
            .collect::<Result<Properties, String>>()
            .map(Value::Properties),
        (Value::Str(text), ValueType::Class) => {
            let name = text.trim();
            match classes.and_then(|registry| registry.get(name)) {
                Some(class) => Ok(Value::Class(class)),
                None => Err(format!("class '{}' is not registered", name)),
            }
        }
        _ => return None,
    };
    Some(converted)
}

/// `true` / `false`만 허용합니다 (대소문자 무시).
pub(crate) fn parse_bool(text: &str) -> Result<bool, String> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("'{}' is not a boolean", text))
    }
}
