//! # Property Value Model
//!
//! 빈 정의와 프로퍼티 바인더 사이를 오가는 값의 표현입니다.
//! Java의 `Object` + 리플렉션 대신, 바인딩 가능한 모든 값을 하나의 태그드 유니온(`Value`)으로,
//! 프로퍼티가 선언한 타입을 `ValueType`으로 명시합니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `Object` 프로퍼티 값 | `Value` |
//! | `Class<?>` 프로퍼티 타입 | `ValueType` |
//! | `RuntimeBeanReference` | `Value::Ref` |
//! | `ManagedList` / `ManagedMap` | `Value::List` / `Value::Map` |
//! | `java.util.Locale` | `Locale` |
//! | `java.util.Date` | `chrono::NaiveDateTime` |
//! | `java.util.Properties` | `Properties` |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::domain::bean::BeanObject;
use crate::domain::class::BeanClass;

/// 문자열 키/값 블록 (`java.util.Properties` 대응)
pub type Properties = BTreeMap<String, String>;

/// 언어/국가/변형으로 구성된 로케일
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: country.to_uppercase(),
            variant: variant.to_string(),
        }
    }

    /// `en`, `en_US`, `de-DE`, `en_US_POSIX` 형태의 문자열을 파싱합니다.
    ///
    /// 빈 문자열이거나 구성 요소가 3개를 넘으면 `None`을 반환합니다.
    /// 바인더는 빈 문자열을 파싱 전에 null로 바꿉니다.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let parts: Vec<&str> = text.split(['_', '-']).collect();
        if parts.len() > 3 || parts[0].is_empty() {
            return None;
        }
        Some(Self::new(
            parts[0],
            parts.get(1).copied().unwrap_or(""),
            parts.get(2).copied().unwrap_or(""),
        ))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

/// 프로퍼티가 선언한 타입
///
/// `Bool`, `Int`, `Long`, `Float`는 primitive 타입으로, nullable로 선언되지 않은 한
/// null 이나 빈 문자열을 받을 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Long,
    Float,
    Str,
    Locale,
    Date,
    Properties,
    Class,
    Bean,
    List,
    Map,
    Array(Box<ValueType>),
    Any,
}

impl ValueType {
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueType::Bool | ValueType::Int | ValueType::Long | ValueType::Float
        )
    }

    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::Long => write!(f, "long"),
            ValueType::Float => write!(f, "float"),
            ValueType::Str => write!(f, "string"),
            ValueType::Locale => write!(f, "locale"),
            ValueType::Date => write!(f, "date"),
            ValueType::Properties => write!(f, "properties"),
            ValueType::Class => write!(f, "class"),
            ValueType::Bean => write!(f, "bean"),
            ValueType::List => write!(f, "list"),
            ValueType::Map => write!(f, "map"),
            ValueType::Array(element) => write!(f, "{}[]", element),
            ValueType::Any => write!(f, "any"),
        }
    }
}

/// 바인딩 가능한 모든 값
///
/// `Ref`는 정의 단계에서만 등장하는 forward reference 입니다.
/// 리졸버가 연결(wiring) 시점에 살아있는 빈(`Value::Bean`)으로 치환하며,
/// 치환되지 않은 `Ref`가 바인더에 도달하면 타입 불일치로 처리됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    Str(String),
    Locale(Locale),
    Date(NaiveDateTime),
    Properties(Properties),
    Class(Arc<BeanClass>),
    Bean(BeanObject),
    Ref(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Array(ValueType, Vec<Value>),
}

impl Value {
    /// 다른 빈을 가리키는 forward reference를 생성합니다.
    pub fn reference(bean_name: impl Into<String>) -> Self {
        Value::Ref(bean_name.into())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bean(&self) -> Option<&BeanObject> {
        match self {
            Value::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// 값 자체의 타입. `Null`과 해석 전의 `Ref`는 타입이 없습니다.
    pub fn value_type(&self) -> Option<ValueType> {
        let ty = match self {
            Value::Null | Value::Ref(_) => return None,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::Locale(_) => ValueType::Locale,
            Value::Date(_) => ValueType::Date,
            Value::Properties(_) => ValueType::Properties,
            Value::Class(_) => ValueType::Class,
            Value::Bean(_) => ValueType::Bean,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
            Value::Array(element, _) => ValueType::array_of(element.clone()),
        };
        Some(ty)
    }

    /// 변환 없이 그대로 `target` 타입 프로퍼티에 대입할 수 있는지 확인합니다.
    pub fn is_assignable_to(&self, target: &ValueType) -> bool {
        match (self, target) {
            (Value::Ref(_), _) => false,
            (_, ValueType::Any) => true,
            (Value::Array(element, _), ValueType::Array(required)) => {
                **required == ValueType::Any || element == &**required
            }
            _ => self.value_type().as_ref() == Some(target),
        }
    }

    /// 컬렉션 내부까지 포함해 해석되지 않은 forward reference가 있는지 확인합니다.
    pub fn contains_references(&self) -> bool {
        match self {
            Value::Ref(_) => true,
            Value::List(items) | Value::Array(_, items) => {
                items.iter().any(Value::contains_references)
            }
            Value::Map(entries) => entries.values().any(Value::contains_references),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Locale(locale) => write!(f, "{}", locale),
            Value::Date(date) => write!(f, "{}", date),
            Value::Properties(props) => write!(f, "{:?}", props),
            Value::Class(class) => write!(f, "class {}", class.name()),
            Value::Bean(bean) => write!(f, "{:?}", bean),
            Value::Ref(name) => write!(f, "<ref {}>", name),
            Value::List(items) | Value::Array(_, items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Locale> for Value {
    fn from(v: Locale) -> Self {
        Value::Locale(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v)
    }
}

impl From<BeanObject> for Value {
    fn from(v: BeanObject) -> Self {
        Value::Bean(v)
    }
}

/// Rust 필드 타입과 `Value` 사이의 변환 규칙
///
/// [`BeanClass`] 빌더가 타입이 있는 getter/setter를 타입 소거된 접근자로 감쌀 때 사용합니다.
/// `Option<T>`로 선언된 프로퍼티는 nullable 이므로 primitive 검사를 받지 않습니다.
pub trait PropertyType: Sized + 'static {
    fn value_type() -> ValueType;

    fn is_primitive() -> bool {
        false
    }

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

impl PropertyType for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn is_primitive() -> bool {
        true
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for i32 {
    fn value_type() -> ValueType {
        ValueType::Int
    }

    fn is_primitive() -> bool {
        true
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(v),
            Value::Long(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl PropertyType for i64 {
    fn value_type() -> ValueType {
        ValueType::Long
    }

    fn is_primitive() -> bool {
        true
    }

    fn into_value(self) -> Value {
        Value::Long(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Long(v) => Some(v),
            Value::Int(v) => Some(i64::from(v)),
            _ => None,
        }
    }
}

impl PropertyType for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }

    fn is_primitive() -> bool {
        true
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            Value::Int(v) => Some(f64::from(v)),
            Value::Long(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl PropertyType for String {
    fn value_type() -> ValueType {
        ValueType::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PropertyType for Locale {
    fn value_type() -> ValueType {
        ValueType::Locale
    }

    fn into_value(self) -> Value {
        Value::Locale(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Locale(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for NaiveDateTime {
    fn value_type() -> ValueType {
        ValueType::Date
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Properties {
    fn value_type() -> ValueType {
        ValueType::Properties
    }

    fn into_value(self) -> Value {
        Value::Properties(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Properties(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Arc<BeanClass> {
    fn value_type() -> ValueType {
        ValueType::Class
    }

    fn into_value(self) -> Value {
        Value::Class(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Class(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for BeanObject {
    fn value_type() -> ValueType {
        ValueType::Bean
    }

    fn into_value(self) -> Value {
        Value::Bean(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bean(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Vec<Value> {
    fn value_type() -> ValueType {
        ValueType::List
    }

    fn into_value(self) -> Value {
        Value::List(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Array(_, items) => Some(items),
            _ => None,
        }
    }
}

impl PropertyType for IndexMap<String, Value> {
    fn value_type() -> ValueType {
        ValueType::Map
    }

    fn into_value(self) -> Value {
        Value::Map(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl PropertyType for Value {
    fn value_type() -> ValueType {
        ValueType::Any
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl PropertyType for Vec<String> {
    fn value_type() -> ValueType {
        ValueType::array_of(ValueType::Str)
    }

    fn into_value(self) -> Value {
        Value::Array(ValueType::Str, self.into_iter().map(Value::Str).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(_, items) | Value::List(items) => {
                items.into_iter().map(String::from_value).collect()
            }
            _ => None,
        }
    }
}

impl PropertyType for Vec<i32> {
    fn value_type() -> ValueType {
        ValueType::array_of(ValueType::Int)
    }

    fn into_value(self) -> Value {
        Value::Array(ValueType::Int, self.into_iter().map(Value::Int).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(_, items) | Value::List(items) => {
                items.into_iter().map(i32::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<T: PropertyType> PropertyType for Option<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, T::into_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        let locale = Locale::parse("en_us").unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), "US");
        assert_eq!(locale.to_string(), "en_US");

        assert_eq!(Locale::parse("de-DE").unwrap(), Locale::new("de", "DE", ""));
        assert_eq!(Locale::parse("fr").unwrap().to_string(), "fr");
        assert!(Locale::parse("").is_none());
        assert!(Locale::parse("a_b_c_d").is_none());
    }

    #[test]
    fn test_assignability() {
        assert!(Value::Int(1).is_assignable_to(&ValueType::Int));
        assert!(!Value::Int(1).is_assignable_to(&ValueType::Long));
        assert!(Value::Str("x".into()).is_assignable_to(&ValueType::Any));
        assert!(!Value::reference("a").is_assignable_to(&ValueType::Any));

        let strings = Value::Array(ValueType::Str, vec![Value::from("a")]);
        assert!(strings.is_assignable_to(&ValueType::array_of(ValueType::Str)));
        assert!(!strings.is_assignable_to(&ValueType::array_of(ValueType::Int)));
    }

    #[test]
    fn test_contains_references_in_collections() {
        let nested = Value::map([("k", Value::list([Value::reference("b")]))]);
        assert!(nested.contains_references());
        assert!(!Value::list(["a", "b"]).contains_references());
    }

    #[test]
    fn test_option_property_type_accepts_null() {
        assert_eq!(<Option<i32>>::from_value(Value::Null), Some(None));
        assert_eq!(<Option<i32>>::from_value(Value::Int(3)), Some(Some(3)));
        assert!(!<Option<i32>>::is_primitive());
        assert!(i32::is_primitive());
        assert_eq!(i32::from_value(Value::Long(i64::MAX)), None);
    }
}
