//! # Bean Factory Error Handling System
//!
//! 빈 팩토리와 프로퍼티 바인더를 위한 통합 에러 처리 시스템입니다.
//! Spring Framework의 `BeansException` 계층을 `thiserror` 기반 열거형 두 개로 나눕니다.
//!
//! ## 에러 분류
//!
//! ### 1. 팩토리 계층 (`BeansError`)
//! - **조회 실패**: `NoSuchDefinition`, `NotOfRequiredType`, `NotAFactory`
//! - **저장소 손상**: `DefinitionStore` (끊어진 부모 링크, 순환 부모 체인, 해석할 수 없는 참조)
//! - **생성 실패**: `Instantiation`, `Initialization`, `FactoryProduct`
//!
//! ### 2. 바인더 계층 (`PropertyError`)
//! - **치명적**: `NotWritable`, `NotReadable`, `InvalidPropertyPath`, `ArrayConversion`
//! - **복구 가능**: `NullValueInNestedPath`, `TypeMismatch`, `SetterInvocation`, `Vetoed`, `Invalid`
//!
//! 복구 가능한 에러는 일괄 바인딩(batch set) 경계 안에서만 복구 가능하며,
//! 그 안에서는 하나의 [`PropertyBatchError`]로 모여서 한 번에 보고됩니다.
//! 단일 설정 경로에서는 모두 즉시 호출자에게 전파됩니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `NoSuchBeanDefinitionException` | `BeansError::NoSuchDefinition` |
//! | `BeanNotOfRequiredTypeException` | `BeansError::NotOfRequiredType` |
//! | `BeanIsNotAFactoryException` | `BeansError::NotAFactory` |
//! | `BeanDefinitionStoreException` | `BeansError::DefinitionStore` |
//! | `NotWritablePropertyException` | `PropertyError::NotWritable` |
//! | `NullValueInNestedPathException` | `PropertyError::NullValueInNestedPath` |
//! | `TypeMismatchException` | `PropertyError::TypeMismatch` |
//! | `MethodInvocationException` | `PropertyError::SetterInvocation` |
//! | `PropertyVetoException` | `PropertyError::Vetoed` |
//! | `PropertyVetoExceptionsException` | `PropertyBatchError` |

use std::fmt;

use thiserror::Error;

use crate::domain::bean::HookError;
use crate::domain::value::ValueType;

/// 팩토리 수준 에러
#[derive(Error, Debug)]
pub enum BeansError {
    /// 이름에 해당하는 정의가 없고, 위임할 부모 팩토리도 없음
    #[error("No bean named '{name}' is defined")]
    NoSuchDefinition { name: String },

    /// 조회된 객체가 요청한 타입에 할당할 수 없음
    #[error("Bean named '{name}' must be of type '{required}', but was actually of type '{actual}'")]
    NotOfRequiredType {
        name: String,
        required: String,
        actual: String,
    },

    /// 역참조 표시(`&`)로 조회했지만 팩토리 빈이 아님
    #[error("Bean named '{name}' is not a factory bean and cannot be dereferenced")]
    NotAFactory { name: String },

    /// 저장소 손상. 항상 치명적이며 재시도하지 않습니다.
    ///
    /// # 발생 시나리오
    /// - 자식 정의의 부모 이름을 찾을 수 없음
    /// - 부모 체인이 순환하거나 허용 깊이를 넘음
    /// - 프로퍼티가 참조하는 빈을 해석할 수 없음 (`source`에 원인)
    /// - 덮어쓰기가 금지된 이름/별칭의 재등록
    #[error("Error in bean definition '{name}': {message}")]
    DefinitionStore {
        name: String,
        message: String,
        #[source]
        source: Option<Box<BeansError>>,
    },

    /// 추상 클래스처럼 생성 함수가 없는 클래스의 인스턴스화 시도
    #[error("Cannot instantiate bean '{name}': class '{class}' has no constructor")]
    Instantiation { name: String, class: String },

    /// `after_properties_set` 훅 실패
    #[error("Initialization of bean '{name}' failed: {source}")]
    Initialization {
        name: String,
        #[source]
        source: HookError,
    },

    /// 팩토리 빈이 product 생산에 실패함
    #[error("Factory bean '{name}' failed to produce its object: {source}")]
    FactoryProduct {
        name: String,
        #[source]
        source: HookError,
    },

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    PropertyBatch(#[from] PropertyBatchError),
}

impl BeansError {
    /// 저장소 손상 에러인지 여부
    pub fn is_store_corruption(&self) -> bool {
        matches!(self, BeansError::DefinitionStore { .. })
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type BeansResult<T> = Result<T, BeansError>;

/// 프로퍼티 바인더 수준 에러
///
/// `property`/`path` 필드는 바인더 기준의 전체 경로(`spouse.spouse.name` 등)를 담습니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Property '{property}' of class '{class}' is not writable")]
    NotWritable { class: String, property: String },

    #[error("Property '{property}' of class '{class}' is not readable")]
    NotReadable { class: String, property: String },

    #[error("Value of nested property '{path}' is null in class '{class}'")]
    NullValueInNestedPath { class: String, path: String },

    #[error("Nested property path '{path}' of class '{class}' does not lead to a bean")]
    InvalidPropertyPath { class: String, path: String },

    #[error("Failed to convert {value} to required type '{required}' for property '{property}': {reason}")]
    TypeMismatch {
        property: String,
        required: ValueType,
        value: String,
        reason: String,
    },

    #[error("Setter for property '{property}' failed: {message}")]
    SetterInvocation { property: String, message: String },

    #[error("Change of property '{property}' was vetoed: {message}")]
    Vetoed { property: String, message: String },

    /// 배열 원소 변환 실패 (데이터 정의 에러)
    #[error("Element {index} of array property '{property}' cannot be converted to '{element}': {message}")]
    ArrayConversion {
        property: String,
        index: usize,
        element: ValueType,
        message: String,
    },

    /// 일괄 바인딩 전 검증기가 보고한 실패
    #[error("Invalid value for property '{property}': {message}")]
    Invalid { property: String, message: String },
}

impl PropertyError {
    /// 에러가 가리키는 프로퍼티 경로
    pub fn property_path(&self) -> &str {
        match self {
            PropertyError::NotWritable { property, .. }
            | PropertyError::NotReadable { property, .. }
            | PropertyError::TypeMismatch { property, .. }
            | PropertyError::SetterInvocation { property, .. }
            | PropertyError::Vetoed { property, .. }
            | PropertyError::ArrayConversion { property, .. }
            | PropertyError::Invalid { property, .. } => property,
            PropertyError::NullValueInNestedPath { path, .. }
            | PropertyError::InvalidPropertyPath { path, .. } => path,
        }
    }

    /// 일괄 바인딩 중 수집 후 계속 진행할 수 있는 에러인지 여부
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PropertyError::NullValueInNestedPath { .. }
                | PropertyError::TypeMismatch { .. }
                | PropertyError::SetterInvocation { .. }
                | PropertyError::Vetoed { .. }
                | PropertyError::Invalid { .. }
        )
    }

    /// 중첩 바인더에서 올라온 에러의 경로 앞에 `prefix.`를 붙입니다.
    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        let path = match &mut self {
            PropertyError::NotWritable { property, .. }
            | PropertyError::NotReadable { property, .. }
            | PropertyError::TypeMismatch { property, .. }
            | PropertyError::SetterInvocation { property, .. }
            | PropertyError::Vetoed { property, .. }
            | PropertyError::ArrayConversion { property, .. }
            | PropertyError::Invalid { property, .. } => property,
            PropertyError::NullValueInNestedPath { path, .. }
            | PropertyError::InvalidPropertyPath { path, .. } => path,
        };
        *path = format!("{}.{}", prefix, path);
        self
    }
}

/// 일괄 바인딩에서 모인 복구 가능한 에러들
#[derive(Error, Debug, Clone, PartialEq)]
pub struct PropertyBatchError {
    errors: Vec<PropertyError>,
}

impl PropertyBatchError {
    pub fn new(errors: Vec<PropertyError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[PropertyError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 특정 프로퍼티 경로의 첫 번째 에러
    pub fn error_for(&self, property: &str) -> Option<&PropertyError> {
        self.errors.iter().find(|e| e.property_path() == property)
    }

    pub fn into_errors(self) -> Vec<PropertyError> {
        self.errors
    }
}

impl fmt::Display for PropertyBatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} property binding error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}
