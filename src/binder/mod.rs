//! # Property Binder
//!
//! 살아있는 빈 인스턴스에 프로퍼티 값을 적용하는 계층입니다.
//!
//! - [`bean_wrapper`] - 단일/일괄 설정, 중첩 경로, 타입 변환, 변경 이벤트
//! - [`converters`] - 변환기 trait, 기본 변환 규칙, 대체 변환기 레지스트리
//! - [`events`] - 변경 통지와 거부(veto) 리스너
//! - [`standard_converters`] - 빈 값 허용 여부를 고를 수 있는 재사용 변환기 (불리언, 숫자, 날짜, 텍스트 블록)
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `BeanWrapperImpl` | [`BeanWrapper`] |
//! | `PropertyEditor` | [`PropertyConverter`] |
//! | `PropertyEditorManager` | [`ConverterRegistry`] |
//! | `propertyeditors.*` | [`standard_converters`] |
//! | `PropertyValuesValidator` | [`PropertyValuesValidator`] |

pub mod bean_wrapper;
pub mod converters;
pub mod events;
pub mod standard_converters;

pub use bean_wrapper::{BeanWrapper, PropertyValuesValidator, RequiredPropertiesValidator};
pub use converters::{ConverterRegistry, PropertyConverter};
pub use events::{PropertyChangeEvent, PropertyChangeListener, VetoableChangeListener};
pub use standard_converters::{
    CustomBooleanConverter, CustomDateConverter, CustomNumberConverter, PropertyValuesConverter,
};
