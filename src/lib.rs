//! 빈 팩토리
//!
//! 이름이 붙은 빈 정의로부터 객체 그래프를 구성하는 경량 IoC 컨테이너입니다.
//! 프로퍼티 바인딩, 참조 해석, 싱글톤 캐시, 팩토리 빈, 별칭을 제공합니다.
//!
//! # Features
//!
//! - **정의 모델**: 클래스를 소유하는 루트 정의와 부모 이름으로 상속하는 자식 정의
//! - **객체 그래프 해석**: 서로를 참조하는 싱글톤도 동일 인스턴스로 엮음
//! - **프로퍼티 바인더**: 중첩 경로(`spouse.age`), 타입 변환, 변경/거부 이벤트, 일괄 에러 수집
//! - **팩토리 빈**: `get_bean("name")`은 product, `get_bean("&name")`은 팩토리 자신
//! - **별칭**: 여러 이름으로 같은 빈 조회
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  DefaultBeanFactory  │ ← 조회, 생성, 싱글톤 캐시
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │  DefinitionRegistry  │ ← 정의, 별칭, 부모 체인 병합
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │     BeanWrapper      │ ← 프로퍼티 변환과 적용
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │ BeanClass/BeanObject │ ← 접근자 표와 살아있는 인스턴스
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use bean_factory::core::factory::{BeanFactory, DefaultBeanFactory};
//! use bean_factory::domain::definition::RootBeanDefinition;
//! use bean_factory::domain::property_values::PropertyValues;
//!
//! let factory = DefaultBeanFactory::new();
//! factory.register_definition(
//!     "rod",
//!     RootBeanDefinition::singleton(person_class(), PropertyValues::new().with("age", "31")),
//! )?;
//! factory.register_alias("rod", "husband")?;
//!
//! let husband = factory.get_bean("husband")?;
//! assert!(husband.ptr_eq(&factory.get_bean("rod")?));
//! ```

pub mod binder;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use crate::binder::BeanWrapper;
pub use crate::core::errors::{BeansError, BeansResult, PropertyBatchError, PropertyError};
pub use crate::core::factory::{BeanFactory, DefaultBeanFactory, ListableBeanFactory};
