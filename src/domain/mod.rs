//! # Domain Layer Module
//!
//! 빈 팩토리가 다루는 데이터 모델입니다. 리플렉션이 없는 Rust에서
//! "클래스", "프로퍼티", "빈 인스턴스"를 명시적인 값으로 표현합니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── value            - 프로퍼티 값과 선언 타입 (Value / ValueType)
//! ├── class            - 클래스 기술자와 프로퍼티 접근자 표
//! ├── bean             - Bean trait, 부가 기능, 공유 인스턴스 핸들
//! ├── property_values  - 이름이 유일한 순서 있는 바인딩 집합
//! └── definition       - 루트/자식 빈 정의와 병합 결과
//!      │
//!      ▼
//! Binder (BeanWrapper) → Core (DefaultBeanFactory)
//! ```
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 시스템 | 역할 |
//! |--------|-----------|------|
//! | `java.lang.Class` + `BeanInfo` | [`class::BeanClass`] | 인스턴스화와 프로퍼티 접근 |
//! | `PropertyDescriptor` | [`class::PropertyDescriptor`] | 프로퍼티 이름/타입/접근자 |
//! | `Object` | [`bean::BeanObject`] | 살아있는 인스턴스 |
//! | `RuntimeBeanReference` | [`value::Value::Ref`] | 이름으로 다른 빈 참조 |
//! | `MutablePropertyValues` | [`property_values::PropertyValues`] | 바인딩 집합 |
//! | `RootBeanDefinition` / `ChildBeanDefinition` | [`definition::BeanDefinition`] | 빈 레시피 |

pub mod bean;
pub mod class;
pub mod definition;
pub mod property_values;
pub mod value;
