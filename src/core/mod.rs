//! # Core Container Module
//!
//! 빈 팩토리 컨테이너의 핵심입니다. 정의를 저장하고, 이름으로 빈을 조회하며,
//! 참조를 따라 객체 그래프를 엮고, 싱글톤을 캐시합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 정의/별칭 저장소
//! - 이름 → 정의, 별칭 → 정식 이름
//! - 덮어쓰기 정책과 부모 체인 병합
//!
//! ### [`factory`] - 객체 그래프 해석기
//! - `BeanFactory` / `ListableBeanFactory` trait
//! - `DefaultBeanFactory`: in-flight 맵 기반 순환 참조 해소, 싱글톤 캐시, 팩토리 빈 역참조
//!
//! ### [`errors`] - 통합 에러 처리
//! - `BeansError`: 팩토리 수준 에러
//! - `PropertyError` / `PropertyBatchError`: 바인더 수준 에러
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 프레임워크 |
//! |--------|---------------|
//! | `BeanFactory` | [`factory::BeanFactory`] |
//! | `ListableBeanFactoryImpl` | [`factory::DefaultBeanFactory`] |
//! | `BeanDefinitionRegistry` | [`registry::DefinitionRegistry`] |
//! | `BeansException` | [`errors::BeansError`] |
//! | `&factoryBean` | [`factory::FACTORY_BEAN_PREFIX`] |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use bean_factory::core::factory::{BeanFactory, DefaultBeanFactory};
//! use bean_factory::domain::definition::RootBeanDefinition;
//! use bean_factory::domain::property_values::PropertyValues;
//! use bean_factory::domain::value::Value;
//!
//! let factory = DefaultBeanFactory::new();
//! factory.register_definition(
//!     "rod",
//!     RootBeanDefinition::singleton(
//!         person_class(),
//!         PropertyValues::new().with("age", 31).with("spouse", Value::reference("kerry")),
//!     ),
//! )?;
//! factory.register_definition(
//!     "kerry",
//!     RootBeanDefinition::singleton(
//!         person_class(),
//!         PropertyValues::new().with("spouse", Value::reference("rod")),
//!     ),
//! )?;
//!
//! // 서로를 참조하는 두 싱글톤도 같은 인스턴스로 엮입니다
//! let rod = factory.get_bean("rod")?;
//! ```

pub mod errors;
pub mod factory;
pub mod registry;
