//! # Configuration Module
//!
//! 빈 팩토리의 동작 설정을 담당하는 모듈입니다.
//! 환경 변수 기반이며, 바이너리는 시작 시 `PROFILE`에 맞는 `.env.<profile>` 파일을 먼저 로드합니다.
//!
//! ## 모듈 구성
//!
//! - [`factory_config`] - 부모 체인 깊이 제한, 정의/별칭 덮어쓰기 정책
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use bean_factory::config::FactoryConfig;
//! use bean_factory::core::factory::DefaultBeanFactory;
//!
//! let factory = DefaultBeanFactory::with_config(FactoryConfig::from_env());
//! ```
//!
//! ## 환경 변수
//!
//! ```bash
//! export BEAN_FACTORY_MAX_PARENT_DEPTH="64"
//! export BEAN_FACTORY_ALLOW_OVERRIDING="true"
//! export BEAN_FACTORY_ALLOW_ALIAS_OVERRIDING="false"
//! ```
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 프로젝트 |
//! |--------|-------------|
//! | `setAllowBeanDefinitionOverriding()` | `allow_definition_overriding` |
//! | `setAllowAliasOverriding()` | `allow_alias_overriding` |
//! | `application.properties` | `.env` 파일 |

pub mod factory_config;

pub use factory_config::*;
