//! 빈 팩토리 동작 설정
//!
//! 환경 변수에서 읽으며, 값이 없으면 기본값을, 파싱에 실패하면 에러를 로그로 남기고 기본값을 사용합니다.

use std::env;
use std::str::FromStr;

use log::{error, info};

pub const MAX_PARENT_DEPTH_VAR: &str = "BEAN_FACTORY_MAX_PARENT_DEPTH";
pub const ALLOW_OVERRIDING_VAR: &str = "BEAN_FACTORY_ALLOW_OVERRIDING";
pub const ALLOW_ALIAS_OVERRIDING_VAR: &str = "BEAN_FACTORY_ALLOW_ALIAS_OVERRIDING";

/// 팩토리 설정
///
/// | 필드 | 환경 변수 | 기본값 |
/// |------|-----------|--------|
/// | `max_parent_depth` | `BEAN_FACTORY_MAX_PARENT_DEPTH` | 64 |
/// | `allow_definition_overriding` | `BEAN_FACTORY_ALLOW_OVERRIDING` | true |
/// | `allow_alias_overriding` | `BEAN_FACTORY_ALLOW_ALIAS_OVERRIDING` | false |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// 자식 정의 체인이 루트까지 거칠 수 있는 최대 단계 수
    pub max_parent_depth: usize,
    /// 같은 이름으로 정의를 다시 등록하면 교체할지 여부
    pub allow_definition_overriding: bool,
    /// 이미 다른 이름을 가리키는 별칭을 다시 묶을 수 있는지 여부
    pub allow_alias_overriding: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_parent_depth: 64,
            allow_definition_overriding: true,
            allow_alias_overriding: false,
        }
    }
}

impl FactoryConfig {
    /// 프로세스 환경 변수에서 설정을 로드합니다.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # .env.dev
    /// BEAN_FACTORY_MAX_PARENT_DEPTH=16
    /// BEAN_FACTORY_ALLOW_OVERRIDING=false
    /// ```
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        info!("Bean factory 설정 로드됨: {:?}", config);
        config
    }

    /// 임의의 키 조회 함수로 설정을 구성합니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_parent_depth: parse_or(&lookup, MAX_PARENT_DEPTH_VAR, defaults.max_parent_depth),
            allow_definition_overriding: parse_or(
                &lookup,
                ALLOW_OVERRIDING_VAR,
                defaults.allow_definition_overriding,
            ),
            allow_alias_overriding: parse_or(
                &lookup,
                ALLOW_ALIAS_OVERRIDING_VAR,
                defaults.allow_alias_overriding,
            ),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {:?} 사용", key, e, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = FactoryConfig::from_lookup(|_| None);
        assert_eq!(config, FactoryConfig::default());
        assert_eq!(config.max_parent_depth, 64);
        assert!(config.allow_definition_overriding);
        assert!(!config.allow_alias_overriding);
    }

    #[test]
    fn test_values_are_parsed() {
        let config = FactoryConfig::from_lookup(lookup_from(&[
            (MAX_PARENT_DEPTH_VAR, " 8 "),
            (ALLOW_OVERRIDING_VAR, "false"),
            (ALLOW_ALIAS_OVERRIDING_VAR, "true"),
        ]));

        assert_eq!(config.max_parent_depth, 8);
        assert!(!config.allow_definition_overriding);
        assert!(config.allow_alias_overriding);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = FactoryConfig::from_lookup(lookup_from(&[
            (MAX_PARENT_DEPTH_VAR, "deep"),
            (ALLOW_OVERRIDING_VAR, "nope"),
        ]));

        assert_eq!(config, FactoryConfig::default());
    }
}
