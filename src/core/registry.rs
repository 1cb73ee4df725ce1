//! # Definition Registry - 빈 정의와 별칭 저장소
//!
//! 이름 → 정의, 별칭 → 정식 이름의 두 맵을 관리합니다.
//! 빈 인스턴스는 여기 없고, 생성과 캐시는 [`DefaultBeanFactory`](crate::core::factory::DefaultBeanFactory)가 담당합니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `registerBeanDefinition()` | [`DefinitionRegistry::register`] |
//! | `registerAlias()` | [`DefinitionRegistry::register_alias`] |
//! | `transformedBeanName()` | [`DefinitionRegistry::canonical_name`] |
//! | `getAliases()` | [`DefinitionRegistry::aliases_for`] |
//! | `getMergedBeanDefinition()` | [`DefinitionRegistry::merged`] |
//!
//! ## 별칭 해석
//!
//! 별칭은 한 단계만 따라갑니다. 별칭이 다른 별칭을 가리키도록 등록하는 것은 막지 않지만,
//! 그 별칭으로는 실제 정의에 도달하지 못합니다.
//!
//! ```text
//! "husband" ──alias──▶ "rod" ──definition──▶ RootBeanDefinition(TestBean)
//! ```
//!
//! ## 덮어쓰기 정책
//!
//! - 정의: [`FactoryConfig::allow_definition_overriding`]이 켜져 있으면 교체하고 경고를 남깁니다.
//! - 별칭: [`FactoryConfig::allow_alias_overriding`]이 꺼져 있으면 다른 이름으로의 재바인딩은 에러입니다.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::config::FactoryConfig;
use crate::core::errors::{BeansError, BeansResult};
use crate::domain::class::ClassRegistry;
use crate::domain::definition::{BeanDefinition, MergedBeanDefinition};

/// 빈 정의와 별칭 레지스트리
///
/// 등록 순서를 유지하므로 [`names`](Self::names)는 등록한 순서대로 돌려줍니다.
pub struct DefinitionRegistry {
    config: FactoryConfig,
    definitions: RwLock<IndexMap<String, BeanDefinition>>,
    aliases: RwLock<IndexMap<String, String>>,
    classes: Arc<ClassRegistry>,
}

impl DefinitionRegistry {
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            definitions: RwLock::new(IndexMap::new()),
            aliases: RwLock::new(IndexMap::new()),
            classes: Arc::new(ClassRegistry::new()),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// 정의에 등장한 루트 클래스가 모이는 레지스트리 (문자열 → 클래스 변환에 사용)
    pub fn class_registry(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    /// 정의를 등록합니다.
    ///
    /// # Errors
    ///
    /// 모두 [`BeansError::DefinitionStore`]입니다.
    /// - 이름이 비어 있음
    /// - 루트 정의의 클래스가 추상 클래스
    /// - 이미 별칭으로 쓰이는 이름
    /// - 덮어쓰기가 금지된 상태에서 같은 이름이 이미 존재
    pub fn register(&self, name: &str, definition: impl Into<BeanDefinition>) -> BeansResult<()> {
        let definition = definition.into();
        if name.trim().is_empty() {
            return Err(store_error(name, "bean name must not be empty"));
        }
        definition.validate(name)?;

        if let Some(target) = self.aliases.read().get(name) {
            return Err(store_error(
                name,
                format!("name is already used as an alias for '{}'", target),
            ));
        }

        let mut definitions = self.definitions.write();
        if let Some(existing) = definitions.get(name) {
            if !self.config.allow_definition_overriding {
                return Err(store_error(
                    name,
                    "a definition with this name is already registered and overriding is disabled",
                ));
            }
            if *existing != definition {
                warn!("Overriding bean definition for bean '{}'", name);
            }
        }

        if let Some(class) = definition.root_class() {
            self.classes.register(Arc::clone(class));
        }
        debug!(
            "Registering bean definition '{}' ({})",
            name,
            describe(&definition)
        );
        definitions.insert(name.to_string(), definition);
        Ok(())
    }

    /// `alias`를 `name`의 다른 이름으로 등록합니다.
    ///
    /// 자기 자신을 가리키는 별칭은 아무 일도 하지 않습니다.
    pub fn register_alias(&self, name: &str, alias: &str) -> BeansResult<()> {
        if alias == name {
            return Ok(());
        }
        if alias.trim().is_empty() {
            return Err(store_error(name, "alias must not be empty"));
        }
        if self.definitions.read().contains_key(alias) {
            return Err(store_error(
                name,
                format!("cannot register alias '{}': a bean definition uses that name", alias),
            ));
        }

        let mut aliases = self.aliases.write();
        if let Some(current) = aliases.get(alias) {
            if current == name {
                return Ok(());
            }
            if !self.config.allow_alias_overriding {
                return Err(store_error(
                    name,
                    format!(
                        "cannot register alias '{}': it is already bound to '{}'",
                        alias, current
                    ),
                ));
            }
            info!(
                "Rebinding alias '{}' from '{}' to '{}'",
                alias, current, name
            );
        }
        aliases.insert(alias.to_string(), name.to_string());
        debug!("Registered alias '{}' for bean '{}'", alias, name);
        Ok(())
    }

    /// 별칭이면 한 단계 따라간 정식 이름을, 아니면 그대로 돌려줍니다.
    pub fn canonical_name(&self, name: &str) -> String {
        self.aliases
            .read()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// `name`을 가리키는 모든 별칭 (등록 순서)
    pub fn aliases_for(&self, name: &str) -> Vec<String> {
        self.aliases
            .read()
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    pub fn definition(&self, name: &str) -> Option<BeanDefinition> {
        self.definitions.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    /// 부모 체인을 해석한 유효 정의
    ///
    /// 정의가 없으면 `Ok(None)`, 체인이 끊겼거나 순환하면 저장소 손상 에러입니다.
    pub fn merged(&self, name: &str) -> BeansResult<Option<MergedBeanDefinition>> {
        let definitions = self.definitions.read();
        let Some(definition) = definitions.get(name) else {
            return Ok(None);
        };
        definition
            .merge(
                name,
                |parent: &str| definitions.get(parent),
                self.config.max_parent_depth,
            )
            .map(Some)
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.definitions.read().keys().cloned().collect()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.read().len()
    }
}

impl std::fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("definitions", &self.names())
            .field("aliases", &*self.aliases.read())
            .field("config", &self.config)
            .finish()
    }
}

fn describe(definition: &BeanDefinition) -> String {
    let scope = if definition.is_singleton() {
        "singleton"
    } else {
        "prototype"
    };
    match (definition.root_class(), definition.parent_name()) {
        (Some(class), _) => format!("class {}, {}", class.name(), scope),
        (None, Some(parent)) => format!("child of '{}', {}", parent, scope),
        (None, None) => scope.to_string(),
    }
}

fn store_error(name: &str, message: impl Into<String>) -> BeansError {
    BeansError::DefinitionStore {
        name: name.to_string(),
        message: message.into(),
        source: None,
    }
}
