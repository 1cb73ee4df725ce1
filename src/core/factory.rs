//! # Bean Factory - 객체 그래프 해석기
//!
//! 정의 레지스트리를 바탕으로 빈 인스턴스를 만들고, 참조를 해석하고, 싱글톤을 캐시합니다.
//! Spring 1.0의 `AbstractBeanFactory` / `ListableBeanFactoryImpl`에 해당합니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `BeanFactory` | [`BeanFactory`] |
//! | `ListableBeanFactory` | [`ListableBeanFactory`] |
//! | `ListableBeanFactoryImpl` | [`DefaultBeanFactory`] |
//! | `FACTORY_BEAN_PREFIX` | [`FACTORY_BEAN_PREFIX`] |
//! | `newlyCreatedBeans` | 조회 한 번 동안 사는 `InFlight` 맵 |
//! | `synchronized (singletonCache)` | `ReentrantMutex` |
//! | `preInstantiateSingletons()` | [`DefaultBeanFactory::realize_all_singletons`] |
//!
//! ## 조회 흐름
//!
//! ```text
//! get_bean("&name")
//!   ├─ 1. "&" 제거, 별칭 한 단계 해석 → 정식 이름
//!   ├─ 2. 아직 생성 중(in-flight)이면 미완성 인스턴스를 그대로 반환 (순환 참조 해소)
//!   ├─ 3. 싱글톤 캐시 확인
//!   ├─ 4. 정의 조회 (부모 체인 병합)
//!   │     ├─ singleton → 재진입 잠금 안에서 재확인 후 생성, 캐시
//!   │     ├─ prototype → 매번 생성
//!   │     └─ 정의 없음 → 부모 팩토리에 원래 이름으로 위임
//!   └─ 5. 팩토리 빈 처리
//!         ├─ "&" 조회 + 팩토리 빈 → 팩토리 자신
//!         ├─ "&" 조회 + 일반 빈 → NotAFactory
//!         └─ 일반 조회 + 팩토리 빈 → get_object() + pass-through 프로퍼티
//! ```
//!
//! ## 빈 생성 단계
//!
//! 1. 클래스 인스턴스화 후 즉시 in-flight 맵에 등록
//! 2. 프로퍼티 값의 참조(`Value::Ref`)를 같은 in-flight 맵으로 재귀 해석
//! 3. [`BeanWrapper`]로 프로퍼티 일괄 적용
//! 4. `after_properties_set` 호출
//! 5. `set_bean_factory` 호출
//! 6. 성공 여부와 관계없이 in-flight 맵에서 제거
//!
//! 생성이 끝난 빈을 다시 참조하면 캐시(또는 새 prototype)를 거쳐 팩토리 빈 처리까지 받습니다.
//!
//! ## 동시성
//!
//! 싱글톤 생성은 팩토리 단위 재진입 잠금 하나로 직렬화됩니다. 같은 스레드의 재귀 생성은
//! 잠금을 다시 얻을 수 있고, 다른 스레드는 생성이 끝날 때까지 기다렸다가 캐시된 인스턴스를 받습니다.
//! in-flight 맵은 조회 호출마다 따로 만들어지므로 스레드 사이에 공유되지 않습니다.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use parking_lot::{ReentrantMutex, RwLock};

use crate::binder::bean_wrapper::BeanWrapper;
use crate::binder::converters::ConverterRegistry;
use crate::config::FactoryConfig;
use crate::core::errors::{BeansError, BeansResult};
use crate::core::registry::DefinitionRegistry;
use crate::domain::bean::BeanObject;
use crate::domain::class::ClassRegistry;
use crate::domain::definition::{BeanDefinition, MergedBeanDefinition};
use crate::domain::property_values::PropertyValues;
use crate::domain::value::Value;

/// 이 접두사로 시작하는 이름은 팩토리 빈의 product가 아니라 팩토리 자신을 요청합니다.
pub const FACTORY_BEAN_PREFIX: &str = "&";

/// 한 번의 최상위 조회 동안 아직 생성이 끝나지 않은 인스턴스 (정식 이름 → 미완성 인스턴스)
type InFlight = HashMap<String, BeanObject>;

/// 빈 조회 인터페이스
pub trait BeanFactory: Send + Sync {
    /// 이름으로 빈을 조회합니다. 이름은 정식 이름, 별칭, `&` 접두사가 붙은 이름 모두 가능합니다.
    fn get_bean(&self, name: &str) -> BeansResult<BeanObject>;

    /// 조회 결과가 `required` 타입에 할당 가능해야 합니다.
    fn get_bean_of_type(&self, name: &str, required: &str) -> BeansResult<BeanObject> {
        let bean = self.get_bean(name)?;
        if bean.class().is_assignable_to(required) {
            Ok(bean)
        } else {
            Err(BeansError::NotOfRequiredType {
                name: name.to_string(),
                required: required.to_string(),
                actual: bean.class().name().to_string(),
            })
        }
    }

    fn contains_bean(&self, name: &str) -> bool;

    fn is_singleton(&self, name: &str) -> BeansResult<bool>;

    fn aliases(&self, name: &str) -> Vec<String>;
}

/// 정의 목록을 열거할 수 있는 팩토리
pub trait ListableBeanFactory: BeanFactory {
    fn definition_count(&self) -> usize;

    fn definition_names(&self) -> Vec<String>;

    /// 클래스가 `type_name`에 할당 가능한 정의 이름들
    ///
    /// 부모 체인이 손상된 정의는 경고를 남기고 건너뜁니다.
    fn definition_names_for_type(&self, type_name: &str) -> Vec<String>;

    /// `type_name`에 맞는 빈들을 이름과 함께 돌려줍니다.
    ///
    /// - `include_prototypes`가 꺼져 있으면 prototype 정의는 건너뜁니다.
    /// - `include_factory_beans`가 켜져 있으면 팩토리 빈의 product도 타입을 검사합니다.
    fn beans_of_type(
        &self,
        type_name: &str,
        include_prototypes: bool,
        include_factory_beans: bool,
    ) -> BeansResult<IndexMap<String, BeanObject>>;
}

/// 기본 빈 팩토리 구현
///
/// 항상 `Arc`로 생성되며, `BeanFactoryAware` 빈에는 자신에 대한 약한 참조를 넘깁니다.
///
/// # Examples
///
/// ```rust,ignore
/// let factory = DefaultBeanFactory::new();
/// factory.register_definition(
///     "rod",
///     RootBeanDefinition::singleton(person_class(), PropertyValues::new().with("age", 31)),
/// )?;
/// factory.register_alias("rod", "husband")?;
///
/// let rod = factory.get_bean("husband")?;
/// ```
pub struct DefaultBeanFactory {
    registry: DefinitionRegistry,
    parent: Option<Arc<dyn BeanFactory>>,
    singletons: RwLock<IndexMap<String, BeanObject>>,
    creation_lock: ReentrantMutex<()>,
    converters: Arc<ConverterRegistry>,
    self_ref: Weak<DefaultBeanFactory>,
}

impl DefaultBeanFactory {
    pub fn new() -> Arc<Self> {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Arc<Self> {
        Self::build(config, None)
    }

    /// 로컬 정의가 없는 이름을 `parent`에 위임하는 팩토리
    pub fn with_parent(parent: Arc<dyn BeanFactory>, config: FactoryConfig) -> Arc<Self> {
        Self::build(config, Some(parent))
    }

    fn build(config: FactoryConfig, parent: Option<Arc<dyn BeanFactory>>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            registry: DefinitionRegistry::new(config),
            parent,
            singletons: RwLock::new(IndexMap::new()),
            creation_lock: ReentrantMutex::new(()),
            converters: Arc::new(ConverterRegistry::new()),
            self_ref: self_ref.clone(),
        })
    }

    pub fn register_definition(
        &self,
        name: &str,
        definition: impl Into<BeanDefinition>,
    ) -> BeansResult<()> {
        self.registry.register(name, definition)
    }

    pub fn register_alias(&self, name: &str, alias: &str) -> BeansResult<()> {
        self.registry.register_alias(name, alias)
    }

    /// 외부에서 만든 인스턴스를 싱글톤으로 등록합니다.
    ///
    /// 이 인스턴스에는 프로퍼티 바인딩과 라이프사이클 훅이 적용되지 않습니다.
    pub fn register_singleton(&self, name: &str, bean: BeanObject) -> BeansResult<()> {
        let mut singletons = self.singletons.write();
        if singletons.contains_key(name) {
            return Err(BeansError::DefinitionStore {
                name: name.to_string(),
                message: "a singleton with this name is already registered".to_string(),
                source: None,
            });
        }
        debug!("Registering singleton instance '{}' ({:?})", name, bean);
        singletons.insert(name.to_string(), bean);
        Ok(())
    }

    pub fn bean_definition(&self, name: &str) -> Option<BeanDefinition> {
        self.registry.definition(&self.registry.canonical_name(name))
    }

    /// 모든 바인딩에서 내장 변환 규칙 다음으로 시도되는 변환기 레지스트리
    pub fn converters(&self) -> &Arc<ConverterRegistry> {
        &self.converters
    }

    pub fn class_registry(&self) -> &Arc<ClassRegistry> {
        self.registry.class_registry()
    }

    pub fn config(&self) -> &FactoryConfig {
        self.registry.config()
    }

    pub fn parent(&self) -> Option<&Arc<dyn BeanFactory>> {
        self.parent.as_ref()
    }

    pub fn singleton_count(&self) -> usize {
        self.singletons.read().len()
    }

    pub fn alias_count(&self) -> usize {
        self.registry.alias_count()
    }

    /// 아직 만들어지지 않은 싱글톤 정의를 모두 생성합니다.
    ///
    /// 일반 조회와 같은 경로를 타므로 팩토리 빈은 `get_object()`까지 호출되어
    /// product가 한 번 만들어집니다.
    /// 생성된(또는 이미 캐시되어 있던) 싱글톤 정의 개수를 돌려줍니다.
    pub fn realize_all_singletons(&self) -> BeansResult<usize> {
        let mut count = 0;
        for name in self.registry.names() {
            let Some(merged) = self.registry.merged(&name)? else {
                continue;
            };
            if merged.is_singleton() {
                self.do_get_bean(&name, &mut InFlight::new())?;
                count += 1;
            }
        }
        info!("Realized {} singleton bean(s)", count);
        Ok(count)
    }

    fn do_get_bean(&self, name: &str, in_flight: &mut InFlight) -> BeansResult<BeanObject> {
        let dereference = name.starts_with(FACTORY_BEAN_PREFIX);
        let bare = name.strip_prefix(FACTORY_BEAN_PREFIX).unwrap_or(name);
        let canonical = self.registry.canonical_name(bare);

        if let Some(partial) = in_flight.get(&canonical) {
            trace!(
                "Returning partially constructed bean '{}' to resolve a circular reference",
                canonical
            );
            return Ok(partial.clone());
        }

        match self.instance(&canonical, in_flight)? {
            Some(instance) => self.object_for_instance(&canonical, instance, dereference),
            None => match &self.parent {
                Some(parent) => {
                    debug!("No local definition for '{}', delegating to parent factory", name);
                    parent.get_bean(name)
                }
                None => Err(BeansError::NoSuchDefinition {
                    name: name.to_string(),
                }),
            },
        }
    }

    /// 정식 이름에 대한 원본 인스턴스 (팩토리 빈은 팩토리 자신). 로컬 정의가 없으면 `None`.
    fn instance(&self, canonical: &str, in_flight: &mut InFlight) -> BeansResult<Option<BeanObject>> {
        if let Some(bean) = self.cached_singleton(canonical) {
            trace!("Returning cached instance of singleton bean '{}'", canonical);
            return Ok(Some(bean));
        }
        let Some(merged) = self.registry.merged(canonical)? else {
            return Ok(None);
        };

        if !merged.is_singleton() {
            return self.create_bean(canonical, &merged, in_flight).map(Some);
        }

        let _guard = self.creation_lock.lock();
        if let Some(bean) = self.cached_singleton(canonical) {
            return Ok(Some(bean));
        }
        let bean = self.create_bean(canonical, &merged, in_flight)?;
        self.singletons
            .write()
            .insert(canonical.to_string(), bean.clone());
        debug!("Cached shared instance of singleton bean '{}'", canonical);
        Ok(Some(bean))
    }

    fn cached_singleton(&self, name: &str) -> Option<BeanObject> {
        self.singletons.read().get(name).cloned()
    }

    fn object_for_instance(
        &self,
        name: &str,
        instance: BeanObject,
        dereference: bool,
    ) -> BeansResult<BeanObject> {
        let is_factory = instance.is_factory_bean();
        if dereference {
            return if is_factory {
                Ok(instance)
            } else {
                Err(BeansError::NotAFactory {
                    name: name.to_string(),
                })
            };
        }
        if !is_factory {
            return Ok(instance);
        }

        let (product, pass_through) = {
            let guard = instance.read();
            let Some(factory) = guard.as_factory_bean() else {
                return Err(BeansError::NotAFactory {
                    name: name.to_string(),
                });
            };
            let product = factory
                .get_object()
                .map_err(|source| BeansError::FactoryProduct {
                    name: name.to_string(),
                    source,
                })?;
            (product, factory.property_values())
        };
        trace!("Bean '{}' is a factory bean, returning its product {:?}", name, product);

        if let Some(values) = pass_through {
            debug!(
                "Applying {} pass-through propert(ies) from factory bean '{}'",
                values.len(),
                name
            );
            self.wrapper_for(product.clone())
                .set_property_values(&values, false, None)?;
        }
        Ok(product)
    }

    fn create_bean(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        in_flight: &mut InFlight,
    ) -> BeansResult<BeanObject> {
        let class = merged.bean_class();
        let bean = class
            .instantiate()
            .ok_or_else(|| BeansError::Instantiation {
                name: name.to_string(),
                class: class.name().to_string(),
            })?;
        debug!("Creating instance of bean '{}' ({})", name, class.name());
        in_flight.insert(name.to_string(), bean.clone());
        let populated = self.populate_bean(name, merged, bean, in_flight);
        in_flight.remove(name);
        populated
    }

    /// 참조를 해석해 프로퍼티를 적용하고 라이프사이클 훅을 호출합니다.
    fn populate_bean(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        bean: BeanObject,
        in_flight: &mut InFlight,
    ) -> BeansResult<BeanObject> {
        let mut resolved = PropertyValues::new();
        for pv in merged.property_values() {
            let value = self.resolve_value(name, pv.value(), in_flight)?;
            resolved.add(pv.name(), value);
        }

        let mut wrapper = self.wrapper_for(bean);
        wrapper.set_property_values(&resolved, false, None)?;
        let bean = wrapper.into_inner();

        self.invoke_lifecycle_hooks(name, &bean)?;
        Ok(bean)
    }

    fn resolve_value(
        &self,
        bean_name: &str,
        value: &Value,
        in_flight: &mut InFlight,
    ) -> BeansResult<Value> {
        match value {
            Value::Ref(target) => {
                trace!("Resolving reference from bean '{}' to bean '{}'", bean_name, target);
                self.do_get_bean(target, in_flight)
                    .map(Value::Bean)
                    .map_err(|source| BeansError::DefinitionStore {
                        name: bean_name.to_string(),
                        message: format!(
                            "cannot resolve reference to bean '{}' while setting properties on bean '{}'",
                            target, bean_name
                        ),
                        source: Some(Box::new(source)),
                    })
            }
            Value::List(items) if value.contains_references() => {
                let items = items
                    .iter()
                    .map(|item| self.resolve_value(bean_name, item, in_flight))
                    .collect::<BeansResult<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            Value::Array(element, items) if value.contains_references() => {
                let items = items
                    .iter()
                    .map(|item| self.resolve_value(bean_name, item, in_flight))
                    .collect::<BeansResult<Vec<_>>>()?;
                Ok(Value::Array(element.clone(), items))
            }
            Value::Map(entries) if value.contains_references() => {
                let mut resolved = IndexMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    resolved.insert(key.clone(), self.resolve_value(bean_name, entry, in_flight)?);
                }
                Ok(Value::Map(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    fn invoke_lifecycle_hooks(&self, name: &str, bean: &BeanObject) -> BeansResult<()> {
        let mut guard = bean.write();
        if let Some(initializing) = guard.as_initializing() {
            debug!("Invoking after_properties_set() on bean '{}'", name);
            initializing
                .after_properties_set()
                .map_err(|source| BeansError::Initialization {
                    name: name.to_string(),
                    source,
                })?;
        }
        if let Some(aware) = guard.as_factory_aware() {
            let factory: Weak<dyn BeanFactory> = self.self_ref.clone();
            aware.set_bean_factory(factory);
        }
        Ok(())
    }

    fn wrapper_for(&self, bean: BeanObject) -> BeanWrapper {
        BeanWrapper::new(bean)
            .with_fallback_converters(Arc::clone(&self.converters))
            .with_class_registry(Arc::clone(self.registry.class_registry()))
    }

    /// 타입 필터에 맞으면 product 또는 인스턴스 자체를 돌려줍니다.
    fn matching_object(
        &self,
        name: &str,
        instance: BeanObject,
        type_name: &str,
        include_factory_beans: bool,
    ) -> BeansResult<Option<BeanObject>> {
        if instance.is_factory_bean() {
            if !include_factory_beans {
                return Ok(None);
            }
            let product = self.object_for_instance(name, instance, false)?;
            return Ok(product.class().is_assignable_to(type_name).then_some(product));
        }
        Ok(instance.class().is_assignable_to(type_name).then_some(instance))
    }
}

impl BeanFactory for DefaultBeanFactory {
    fn get_bean(&self, name: &str) -> BeansResult<BeanObject> {
        self.do_get_bean(name, &mut InFlight::new())
    }

    fn contains_bean(&self, name: &str) -> bool {
        let bare = name.strip_prefix(FACTORY_BEAN_PREFIX).unwrap_or(name);
        let canonical = self.registry.canonical_name(bare);
        if self.registry.contains(&canonical) || self.singletons.read().contains_key(&canonical) {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.contains_bean(name))
    }

    fn is_singleton(&self, name: &str) -> BeansResult<bool> {
        let dereference = name.starts_with(FACTORY_BEAN_PREFIX);
        let bare = name.strip_prefix(FACTORY_BEAN_PREFIX).unwrap_or(name);
        let canonical = self.registry.canonical_name(bare);

        let merged = match self.registry.merged(&canonical)? {
            Some(merged) => merged,
            None if self.singletons.read().contains_key(&canonical) => return Ok(true),
            None => {
                return match &self.parent {
                    Some(parent) => parent.is_singleton(name),
                    None => Err(BeansError::NoSuchDefinition {
                        name: name.to_string(),
                    }),
                };
            }
        };
        if !merged.is_singleton() || dereference {
            return Ok(merged.is_singleton());
        }

        match self.instance(&canonical, &mut InFlight::new())? {
            Some(instance) => {
                let guard = instance.read();
                Ok(guard
                    .as_factory_bean()
                    .is_none_or(|factory| factory.is_singleton()))
            }
            None => Ok(true),
        }
    }

    fn aliases(&self, name: &str) -> Vec<String> {
        self.registry.aliases_for(name)
    }
}

impl ListableBeanFactory for DefaultBeanFactory {
    fn definition_count(&self) -> usize {
        self.registry.len()
    }

    fn definition_names(&self) -> Vec<String> {
        self.registry.names()
    }

    fn definition_names_for_type(&self, type_name: &str) -> Vec<String> {
        self.registry
            .names()
            .into_iter()
            .filter(|name| match self.registry.merged(name) {
                Ok(Some(merged)) => merged.bean_class().is_assignable_to(type_name),
                Ok(None) => false,
                Err(e) => {
                    warn!("Skipping bean definition '{}' while matching type '{}': {}", name, type_name, e);
                    false
                }
            })
            .collect()
    }

    fn beans_of_type(
        &self,
        type_name: &str,
        include_prototypes: bool,
        include_factory_beans: bool,
    ) -> BeansResult<IndexMap<String, BeanObject>> {
        let mut result = IndexMap::new();

        for name in self.registry.names() {
            let Some(merged) = self.registry.merged(&name)? else {
                continue;
            };
            if !merged.is_singleton() && !include_prototypes {
                continue;
            }
            if !include_factory_beans && !merged.bean_class().is_assignable_to(type_name) {
                continue;
            }
            let Some(instance) = self.instance(&name, &mut InFlight::new())? else {
                continue;
            };
            if let Some(object) =
                self.matching_object(&name, instance, type_name, include_factory_beans)?
            {
                result.insert(name, object);
            }
        }

        let manual: Vec<(String, BeanObject)> = self
            .singletons
            .read()
            .iter()
            .filter(|(name, _)| !self.registry.contains(name))
            .map(|(name, bean)| (name.clone(), bean.clone()))
            .collect();
        for (name, instance) in manual {
            if let Some(object) =
                self.matching_object(&name, instance, type_name, include_factory_beans)?
            {
                result.insert(name, object);
            }
        }

        debug!("Found {} bean(s) of type '{}'", result.len(), type_name);
        Ok(result)
    }
}

impl std::fmt::Debug for DefaultBeanFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultBeanFactory")
            .field("definitions", &self.registry.names())
            .field("singletons", &self.singleton_count())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
