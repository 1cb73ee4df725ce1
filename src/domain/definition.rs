//! # Bean Definition Model
//!
//! 빈을 만드는 레시피입니다. Spring의 `RootBeanDefinition` / `ChildBeanDefinition` 상속 계층을
//! 합 타입(`BeanDefinition`)으로 표현하고, 유효 클래스는 부모 링크를 따라 명시적으로 찾아갑니다.
//!
//! ## 정의 상속
//!
//! ```text
//! child-2 ──parent──▶ child-1 ──parent──▶ root (class = TestBean)
//! ```
//!
//! - 루트 정의는 클래스를 소유합니다.
//! - 자식 정의는 부모 정의의 이름만 소유합니다.
//! - 체인은 반드시 유한한 단계 안에 루트에서 끝나야 하며, 부모를 찾을 수 없거나
//!   이미 방문한 이름이 다시 나오면 저장소 손상(store corruption) 에러입니다.
//! - 유효 프로퍼티는 루트 → 자식 순으로 겹쳐 쓰며 자식이 우선합니다.

use std::sync::Arc;

use crate::core::errors::{BeansError, BeansResult};
use crate::domain::class::BeanClass;
use crate::domain::property_values::PropertyValues;

/// 클래스를 직접 소유하는 정의
#[derive(Debug, Clone)]
pub struct RootBeanDefinition {
    class: Arc<BeanClass>,
    singleton: bool,
    property_values: PropertyValues,
}

impl RootBeanDefinition {
    pub fn new(class: Arc<BeanClass>, property_values: PropertyValues, singleton: bool) -> Self {
        Self {
            class,
            singleton,
            property_values,
        }
    }

    pub fn singleton(class: Arc<BeanClass>, property_values: PropertyValues) -> Self {
        Self::new(class, property_values, true)
    }

    pub fn prototype(class: Arc<BeanClass>, property_values: PropertyValues) -> Self {
        Self::new(class, property_values, false)
    }

    pub fn bean_class(&self) -> &Arc<BeanClass> {
        &self.class
    }
}

/// 부모 정의의 이름을 소유하는 정의
#[derive(Debug, Clone)]
pub struct ChildBeanDefinition {
    parent_name: String,
    singleton: bool,
    property_values: PropertyValues,
}

impl ChildBeanDefinition {
    pub fn new(
        parent_name: impl Into<String>,
        property_values: PropertyValues,
        singleton: bool,
    ) -> Self {
        Self {
            parent_name: parent_name.into(),
            singleton,
            property_values,
        }
    }

    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }
}

#[derive(Debug, Clone)]
pub enum BeanDefinition {
    Root(RootBeanDefinition),
    Child(ChildBeanDefinition),
}

impl BeanDefinition {
    pub fn is_singleton(&self) -> bool {
        match self {
            BeanDefinition::Root(root) => root.singleton,
            BeanDefinition::Child(child) => child.singleton,
        }
    }

    pub fn property_values(&self) -> &PropertyValues {
        match self {
            BeanDefinition::Root(root) => &root.property_values,
            BeanDefinition::Child(child) => &child.property_values,
        }
    }

    /// 바인딩은 등록 이후에도 수정할 수 있지만 싱글톤 여부는 바꿀 수 없습니다.
    pub fn property_values_mut(&mut self) -> &mut PropertyValues {
        match self {
            BeanDefinition::Root(root) => &mut root.property_values,
            BeanDefinition::Child(child) => &mut child.property_values,
        }
    }

    pub fn parent_name(&self) -> Option<&str> {
        match self {
            BeanDefinition::Root(_) => None,
            BeanDefinition::Child(child) => Some(child.parent_name()),
        }
    }

    pub fn root_class(&self) -> Option<&Arc<BeanClass>> {
        match self {
            BeanDefinition::Root(root) => Some(root.bean_class()),
            BeanDefinition::Child(_) => None,
        }
    }

    /// 등록 시점 검증: 루트 정의의 클래스는 인스턴스화할 수 있어야 합니다.
    pub fn validate(&self, name: &str) -> BeansResult<()> {
        if let BeanDefinition::Root(root) = self {
            if root.class.is_abstract() {
                return Err(BeansError::DefinitionStore {
                    name: name.to_string(),
                    message: format!("class '{}' is abstract", root.class.name()),
                    source: None,
                });
            }
        }
        Ok(())
    }

    /// 부모 링크를 따라 루트까지 올라가 유효 정의를 계산합니다.
    ///
    /// `lookup`은 같은 레지스트리 안에서 이름으로 정의를 찾습니다.
    /// 자식 단계가 `max_depth`를 넘거나 같은 이름을 두 번 만나면 저장소 손상입니다.
    pub fn merge<'a, F>(
        &'a self,
        name: &str,
        lookup: F,
        max_depth: usize,
    ) -> BeansResult<MergedBeanDefinition>
    where
        F: Fn(&str) -> Option<&'a BeanDefinition>,
    {
        let mut chain: Vec<(&str, &'a BeanDefinition)> = vec![(name, self)];
        let class = loop {
            let (current_name, current) = chain[chain.len() - 1];
            let parent_name = match current {
                BeanDefinition::Root(root) => break Arc::clone(&root.class),
                BeanDefinition::Child(child) => child.parent_name(),
            };

            if chain.len() > max_depth {
                return Err(corrupt(
                    name,
                    format!("parent chain exceeds {} levels", max_depth),
                ));
            }
            if chain.iter().any(|(visited, _)| *visited == parent_name) {
                return Err(corrupt(
                    name,
                    format!("cyclic parent chain through '{}'", parent_name),
                ));
            }
            let parent = lookup(parent_name).ok_or_else(|| {
                corrupt(
                    name,
                    format!(
                        "parent definition '{}' of '{}' not found",
                        parent_name, current_name
                    ),
                )
            })?;
            chain.push((parent_name, parent));
        };

        let mut property_values = PropertyValues::new();
        for (_, level) in chain.iter().rev() {
            property_values.add_all(level.property_values());
        }

        Ok(MergedBeanDefinition {
            class,
            singleton: self.is_singleton(),
            property_values,
            depth: chain.len() - 1,
        })
    }
}

impl From<RootBeanDefinition> for BeanDefinition {
    fn from(root: RootBeanDefinition) -> Self {
        BeanDefinition::Root(root)
    }
}

impl From<ChildBeanDefinition> for BeanDefinition {
    fn from(child: ChildBeanDefinition) -> Self {
        BeanDefinition::Child(child)
    }
}

impl PartialEq for BeanDefinition {
    fn eq(&self, other: &Self) -> bool {
        let same_target = match (self, other) {
            (BeanDefinition::Root(a), BeanDefinition::Root(b)) => a.class == b.class,
            (BeanDefinition::Child(a), BeanDefinition::Child(b)) => a.parent_name == b.parent_name,
            _ => false,
        };
        same_target
            && self.is_singleton() == other.is_singleton()
            && self.property_values().same_bindings(other.property_values())
    }
}

fn corrupt(name: &str, message: String) -> BeansError {
    BeansError::DefinitionStore {
        name: name.to_string(),
        message,
        source: None,
    }
}

/// 상속 체인을 해석한 결과
#[derive(Debug, Clone)]
pub struct MergedBeanDefinition {
    class: Arc<BeanClass>,
    singleton: bool,
    property_values: PropertyValues,
    depth: usize,
}

impl MergedBeanDefinition {
    pub fn bean_class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    /// 루트까지의 부모 단계 수 (루트 정의는 0)
    pub fn depth(&self) -> usize {
        self.depth
    }
}
