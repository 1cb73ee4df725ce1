//! 테스트 전용 픽스처 빈
//!
//! - [`TestBean`] - 거의 모든 프로퍼티 타입을 갖춘 범용 빈 (`spouse`로 중첩 경로 구성)
//! - [`LifecycleBean`] - 초기화 훅과 팩토리 주입 기능을 가진 빈
//! - [`DummyFactory`] - product 생산 횟수를 세는 팩토리 빈

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};

use crate::core::factory::BeanFactory;
use crate::domain::bean::{Bean, BeanFactoryAware, BeanObject, FactoryBean, HookError, InitializingBean};
use crate::domain::class::BeanClass;
use crate::domain::property_values::PropertyValues;
use crate::domain::value::{Locale, Properties, Value};

#[derive(Default)]
pub struct TestBean {
    pub name: Option<String>,
    pub age: i32,
    pub active: bool,
    pub spouse: Option<BeanObject>,
    pub touchy: Option<String>,
    pub nicknames: Vec<String>,
    pub lucky_numbers: Vec<i32>,
    pub locale: Option<Locale>,
    pub props: Properties,
    pub friends: Vec<Value>,
    pub attributes: IndexMap<String, Value>,
    pub target_class: Option<Arc<BeanClass>>,
    pub birthday: Option<NaiveDateTime>,
}

impl TestBean {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl Bean for TestBean {}

static TEST_BEAN_CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
    BeanClass::builder::<TestBean>("TestBean")
        .implements("ITestBean")
        .property("name", |b: &TestBean| b.name.clone(), |b, v| b.name = v)
        .property("age", |b: &TestBean| b.age, |b, v| b.age = v)
        .property("active", |b: &TestBean| b.active, |b, v| b.active = v)
        .property("spouse", |b: &TestBean| b.spouse.clone(), |b, v| b.spouse = v)
        .fallible_property(
            "touchy",
            |b: &TestBean| b.touchy.clone(),
            |b, v: Option<String>| {
                if v.as_deref().is_some_and(|s| s.contains('.')) {
                    return Err("touchy value must not contain '.'".to_string());
                }
                b.touchy = v;
                Ok(())
            },
        )
        .property("nicknames", |b: &TestBean| b.nicknames.clone(), |b, v| b.nicknames = v)
        .property(
            "lucky_numbers",
            |b: &TestBean| b.lucky_numbers.clone(),
            |b, v| b.lucky_numbers = v,
        )
        .property("locale", |b: &TestBean| b.locale.clone(), |b, v| b.locale = v)
        .property("props", |b: &TestBean| b.props.clone(), |b, v| b.props = v)
        .property("friends", |b: &TestBean| b.friends.clone(), |b, v| b.friends = v)
        .property(
            "attributes",
            |b: &TestBean| b.attributes.clone(),
            |b, v| b.attributes = v,
        )
        .property(
            "target_class",
            |b: &TestBean| b.target_class.clone(),
            |b, v| b.target_class = v,
        )
        .property("birthday", |b: &TestBean| b.birthday, |b, v| b.birthday = v)
        .read_only("age_description", |b: &TestBean| format!("{} years", b.age))
        .build()
});

pub fn test_bean_class() -> Arc<BeanClass> {
    Arc::clone(&TEST_BEAN_CLASS)
}

/// `after_properties_set`과 `set_bean_factory` 호출을 기록하는 빈
#[derive(Default)]
pub struct LifecycleBean {
    pub name: Option<String>,
    pub fail_init: bool,
    pub initialized: bool,
    pub factory: Option<Weak<dyn BeanFactory>>,
    /// 초기화 시점에 팩토리가 이미 주입되어 있었는지
    pub factory_seen_at_init: bool,
}

impl Bean for LifecycleBean {
    fn as_initializing(&mut self) -> Option<&mut dyn InitializingBean> {
        Some(self)
    }

    fn as_factory_aware(&mut self) -> Option<&mut dyn BeanFactoryAware> {
        Some(self)
    }
}

impl InitializingBean for LifecycleBean {
    fn after_properties_set(&mut self) -> Result<(), HookError> {
        if self.fail_init {
            return Err("lifecycle bean refused to initialize".into());
        }
        self.factory_seen_at_init = self.factory.is_some();
        self.initialized = true;
        Ok(())
    }
}

impl BeanFactoryAware for LifecycleBean {
    fn set_bean_factory(&mut self, factory: Weak<dyn BeanFactory>) {
        self.factory = Some(factory);
    }
}

static LIFECYCLE_BEAN_CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
    BeanClass::builder::<LifecycleBean>("LifecycleBean")
        .property("name", |b: &LifecycleBean| b.name.clone(), |b, v| b.name = v)
        .property("fail_init", |b: &LifecycleBean| b.fail_init, |b, v| b.fail_init = v)
        .read_only("initialized", |b: &LifecycleBean| b.initialized)
        .build()
});

pub fn lifecycle_bean_class() -> Arc<BeanClass> {
    Arc::clone(&LIFECYCLE_BEAN_CLASS)
}

/// `TestBean` product를 만드는 팩토리 빈
///
/// `singleton`이면 첫 product를 캐시해서 계속 돌려주고, 아니면 매번 새로 만듭니다.
pub struct DummyFactory {
    pub singleton: bool,
    pub product_name: Option<String>,
    /// product마다 적용될 pass-through 나이
    pub product_age: Option<i32>,
    pub produced: AtomicUsize,
    cached: OnceCell<BeanObject>,
}

impl Default for DummyFactory {
    fn default() -> Self {
        Self {
            singleton: true,
            product_name: None,
            product_age: None,
            produced: AtomicUsize::new(0),
            cached: OnceCell::new(),
        }
    }
}

impl DummyFactory {
    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }

    fn make(&self) -> BeanObject {
        self.produced.fetch_add(1, Ordering::SeqCst);
        let name = self.product_name.as_deref().unwrap_or("product");
        BeanObject::new(test_bean_class(), TestBean::named(name))
    }
}

impl Bean for DummyFactory {
    fn as_factory_bean(&self) -> Option<&dyn FactoryBean> {
        Some(self)
    }
}

impl FactoryBean for DummyFactory {
    fn get_object(&self) -> Result<BeanObject, HookError> {
        if self.singleton {
            Ok(self.cached.get_or_init(|| self.make()).clone())
        } else {
            Ok(self.make())
        }
    }

    fn is_singleton(&self) -> bool {
        self.singleton
    }

    fn property_values(&self) -> Option<PropertyValues> {
        self.product_age
            .map(|age| PropertyValues::new().with("age", age))
    }
}

static DUMMY_FACTORY_CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
    BeanClass::builder::<DummyFactory>("DummyFactory")
        .implements("FactoryBean")
        .property("singleton", |f: &DummyFactory| f.singleton, |f, v| f.singleton = v)
        .property(
            "product_name",
            |f: &DummyFactory| f.product_name.clone(),
            |f, v| f.product_name = v,
        )
        .property(
            "product_age",
            |f: &DummyFactory| f.product_age,
            |f, v| f.product_age = v,
        )
        .build()
});

pub fn dummy_factory_class() -> Arc<BeanClass> {
    Arc::clone(&DUMMY_FACTORY_CLASS)
}
