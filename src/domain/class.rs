//! # Bean Class Descriptor
//!
//! 리플렉션을 대신하는 명시적인 기능 테이블입니다.
//! 클래스 이름, 구현한 상위 타입 이름(할당 가능성 판정용), 인스턴스 생성 함수,
//! 그리고 프로퍼티별 읽기/쓰기 접근자를 담습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! static PERSON: Lazy<Arc<BeanClass>> = Lazy::new(|| {
//!     BeanClass::builder::<Person>("Person")
//!         .implements("Named")
//!         .property("name", |p: &Person| p.name.clone(), |p, v| p.name = v)
//!         .property("age", |p: &Person| p.age, |p, v| p.age = v)
//!         .build()
//! });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::domain::bean::{Bean, BeanObject};
use crate::domain::value::{PropertyType, Value, ValueType};

type Instantiator = Arc<dyn Fn() -> Box<dyn Bean> + Send + Sync>;
type Reader = Arc<dyn Fn(&dyn Bean) -> Option<Value> + Send + Sync>;
type Writer = Arc<dyn Fn(&mut dyn Bean, Value) -> Result<(), WriteFailure> + Send + Sync>;

/// 타입 소거된 setter가 실패한 이유
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WriteFailure {
    /// 값이 선언된 Rust 타입으로 변환되지 않음
    Mismatch,
    /// 인스턴스가 클래스가 선언한 Rust 타입이 아님
    WrongInstance,
    /// setter 자체가 실패를 반환함
    Setter(String),
}

/// 하나의 프로퍼티에 대한 접근자 쌍
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    value_type: ValueType,
    primitive: bool,
    reader: Option<Reader>,
    writer: Option<Writer>,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// null/빈 문자열을 거부하는 primitive 프로퍼티인지 여부
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    pub fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    pub(crate) fn read(&self, bean: &dyn Bean) -> Option<Value> {
        self.reader.as_ref().and_then(|reader| reader(bean))
    }

    pub(crate) fn write(&self, bean: &mut dyn Bean, value: Value) -> Result<(), WriteFailure> {
        match &self.writer {
            Some(writer) => writer(bean, value),
            None => Err(WriteFailure::Setter(format!(
                "property '{}' has no setter",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("primitive", &self.primitive)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// 빈 클래스 기술자
pub struct BeanClass {
    name: String,
    supertypes: Vec<String>,
    instantiator: Option<Instantiator>,
    properties: IndexMap<String, PropertyDescriptor>,
}

impl BeanClass {
    /// `T::default()`로 인스턴스를 만드는 클래스 빌더를 시작합니다.
    pub fn builder<T: Bean + Default>(name: impl Into<String>) -> BeanClassBuilder<T> {
        Self::abstract_builder::<T>(name).constructor(T::default)
    }

    /// 생성 함수가 없는(추상) 클래스 빌더를 시작합니다.
    ///
    /// 추상 클래스는 프로퍼티 바인딩이나 팩토리 product 기술에만 쓰이며,
    /// 루트 정의로 등록하면 등록 시점에 거부됩니다.
    pub fn abstract_builder<T: Bean>(name: impl Into<String>) -> BeanClassBuilder<T> {
        BeanClassBuilder {
            class: BeanClass {
                name: name.into(),
                supertypes: Vec::new(),
                instantiator: None,
                properties: IndexMap::new(),
            },
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    /// 클래스 이름이 같거나 `type_name`을 상위 타입으로 선언했는지 확인합니다.
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name || self.supertypes.iter().any(|s| s == type_name)
    }

    pub fn is_abstract(&self) -> bool {
        self.instantiator.is_none()
    }

    /// 프로퍼티가 하나도 설정되지 않은 새 인스턴스를 만듭니다.
    pub fn instantiate(self: &Arc<Self>) -> Option<BeanObject> {
        let instantiator = self.instantiator.as_ref()?;
        Some(BeanObject::from_boxed(Arc::clone(self), instantiator()))
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }
}

impl PartialEq for BeanClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("name", &self.name)
            .field("supertypes", &self.supertypes)
            .field("abstract", &self.is_abstract())
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 구체 Rust 타입 `T` 위에서 타입이 있는 접근자로 [`BeanClass`]를 구성합니다.
pub struct BeanClassBuilder<T> {
    class: BeanClass,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bean> BeanClassBuilder<T> {
    pub fn constructor(mut self, ctor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.class.instantiator = Some(Arc::new(move || Box::new(ctor()) as Box<dyn Bean>));
        self
    }

    pub fn implements(mut self, supertype: impl Into<String>) -> Self {
        self.class.supertypes.push(supertype.into());
        self
    }

    /// 읽기/쓰기가 모두 가능한 프로퍼티
    pub fn property<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: PropertyType,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.fallible_property(name, get, move |target: &mut T, value: V| {
            set(target, value);
            Ok(())
        })
    }

    /// setter가 실패할 수 있는 프로퍼티 (실패는 SetterInvocation 에러가 됩니다)
    pub fn fallible_property<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: PropertyType,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.insert::<V>(name, Some(Self::reader(get)), Some(Self::writer(set)))
    }

    pub fn read_only<V, G>(self, name: &str, get: G) -> Self
    where
        V: PropertyType,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.insert::<V>(name, Some(Self::reader(get)), None)
    }

    pub fn write_only<V, S>(self, name: &str, set: S) -> Self
    where
        V: PropertyType,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let writer = Self::writer(move |target: &mut T, value: V| {
            set(target, value);
            Ok(())
        });
        self.insert::<V>(name, None, Some(writer))
    }

    pub fn build(self) -> Arc<BeanClass> {
        Arc::new(self.class)
    }

    fn insert<V: PropertyType>(
        mut self,
        name: &str,
        reader: Option<Reader>,
        writer: Option<Writer>,
    ) -> Self {
        let descriptor = PropertyDescriptor {
            name: name.to_string(),
            value_type: V::value_type(),
            primitive: V::is_primitive(),
            reader,
            writer,
        };
        self.class.properties.insert(name.to_string(), descriptor);
        self
    }

    fn reader<V, G>(get: G) -> Reader
    where
        V: PropertyType,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        Arc::new(move |bean: &dyn Bean| bean.downcast_ref::<T>().map(|target| get(target).into_value()))
    }

    fn writer<V, S>(set: S) -> Writer
    where
        V: PropertyType,
        S: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    {
        Arc::new(move |bean: &mut dyn Bean, value: Value| {
            let target = bean.downcast_mut::<T>().ok_or(WriteFailure::WrongInstance)?;
            let typed = V::from_value(value).ok_or(WriteFailure::Mismatch)?;
            set(target, typed).map_err(WriteFailure::Setter)
        })
    }
}

/// 클래스 이름 → 기술자 테이블
///
/// 클래스 이름 문자열을 `Value::Class`로 바꾸는 기본 변환기가 사용합니다.
/// 팩토리는 루트 정의가 등록될 때마다 그 클래스를 여기에 추가합니다.
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, Arc<BeanClass>>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, class: Arc<BeanClass>) {
        self.classes.write().insert(class.name().to_string(), class);
    }

    pub fn get(&self, name: &str) -> Option<Arc<BeanClass>> {
        self.classes.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}
