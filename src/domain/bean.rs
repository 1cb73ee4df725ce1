//! # Bean Capabilities
//!
//! 컨테이너가 관리하는 모든 객체는 [`Bean`] trait을 구현합니다.
//! Spring은 `instanceof InitializingBean` 같은 런타임 타입 검사로 부가 기능을 찾지만,
//! 여기서는 각 기능을 `as_*` 접근자로 노출하고 기본값은 "없음"(`None`)입니다.
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `InitializingBean.afterPropertiesSet()` | [`InitializingBean`] |
//! | `BeanFactoryAware.setBeanFactory()` | [`BeanFactoryAware`] |
//! | `FactoryBean.getObject()` | [`FactoryBean`] |
//!
//! ## 예제
//!
//! ```rust,ignore
//! #[derive(Default)]
//! struct Pool { size: i32, ready: bool }
//!
//! impl Bean for Pool {
//!     fn as_initializing(&mut self) -> Option<&mut dyn InitializingBean> {
//!         Some(self)
//!     }
//! }
//!
//! impl InitializingBean for Pool {
//!     fn after_properties_set(&mut self) -> Result<(), HookError> {
//!         self.ready = true;
//!         Ok(())
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::factory::BeanFactory;
use crate::domain::class::BeanClass;
use crate::domain::property_values::PropertyValues;

/// 라이프사이클 훅과 팩토리 빈이 반환하는 에러
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// `dyn Bean`에서 구체 타입으로 다운캐스트하기 위한 보조 trait
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 컨테이너가 관리하는 객체
pub trait Bean: AsAny + Send + Sync + 'static {
    /// 모든 프로퍼티가 설정된 뒤 호출될 초기화 훅
    fn as_initializing(&mut self) -> Option<&mut dyn InitializingBean> {
        None
    }

    /// 자신을 생성한 팩토리를 주입받는 기능
    fn as_factory_aware(&mut self) -> Option<&mut dyn BeanFactoryAware> {
        None
    }

    /// 다른 객체(product)를 생산하는 팩토리 빈 기능
    fn as_factory_bean(&self) -> Option<&dyn FactoryBean> {
        None
    }
}

impl dyn Bean {
    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Bean>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Bean>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// 프로퍼티 설정 완료 후 실행되는 초기화 훅
///
/// 실패하면 빈 생성 전체가 중단되고, 에러는 빈 이름과 함께
/// `BeansError::Initialization`으로 감싸져 전파됩니다.
pub trait InitializingBean {
    fn after_properties_set(&mut self) -> Result<(), HookError>;
}

/// 자신을 소유한 팩토리를 주입받는 빈
///
/// 팩토리 → 싱글톤 캐시 → 빈 → 팩토리 순환이 생기지 않도록 약한 참조를 전달합니다.
pub trait BeanFactoryAware {
    fn set_bean_factory(&mut self, factory: Weak<dyn BeanFactory>);
}

/// 다른 객체를 생산하는 빈
///
/// 일반 조회(`get_bean("name")`)는 `get_object()`의 결과를, 역참조 조회(`get_bean("&name")`)는
/// 팩토리 자신을 돌려줍니다. `get_object()`는 조회할 때마다 호출되므로 product의 싱글톤 보장은
/// 팩토리 구현의 책임입니다.
pub trait FactoryBean: Send + Sync {
    fn get_object(&self) -> Result<BeanObject, HookError>;

    /// product가 개념적으로 싱글톤인지 여부
    fn is_singleton(&self) -> bool;

    /// 생산된 모든 product에 추가로 적용할 프로퍼티
    fn property_values(&self) -> Option<PropertyValues> {
        None
    }
}

/// 살아있는 빈 인스턴스에 대한 공유 핸들
///
/// 복제해도 같은 인스턴스를 가리키며, 동일성(identity)은 포인터로 비교합니다.
/// 순환 참조를 끊기 위해 프로퍼티가 채워지기 전의 인스턴스도 이 핸들로 공유됩니다.
#[derive(Clone)]
pub struct BeanObject {
    class: Arc<BeanClass>,
    cell: Arc<RwLock<Box<dyn Bean>>>,
}

impl BeanObject {
    pub fn new<T: Bean>(class: Arc<BeanClass>, bean: T) -> Self {
        Self::from_boxed(class, Box::new(bean))
    }

    pub(crate) fn from_boxed(class: Arc<BeanClass>, bean: Box<dyn Bean>) -> Self {
        Self {
            class,
            cell: Arc::new(RwLock::new(bean)),
        }
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    pub fn read(&self) -> MappedRwLockReadGuard<'_, dyn Bean> {
        RwLockReadGuard::map(self.cell.read(), |bean| &**bean)
    }

    pub fn write(&self) -> MappedRwLockWriteGuard<'_, dyn Bean> {
        RwLockWriteGuard::map(self.cell.write(), |bean| &mut **bean)
    }

    /// 인스턴스가 `T`이면 읽기 잠금 아래에서 `f`를 실행합니다.
    pub fn with<T: Bean, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.read();
        guard.downcast_ref::<T>().map(f)
    }

    /// 인스턴스가 `T`이면 쓰기 잠금 아래에서 `f`를 실행합니다.
    pub fn with_mut<T: Bean, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.write();
        guard.downcast_mut::<T>().map(f)
    }

    pub fn is<T: Bean>(&self) -> bool {
        self.read().is::<T>()
    }

    pub fn is_factory_bean(&self) -> bool {
        self.read().as_factory_bean().is_some()
    }

    pub fn ptr_eq(&self, other: &BeanObject) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// 인스턴스 주소 (중첩 바인더 캐시의 키)
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.cell) as *const () as usize
    }
}

impl PartialEq for BeanObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for BeanObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.class.name(), self.identity())
    }
}
