//! 프로퍼티 변경 이벤트
//!
//! JavaBeans의 `PropertyChangeSupport` / `VetoableChangeSupport` 대응입니다.
//! 바인더는 이벤트 전파가 켜졌을 때만 [`ChangeSupport`]를 할당합니다.

use std::sync::Arc;

use crate::domain::value::Value;

/// 하나의 프로퍼티 변경
#[derive(Debug, Clone)]
pub struct PropertyChangeEvent {
    bean_class: String,
    property: String,
    old_value: Option<Value>,
    new_value: Value,
}

impl PropertyChangeEvent {
    pub fn new(
        bean_class: impl Into<String>,
        property: impl Into<String>,
        old_value: Option<Value>,
        new_value: Value,
    ) -> Self {
        Self {
            bean_class: bean_class.into(),
            property: property.into(),
            old_value,
            new_value,
        }
    }

    pub fn bean_class(&self) -> &str {
        &self.bean_class
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// 읽기 접근자가 없는 프로퍼티는 `None`
    pub fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> &Value {
        &self.new_value
    }
}

/// 변경이 적용된 뒤 통지받는 리스너
pub trait PropertyChangeListener: Send + Sync {
    fn property_change(&self, event: &PropertyChangeEvent);
}

impl<F> PropertyChangeListener for F
where
    F: Fn(&PropertyChangeEvent) + Send + Sync,
{
    fn property_change(&self, event: &PropertyChangeEvent) {
        self(event)
    }
}

/// 변경 직전에 호출되어 `Err`로 변경을 거부할 수 있는 리스너
pub trait VetoableChangeListener: Send + Sync {
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), String>;
}

impl<F> VetoableChangeListener for F
where
    F: Fn(&PropertyChangeEvent) -> Result<(), String> + Send + Sync,
{
    fn vetoable_change(&self, event: &PropertyChangeEvent) -> Result<(), String> {
        self(event)
    }
}

/// 리스너 목록. `None` 키는 모든 프로퍼티를 구독합니다.
#[derive(Default)]
pub(crate) struct ChangeSupport {
    listeners: Vec<(Option<String>, Arc<dyn PropertyChangeListener>)>,
    vetoable: Vec<(Option<String>, Arc<dyn VetoableChangeListener>)>,
}

impl ChangeSupport {
    pub(crate) fn add_listener(
        &mut self,
        property: Option<&str>,
        listener: Arc<dyn PropertyChangeListener>,
    ) {
        self.listeners.push((property.map(str::to_string), listener));
    }

    pub(crate) fn add_vetoable(
        &mut self,
        property: Option<&str>,
        listener: Arc<dyn VetoableChangeListener>,
    ) {
        self.vetoable.push((property.map(str::to_string), listener));
    }

    /// 첫 번째 거부에서 멈추고 그 사유를 반환합니다.
    pub(crate) fn fire_vetoable(&self, event: &PropertyChangeEvent) -> Result<(), String> {
        self.vetoable
            .iter()
            .filter(|(property, _)| subscribed(property, event))
            .try_for_each(|(_, listener)| listener.vetoable_change(event))
    }

    pub(crate) fn fire(&self, event: &PropertyChangeEvent) {
        self.listeners
            .iter()
            .filter(|(property, _)| subscribed(property, event))
            .for_each(|(_, listener)| listener.property_change(event));
    }
}

fn subscribed(property: &Option<String>, event: &PropertyChangeEvent) -> bool {
    property.as_deref().is_none_or(|name| name == event.property())
}
