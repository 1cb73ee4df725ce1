//! # Bean Wrapper
//!
//! 살아있는 빈 인스턴스 하나에 묶인 프로퍼티 바인더입니다. Spring의 `BeanWrapperImpl` 대응.
//!
//! ## 주요 기능
//!
//! - **단일 설정**: `spouse.spouse.name` 같은 중첩 경로를 첫 번째 `.`에서 나눠 재귀적으로 내려갑니다.
//!   중간 객체마다 중첩 바인더를 만들고 객체 동일성으로 캐시합니다.
//! - **타입 변환**: 경로 전용 → 타입 전용 → 기본 → 대체 변환기 순서
//! - **일괄 설정**: 복구 가능한 실패를 모아서 하나의 [`PropertyBatchError`]로 보고합니다.
//!   성공한 바인딩은 되돌리지 않습니다.
//! - **변경 이벤트**: 기본적으로 꺼져 있으며, 켜는 순간 리스너 테이블이 할당됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let mut wrapper = BeanWrapper::new(bean);
//! wrapper.set_property_value("age", "34")?;
//! wrapper.set_property_value("spouse.name", "Kerry")?;
//!
//! let pvs = PropertyValues::new().with("name", "Tony").with("age", "x");
//! match wrapper.set_property_values(&pvs, false, None) {
//!     Err(BeansError::PropertyBatch(batch)) => assert_eq!(batch.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::binder::converters::{ConverterRegistry, CustomConverters, PropertyConverter, convert_builtin};
use crate::binder::events::{ChangeSupport, PropertyChangeEvent, PropertyChangeListener, VetoableChangeListener};
use crate::core::errors::{BeansError, BeansResult, PropertyBatchError, PropertyError};
use crate::domain::bean::BeanObject;
use crate::domain::class::{BeanClass, ClassRegistry, PropertyDescriptor, WriteFailure};
use crate::domain::property_values::PropertyValues;
use crate::domain::value::{Value, ValueType};
use crate::utils::string_utils::{comma_delimited_to_vec, is_blank, split_nested_path};

/// 일괄 설정 전에 바인딩 집합 전체를 검사하는 훅
///
/// 보고된 실패는 바인딩 도중 발생한 복구 가능한 에러들과 함께 하나로 모입니다.
pub trait PropertyValuesValidator {
    fn validate(&self, property_values: &PropertyValues) -> Result<(), Vec<PropertyError>>;
}

impl<F> PropertyValuesValidator for F
where
    F: Fn(&PropertyValues) -> Result<(), Vec<PropertyError>>,
{
    fn validate(&self, property_values: &PropertyValues) -> Result<(), Vec<PropertyError>> {
        self(property_values)
    }
}

/// 필수 프로퍼티가 바인딩 집합에 모두 있는지 확인하는 검증기
#[derive(Debug, Clone, Default)]
pub struct RequiredPropertiesValidator {
    required: Vec<String>,
}

impl RequiredPropertiesValidator {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

impl PropertyValuesValidator for RequiredPropertiesValidator {
    fn validate(&self, property_values: &PropertyValues) -> Result<(), Vec<PropertyError>> {
        let missing: Vec<PropertyError> = self
            .required
            .iter()
            .filter(|name| !property_values.contains(name))
            .map(|name| PropertyError::Invalid {
                property: name.clone(),
                message: "required property is missing".to_string(),
            })
            .collect();

        if missing.is_empty() { Ok(()) } else { Err(missing) }
    }
}

enum ConversionError {
    Mismatch(String),
    Element {
        index: usize,
        element: ValueType,
        message: String,
    },
}

impl ConversionError {
    fn into_message(self) -> String {
        match self {
            ConversionError::Mismatch(message) => message,
            ConversionError::Element { index, message, .. } => {
                format!("element {}: {}", index, message)
            }
        }
    }
}

pub struct BeanWrapper {
    object: BeanObject,
    converters: CustomConverters,
    fallback: Option<Arc<ConverterRegistry>>,
    classes: Option<Arc<ClassRegistry>>,
    nested: HashMap<usize, BeanWrapper>,
    event_propagation: bool,
    events: Option<ChangeSupport>,
}

impl BeanWrapper {
    pub fn new(object: BeanObject) -> Self {
        Self {
            object,
            converters: CustomConverters::default(),
            fallback: None,
            classes: None,
            nested: HashMap::new(),
            event_propagation: false,
            events: None,
        }
    }

    /// 클래스의 새 인스턴스를 만들어 감쌉니다.
    pub fn instantiate(class: &Arc<BeanClass>) -> BeansResult<Self> {
        class
            .instantiate()
            .map(Self::new)
            .ok_or_else(|| BeansError::Instantiation {
                name: class.name().to_string(),
                class: class.name().to_string(),
            })
    }

    pub fn with_fallback_converters(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.fallback = Some(registry);
        self
    }

    /// 클래스 이름 → `Value::Class` 변환에 사용할 레지스트리
    pub fn with_class_registry(mut self, classes: Arc<ClassRegistry>) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn wrapped_object(&self) -> &BeanObject {
        &self.object
    }

    pub fn wrapped_class(&self) -> &Arc<BeanClass> {
        self.object.class()
    }

    pub fn into_inner(self) -> BeanObject {
        self.object
    }

    /// `path`가 `None`이면 `target` 타입의 모든 프로퍼티에 적용됩니다.
    ///
    /// 중첩 경로(`spouse.name`)로 등록한 변환기는 해당 중첩 바인더가 처음 만들어질 때 복사됩니다.
    pub fn register_custom_converter(
        &mut self,
        target: ValueType,
        path: Option<&str>,
        converter: impl PropertyConverter + 'static,
    ) {
        self.converters.register(target, path, Arc::new(converter));
    }

    pub fn is_event_propagation_enabled(&self) -> bool {
        self.event_propagation
    }

    pub fn set_event_propagation_enabled(&mut self, enabled: bool) {
        self.event_propagation = enabled;
        if enabled && self.events.is_none() {
            self.events = Some(ChangeSupport::default());
        }
    }

    /// `property`가 `None`이면 모든 프로퍼티의 변경을 구독합니다.
    /// 이벤트 전파가 꺼져 있으면 등록은 무시됩니다.
    pub fn add_property_change_listener(
        &mut self,
        property: Option<&str>,
        listener: impl PropertyChangeListener + 'static,
    ) {
        match self.active_events_mut() {
            Some(events) => events.add_listener(property, Arc::new(listener)),
            None => debug!("Event propagation disabled; ignoring property change listener"),
        }
    }

    pub fn add_vetoable_change_listener(
        &mut self,
        property: Option<&str>,
        listener: impl VetoableChangeListener + 'static,
    ) {
        match self.active_events_mut() {
            Some(events) => events.add_vetoable(property, Arc::new(listener)),
            None => debug!("Event propagation disabled; ignoring vetoable change listener"),
        }
    }

    pub fn property_descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.object.class().property(name)
    }

    pub fn property_descriptors(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.object.class().properties()
    }

    pub fn is_readable_property(&self, name: &str) -> bool {
        self.property_descriptor(name)
            .is_some_and(PropertyDescriptor::is_readable)
    }

    pub fn is_writable_property(&self, name: &str) -> bool {
        self.property_descriptor(name)
            .is_some_and(PropertyDescriptor::is_writable)
    }

    /// 중첩 경로를 따라 프로퍼티 값을 읽습니다.
    pub fn property_value(&mut self, path: &str) -> Result<Value, PropertyError> {
        match split_nested_path(path) {
            Some((head, rest)) => {
                let nested = self.nested_wrapper(head)?;
                nested
                    .property_value(rest)
                    .map_err(|e| e.with_prefix(head))
            }
            None => self.local_property_value(path),
        }
    }

    /// 단일 프로퍼티 설정. 모든 에러는 즉시 반환됩니다.
    pub fn set_property_value(
        &mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<(), PropertyError> {
        self.set_path(path, value.into())
    }

    /// 일괄 프로퍼티 설정
    ///
    /// - `NotWritable`은 `ignore_unknown`이 아니면 즉시 실패합니다.
    /// - 복구 가능한 에러는 모아두고 다음 바인딩으로 진행합니다.
    /// - 그 밖의 에러(`ArrayConversion` 등)는 즉시 실패합니다. 이미 적용된 바인딩은 유지됩니다.
    pub fn set_property_values(
        &mut self,
        property_values: &PropertyValues,
        ignore_unknown: bool,
        validator: Option<&dyn PropertyValuesValidator>,
    ) -> BeansResult<()> {
        let mut errors = Vec::new();

        if let Some(validator) = validator {
            if let Err(failures) = validator.validate(property_values) {
                errors.extend(failures);
            }
        }

        for pv in property_values {
            match self.set_path(pv.name(), pv.value().clone()) {
                Ok(()) => {}
                Err(PropertyError::NotWritable { .. }) if ignore_unknown => {
                    debug!("Ignoring unknown property '{}'", pv.name());
                }
                Err(error) if error.is_recoverable() => errors.push(error),
                Err(error) => return Err(error.into()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PropertyBatchError::new(errors).into())
        }
    }

    fn set_path(&mut self, path: &str, value: Value) -> Result<(), PropertyError> {
        match split_nested_path(path) {
            Some((head, rest)) => {
                let nested = self.nested_wrapper(head)?;
                nested
                    .set_path(rest, value)
                    .map_err(|e| e.with_prefix(head))
            }
            None => self.set_local(path, value),
        }
    }

    fn active_events_mut(&mut self) -> Option<&mut ChangeSupport> {
        if self.event_propagation {
            self.events.as_mut()
        } else {
            None
        }
    }

    fn active_events(&self) -> Option<&ChangeSupport> {
        if self.event_propagation {
            self.events.as_ref()
        } else {
            None
        }
    }

    fn class_name(&self) -> String {
        self.object.class().name().to_string()
    }

    fn local_property_value(&self, name: &str) -> Result<Value, PropertyError> {
        let not_readable = || PropertyError::NotReadable {
            class: self.class_name(),
            property: name.to_string(),
        };
        let descriptor = self
            .property_descriptor(name)
            .filter(|d| d.is_readable())
            .ok_or_else(not_readable)?;
        let guard = self.object.read();
        descriptor.read(&*guard).ok_or_else(not_readable)
    }

    /// `head` 프로퍼티 값에 묶인 중첩 바인더 (객체 동일성으로 캐시)
    fn nested_wrapper(&mut self, head: &str) -> Result<&mut BeanWrapper, PropertyError> {
        let object = match self.local_property_value(head)? {
            Value::Bean(object) => object,
            Value::Null => {
                return Err(PropertyError::NullValueInNestedPath {
                    class: self.class_name(),
                    path: head.to_string(),
                });
            }
            _ => {
                return Err(PropertyError::InvalidPropertyPath {
                    class: self.class_name(),
                    path: head.to_string(),
                });
            }
        };

        match self.nested.entry(object.identity()) {
            Entry::Occupied(entry) => {
                trace!("Using cached nested binder for property '{}'", head);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!("Creating nested binder for property '{}'", head);
                let nested = BeanWrapper {
                    object,
                    converters: self.converters.inherit(head),
                    fallback: self.fallback.clone(),
                    classes: self.classes.clone(),
                    nested: HashMap::new(),
                    event_propagation: false,
                    events: None,
                };
                Ok(entry.insert(nested))
            }
        }
    }

    fn set_local(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let class = Arc::clone(self.object.class());
        let descriptor = match class.property(name) {
            Some(descriptor) if descriptor.is_writable() => descriptor,
            _ => {
                return Err(PropertyError::NotWritable {
                    class: class.name().to_string(),
                    property: name.to_string(),
                });
            }
        };
        let required = descriptor.value_type();

        if descriptor.is_primitive() && is_null_or_blank(&value) {
            return Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                required: required.clone(),
                value: value.to_string(),
                reason: "primitive property cannot be null or empty".to_string(),
            });
        }

        let converted = self
            .convert(Some(name), required, &value)
            .map_err(|error| match error {
                ConversionError::Element {
                    index,
                    element,
                    message,
                } => PropertyError::ArrayConversion {
                    property: name.to_string(),
                    index,
                    element,
                    message,
                },
                ConversionError::Mismatch(reason) => PropertyError::TypeMismatch {
                    property: name.to_string(),
                    required: required.clone(),
                    value: value.to_string(),
                    reason,
                },
            })?;

        let event = self.active_events().map(|_| {
            let old_value = descriptor.read(&*self.object.read());
            PropertyChangeEvent::new(class.name(), name, old_value, converted.clone())
        });

        if let (Some(events), Some(event)) = (self.active_events(), &event) {
            events
                .fire_vetoable(event)
                .map_err(|message| PropertyError::Vetoed {
                    property: name.to_string(),
                    message,
                })?;
        }

        descriptor
            .write(&mut *self.object.write(), converted)
            .map_err(|failure| match failure {
                WriteFailure::Mismatch => PropertyError::TypeMismatch {
                    property: name.to_string(),
                    required: required.clone(),
                    value: value.to_string(),
                    reason: "value does not fit the declared field type".to_string(),
                },
                WriteFailure::WrongInstance => PropertyError::SetterInvocation {
                    property: name.to_string(),
                    message: format!("instance is not a {}", class.name()),
                },
                WriteFailure::Setter(message) => PropertyError::SetterInvocation {
                    property: name.to_string(),
                    message,
                },
            })?;
        trace!("Set property '{}' of {:?} to {}", name, self.object, value);

        if let (Some(events), Some(event)) = (self.active_events(), &event) {
            events.fire(event);
        }
        Ok(())
    }

    fn convert(
        &self,
        property: Option<&str>,
        target: &ValueType,
        value: &Value,
    ) -> Result<Value, ConversionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some(converter) = self.converters.find(target, property) {
            return converter
                .convert(value, target)
                .map_err(ConversionError::Mismatch);
        }
        if value.is_assignable_to(target) {
            return Ok(value.clone());
        }
        if let ValueType::Array(element) = target {
            if let Some(items) = array_source(value) {
                return self.coerce_array(element, &items);
            }
        }
        if let Some(converted) = convert_builtin(value, target, self.classes.as_deref()) {
            return converted.map_err(ConversionError::Mismatch);
        }
        if let Some(converter) = self.fallback.as_ref().and_then(|r| r.find(target)) {
            return converter
                .convert(value, target)
                .map_err(ConversionError::Mismatch);
        }

        let reason = match value.value_type() {
            Some(actual) => format!("no conversion from {} to {}", actual, target),
            None => format!("unresolved reference cannot be converted to {}", target),
        };
        Err(ConversionError::Mismatch(reason))
    }

    fn coerce_array(&self, element: &ValueType, items: &[Value]) -> Result<Value, ConversionError> {
        let converted = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let element_error = |message: String| ConversionError::Element {
                    index,
                    element: element.clone(),
                    message,
                };
                if element.is_primitive() && item.is_null() {
                    return Err(element_error("null element in primitive array".to_string()));
                }
                self.convert(None, element, item)
                    .map_err(|e| element_error(e.into_message()))
            })
            .collect::<Result<Vec<Value>, ConversionError>>()?;

        Ok(Value::Array(element.clone(), converted))
    }
}

impl fmt::Debug for BeanWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanWrapper")
            .field("object", &self.object)
            .field("event_propagation", &self.event_propagation)
            .field("custom_converters", &self.converters.len())
            .field("nested", &self.nested.len())
            .finish()
    }
}

fn is_null_or_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Str(s) => is_blank(s),
        _ => false,
    }
}

/// 배열 프로퍼티로 옮길 수 있는 원소 목록 (문자열은 콤마로 구분)
fn array_source(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) | Value::Array(_, items) => Some(items.clone()),
        Value::Str(text) => Some(
            comma_delimited_to_vec(text)
                .into_iter()
                .map(Value::Str)
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use indexmap::IndexMap;

    use super::*;
    use crate::binder::standard_converters::{
        CustomBooleanConverter, CustomDateConverter, CustomNumberConverter, PropertyValuesConverter,
    };
    use crate::domain::value::Locale;
    use crate::test_support::{DummyFactory, TestBean, dummy_factory_class, test_bean_class};

    fn wrap(bean: TestBean) -> BeanWrapper {
        BeanWrapper::new(BeanObject::new(test_bean_class(), bean))
    }

    fn read<R>(wrapper: &BeanWrapper, f: impl FnOnce(&TestBean) -> R) -> R {
        wrapper.wrapped_object().with(f).unwrap()
    }

    /// tony → kerry → (spouse 없음)
    fn married() -> (BeanWrapper, BeanObject) {
        let kerry = BeanObject::new(test_bean_class(), TestBean::named("kerry"));
        let mut tony = TestBean::named("tony");
        tony.spouse = Some(kerry.clone());
        (wrap(tony), kerry)
    }

    #[test]
    fn test_batch_applies_valid_bindings_and_aggregates_mismatches() {
        let mut wrapper = wrap(TestBean::default());
        let pvs = PropertyValues::new()
            .with("name", "tony")
            .with("age", "not a number")
            .with("locale", "en_GB")
            .with("active", "maybe")
            .with("props", "pool=main");

        let batch = match wrapper.set_property_values(&pvs, false, None) {
            Err(BeansError::PropertyBatch(batch)) => batch,
            other => panic!("expected aggregated errors, got {:?}", other),
        };

        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.error_for("age"), Some(PropertyError::TypeMismatch { .. })));
        assert!(matches!(batch.error_for("active"), Some(PropertyError::TypeMismatch { .. })));

        read(&wrapper, |b| {
            assert_eq!(b.name.as_deref(), Some("tony"));
            assert_eq!(b.locale, Some(Locale::new("en", "GB", "")));
            assert_eq!(b.props["pool"], "main");
            assert_eq!(b.age, 0);
            assert!(!b.active);
        });
    }

    #[test]
    fn test_nested_path_writes_leaf() {
        let (mut wrapper, kerry) = married();
        let third = BeanObject::new(test_bean_class(), TestBean::named("third"));
        kerry.with_mut(|k: &mut TestBean| k.spouse = Some(third.clone()));

        wrapper.set_property_value("spouse.spouse.name", "deep").unwrap();
        wrapper.set_property_value("spouse.age", 31).unwrap();

        assert_eq!(third.with(|t: &TestBean| t.name.clone()), Some(Some("deep".to_string())));
        assert_eq!(kerry.with(|k: &TestBean| k.age), Some(31));
        assert_eq!(wrapper.property_value("spouse.spouse.name").unwrap(), Value::from("deep"));
        // 같은 중첩 객체는 같은 바인더를 재사용
        assert_eq!(wrapper.nested.len(), 1);
    }

    #[test]
    fn test_null_in_nested_path_writes_nothing() {
        let (mut wrapper, kerry) = married();

        let err = wrapper.set_property_value("spouse.spouse.name", "x").unwrap_err();
        assert_eq!(
            err,
            PropertyError::NullValueInNestedPath {
                class: "TestBean".to_string(),
                path: "spouse.spouse".to_string(),
            }
        );
        assert_eq!(kerry.with(|k: &TestBean| k.name.clone()), Some(Some("kerry".to_string())));
        read(&wrapper, |b| assert_eq!(b.name.as_deref(), Some("tony")));

        let err = wrapper.property_value("spouse.spouse.age").unwrap_err();
        assert!(matches!(err, PropertyError::NullValueInNestedPath { .. }));
    }

    #[test]
    fn test_nested_head_must_be_a_bean() {
        let mut wrapper = wrap(TestBean::named("tony"));
        let err = wrapper.set_property_value("name.length", 3).unwrap_err();
        assert!(matches!(err, PropertyError::InvalidPropertyPath { ref path, .. } if path == "name"));
    }

    #[test]
    fn test_unknown_property_is_fatal_unless_ignored() {
        let mut wrapper = wrap(TestBean::default());
        let pvs = PropertyValues::new()
            .with("bogus", 1)
            .with("name", "rod");

        let err = wrapper.set_property_values(&pvs, false, None).unwrap_err();
        assert!(matches!(err, BeansError::Property(PropertyError::NotWritable { .. })));
        read(&wrapper, |b| assert!(b.name.is_none()));

        wrapper.set_property_values(&pvs, true, None).unwrap();
        read(&wrapper, |b| assert_eq!(b.name.as_deref(), Some("rod")));
    }

    #[test]
    fn test_read_only_property_is_not_writable() {
        let mut wrapper = wrap(TestBean::default());

        assert!(wrapper.is_readable_property("age_description"));
        assert!(!wrapper.is_writable_property("age_description"));
        assert!(matches!(
            wrapper.set_property_value("age_description", "old"),
            Err(PropertyError::NotWritable { .. })
        ));
        assert!(matches!(
            wrapper.property_value("missing"),
            Err(PropertyError::NotReadable { .. })
        ));
    }

    #[test]
    fn test_primitive_rejects_null_and_blank() {
        let mut wrapper = wrap(TestBean::default());

        assert!(matches!(
            wrapper.set_property_value("age", Value::Null),
            Err(PropertyError::TypeMismatch { .. })
        ));
        assert!(matches!(
            wrapper.set_property_value("age", "  "),
            Err(PropertyError::TypeMismatch { .. })
        ));

        // nullable 프로퍼티는 null 허용
        wrapper.set_property_value("name", "x").unwrap();
        wrapper.set_property_value("name", Value::Null).unwrap();
        read(&wrapper, |b| assert!(b.name.is_none()));
    }

    #[test]
    fn test_unresolved_reference_is_type_mismatch() {
        let mut wrapper = wrap(TestBean::default());
        let err = wrapper
            .set_property_value("spouse", Value::reference("kerry"))
            .unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { ref reason, .. } if reason.contains("unresolved")));
    }

    #[test]
    fn test_setter_failure_is_recoverable_in_batch() {
        let mut wrapper = wrap(TestBean::default());

        let err = wrapper.set_property_value("touchy", "1.2").unwrap_err();
        assert!(matches!(err, PropertyError::SetterInvocation { .. }));

        let pvs = PropertyValues::new().with("touchy", "1.2").with("age", 5);
        let err = wrapper.set_property_values(&pvs, false, None).unwrap_err();
        assert!(matches!(err, BeansError::PropertyBatch(ref batch) if batch.len() == 1));
        read(&wrapper, |b| assert_eq!(b.age, 5));
    }

    #[test]
    fn test_veto_leaves_property_unchanged() {
        let mut wrapper = wrap(TestBean::named("rod"));

        // 전파가 꺼져 있으면 리스너 등록이 무시됨
        wrapper.add_vetoable_change_listener(None, |_: &PropertyChangeEvent| -> Result<(), String> {
            Err("always".to_string())
        });
        wrapper.set_property_value("age", 1).unwrap();

        wrapper.set_event_propagation_enabled(true);
        wrapper.add_vetoable_change_listener(
            Some("name"),
            |event: &PropertyChangeEvent| -> Result<(), String> {
                match event.new_value() {
                    Value::Str(s) if s == "bad" => Err("bad name".to_string()),
                    _ => Ok(()),
                }
            },
        );

        let err = wrapper.set_property_value("name", "bad").unwrap_err();
        assert!(matches!(err, PropertyError::Vetoed { ref message, .. } if message == "bad name"));
        read(&wrapper, |b| assert_eq!(b.name.as_deref(), Some("rod")));

        wrapper.set_property_value("name", "good").unwrap();
        read(&wrapper, |b| assert_eq!(b.name.as_deref(), Some("good")));
    }

    #[test]
    fn test_batch_collects_veto_and_null_nested_path() {
        let mut wrapper = wrap(TestBean::named("rod"));
        wrapper.set_event_propagation_enabled(true);
        wrapper.add_vetoable_change_listener(
            Some("name"),
            |_: &PropertyChangeEvent| -> Result<(), String> { Err("frozen".to_string()) },
        );

        let pvs = PropertyValues::new()
            .with("name", "tony")
            .with("spouse.name", "kerry")
            .with("age", 40);

        let batch = match wrapper.set_property_values(&pvs, false, None) {
            Err(BeansError::PropertyBatch(batch)) => batch,
            other => panic!("expected aggregated errors, got {:?}", other),
        };

        assert_eq!(batch.len(), 2);
        assert!(matches!(
            batch.error_for("name"),
            Some(PropertyError::Vetoed { message, .. }) if message == "frozen"
        ));
        assert!(matches!(
            batch.error_for("spouse"),
            Some(PropertyError::NullValueInNestedPath { .. })
        ));
        read(&wrapper, |b| {
            assert_eq!(b.name.as_deref(), Some("rod"));
            assert!(b.spouse.is_none());
            assert_eq!(b.age, 40);
        });
    }

    #[test]
    fn test_blank_locale_clears_nullable_property() {
        let mut wrapper = wrap(TestBean::default());

        wrapper.set_property_value("locale", "de_DE").unwrap();
        read(&wrapper, |b| assert_eq!(b.locale, Some(Locale::new("de", "DE", ""))));

        wrapper.set_property_value("locale", "").unwrap();
        read(&wrapper, |b| assert!(b.locale.is_none()));
    }

    #[test]
    fn test_standard_converters_bind_empty_as_null() {
        let mut wrapper = BeanWrapper::new(BeanObject::new(dummy_factory_class(), DummyFactory::default()));

        // 기본 규칙으로는 빈 문자열을 숫자로 바꿀 수 없음
        assert!(matches!(
            wrapper.set_property_value("product_age", ""),
            Err(PropertyError::TypeMismatch { .. })
        ));

        wrapper.register_custom_converter(
            ValueType::Int,
            Some("product_age"),
            CustomNumberConverter::new(ValueType::Int, true),
        );
        wrapper.register_custom_converter(ValueType::Bool, None, CustomBooleanConverter::new(false));

        wrapper.set_property_value("product_age", " 12 ").unwrap();
        assert_eq!(wrapper.property_value("product_age").unwrap(), Value::Int(12));
        wrapper.set_property_value("product_age", "").unwrap();
        assert_eq!(wrapper.property_value("product_age").unwrap(), Value::Null);

        wrapper.set_property_value("singleton", "FALSE").unwrap();
        assert_eq!(wrapper.property_value("singleton").unwrap(), Value::Bool(false));
        // primitive 프로퍼티는 변환기와 관계없이 빈 값을 거부
        assert!(matches!(
            wrapper.set_property_value("singleton", ""),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_date_and_text_block_converters() {
        let mut wrapper = wrap(TestBean::default());
        assert!(wrapper.set_property_value("birthday", "1970-01-02").is_err());
        assert!(wrapper.set_property_value("attributes", "a=1").is_err());

        wrapper.register_custom_converter(
            ValueType::Date,
            None,
            CustomDateConverter::new("%Y-%m-%d", true),
        );
        wrapper.register_custom_converter(ValueType::Map, Some("attributes"), PropertyValuesConverter);

        wrapper.set_property_value("birthday", "1970-01-02").unwrap();
        wrapper
            .set_property_value("attributes", "# team\nrole=lead\nfloor: 3")
            .unwrap();
        read(&wrapper, |b| {
            let birthday = b.birthday.unwrap();
            assert_eq!(birthday.date().to_string(), "1970-01-02");
            assert_eq!(b.attributes.len(), 2);
            assert_eq!(b.attributes["role"], Value::from("lead"));
            assert_eq!(b.attributes["floor"], Value::from("3"));
        });

        wrapper.set_property_value("birthday", "").unwrap();
        read(&wrapper, |b| assert!(b.birthday.is_none()));
    }

    #[test]
    fn test_change_listener_sees_old_and_new_values() {
        let seen: Arc<Mutex<Vec<(Option<Value>, Value)>>> = Arc::default();
        let mut wrapper = wrap(TestBean::default());
        wrapper.set_event_propagation_enabled(true);

        let sink = Arc::clone(&seen);
        wrapper.add_property_change_listener(Some("age"), move |event: &PropertyChangeEvent| {
            sink.lock()
                .unwrap()
                .push((event.old_value().cloned(), event.new_value().clone()));
        });

        wrapper.set_property_value("age", "7").unwrap();
        wrapper.set_property_value("name", "ignored").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(Some(Value::Int(0)), Value::Int(7))]);
    }

    #[test]
    fn test_array_coercion() {
        let mut wrapper = wrap(TestBean::default());

        wrapper.set_property_value("nicknames", "tony, rod").unwrap();
        wrapper
            .set_property_value("lucky_numbers", Value::list([Value::from("3"), Value::Int(7)]))
            .unwrap();
        read(&wrapper, |b| {
            assert_eq!(b.nicknames, vec!["tony", "rod"]);
            assert_eq!(b.lucky_numbers, vec![3, 7]);
        });

        let err = wrapper
            .set_property_value("lucky_numbers", Value::list(["1", "x"]))
            .unwrap_err();
        assert!(matches!(
            err,
            PropertyError::ArrayConversion { index: 1, element: ValueType::Int, .. }
        ));

        // 배열 변환 실패는 일괄 설정에서도 치명적
        let pvs = PropertyValues::new().with("lucky_numbers", Value::list([Value::Null]));
        let err = wrapper.set_property_values(&pvs, false, None).unwrap_err();
        assert!(matches!(err, BeansError::Property(PropertyError::ArrayConversion { .. })));
        read(&wrapper, |b| assert_eq!(b.lucky_numbers, vec![3, 7]));
    }

    #[test]
    fn test_custom_converter_per_path_beats_per_type() {
        let mut wrapper = wrap(TestBean::default());
        wrapper.register_custom_converter(
            ValueType::Str,
            None,
            |value: &Value, _: &ValueType| -> Result<Value, String> {
                Ok(Value::Str(format!("<{}>", value.as_str().unwrap_or_default())))
            },
        );
        wrapper.register_custom_converter(
            ValueType::Str,
            Some("name"),
            |value: &Value, _: &ValueType| -> Result<Value, String> {
                Ok(Value::Str(value.as_str().unwrap_or_default().to_uppercase()))
            },
        );

        wrapper.set_property_value("name", "rod").unwrap();
        wrapper.set_property_value("touchy", "rod").unwrap();

        read(&wrapper, |b| {
            assert_eq!(b.name.as_deref(), Some("ROD"));
            assert_eq!(b.touchy.as_deref(), Some("<rod>"));
        });
    }

    #[test]
    fn test_nested_binder_copies_converters_only_at_creation() {
        let upper = |value: &Value, _: &ValueType| -> Result<Value, String> {
            Ok(Value::Str(value.as_str().unwrap_or_default().to_uppercase()))
        };

        let (mut early, kerry) = married();
        early.register_custom_converter(ValueType::Str, Some("spouse.name"), upper);
        early.set_property_value("spouse.name", "kim").unwrap();
        assert_eq!(kerry.with(|k: &TestBean| k.name.clone()), Some(Some("KIM".to_string())));

        let (mut late, kerry) = married();
        late.set_property_value("spouse.age", 1).unwrap();
        late.register_custom_converter(ValueType::Str, Some("spouse.name"), upper);
        late.set_property_value("spouse.name", "kim").unwrap();
        assert_eq!(kerry.with(|k: &TestBean| k.name.clone()), Some(Some("kim".to_string())));
    }

    #[test]
    fn test_class_by_name_needs_registry() {
        let classes = Arc::new(ClassRegistry::new());
        classes.register(test_bean_class());

        let mut bare = wrap(TestBean::default());
        assert!(matches!(
            bare.set_property_value("target_class", "TestBean"),
            Err(PropertyError::TypeMismatch { .. })
        ));

        let mut wrapper = wrap(TestBean::default()).with_class_registry(classes);
        wrapper.set_property_value("target_class", "TestBean").unwrap();
        read(&wrapper, |b| {
            assert_eq!(b.target_class.as_ref().map(|c| c.name()), Some("TestBean"));
        });
    }

    #[test]
    fn test_fallback_registry_is_last_resort() {
        let registry = Arc::new(ConverterRegistry::new());
        registry.register(ValueType::Map, |value: &Value, _: &ValueType| -> Result<Value, String> {
            let text = value.as_str().ok_or("expected text")?;
            let entries: IndexMap<String, Value> = text
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), Value::from(v)))
                .collect();
            Ok(Value::Map(entries))
        });

        let mut bare = wrap(TestBean::default());
        assert!(bare.set_property_value("attributes", "a=1;b=2").is_err());

        let mut wrapper = wrap(TestBean::default()).with_fallback_converters(registry);
        wrapper.set_property_value("attributes", "a=1;b=2").unwrap();
        read(&wrapper, |b| {
            assert_eq!(b.attributes.len(), 2);
            assert_eq!(b.attributes["b"], Value::from("2"));
        });
    }

    #[test]
    fn test_validator_failures_join_the_aggregate() {
        let mut wrapper = wrap(TestBean::default());
        let validator = RequiredPropertiesValidator::new(["name"]);
        let pvs = PropertyValues::new().with("age", 40).with("active", "x");

        let batch = match wrapper.set_property_values(&pvs, false, Some(&validator)) {
            Err(BeansError::PropertyBatch(batch)) => batch,
            other => panic!("expected aggregated errors, got {:?}", other),
        };
        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.error_for("name"), Some(PropertyError::Invalid { .. })));
        read(&wrapper, |b| assert_eq!(b.age, 40));
    }

    #[test]
    fn test_instantiate_abstract_class_fails() {
        let class = BeanClass::abstract_builder::<TestBean>("AbstractBean").build();
        assert!(matches!(
            BeanWrapper::instantiate(&class),
            Err(BeansError::Instantiation { .. })
        ));

        let wrapper = BeanWrapper::instantiate(&test_bean_class()).unwrap();
        assert_eq!(wrapper.wrapped_class().name(), "TestBean");
        assert_eq!(wrapper.property_descriptors().count(), test_bean_class().properties().count());
    }
}
