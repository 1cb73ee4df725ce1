//! 프로퍼티 바인딩 집합
//!
//! 이름이 유일한 `(name, value)` 쌍의 순서 있는 집합입니다.
//! 같은 이름으로 다시 추가하면 원래 위치에서 값만 교체됩니다.

use std::convert::Infallible;
use std::str::FromStr;

use crate::domain::value::Value;
use crate::utils::string_utils::properties_lines;

/// 하나의 프로퍼티 바인딩
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    name: String,
    value: Value,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 형태의 추가
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(name, value);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_property_value(PropertyValue::new(name, value))
    }

    pub fn add_property_value(&mut self, pv: PropertyValue) -> &mut Self {
        match self.values.iter_mut().find(|existing| existing.name == pv.name) {
            Some(existing) => existing.value = pv.value,
            None => self.values.push(pv),
        }
        self
    }

    /// `other`의 모든 바인딩을 덮어씁니다. 같은 이름은 `other`가 우선합니다.
    pub fn add_all(&mut self, other: &PropertyValues) -> &mut Self {
        for pv in &other.values {
            self.add_property_value(pv.clone());
        }
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.values.iter().position(|pv| pv.name == name)?;
        Some(self.values.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.iter().find(|pv| pv.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyValue> {
        self.values.iter()
    }

    /// `old`와 비교해 새로 생겼거나 값이 달라진 바인딩만 모읍니다.
    pub fn changes_since(&self, old: &PropertyValues) -> PropertyValues {
        self.values
            .iter()
            .filter(|pv| old.get(&pv.name).map_or(true, |prev| prev.value != pv.value))
            .cloned()
            .collect()
    }

    /// 양쪽 어디에도 차이가 없는지 (순서는 무시)
    pub fn same_bindings(&self, other: &PropertyValues) -> bool {
        self.changes_since(other).is_empty() && other.changes_since(self).is_empty()
    }
}

impl FromIterator<PropertyValue> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = PropertyValue>>(iter: I) -> Self {
        let mut pvs = PropertyValues::new();
        for pv in iter {
            pvs.add_property_value(pv);
        }
        pvs
    }
}

/// `key=value` 줄 단위 텍스트 블록을 문자열 바인딩으로 읽습니다.
///
/// 텍스트에 나온 순서를 유지하며, 같은 키가 다시 나오면 원래 위치의 값이 교체됩니다.
impl FromStr for PropertyValues {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(properties_lines(text)
            .map(|(name, value)| PropertyValue::new(name, value))
            .collect())
    }
}

impl<'a> IntoIterator for &'a PropertyValues {
    type Item = &'a PropertyValue;
    type IntoIter = std::slice::Iter<'a, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for PropertyValues {
    type Item = PropertyValue;
    type IntoIter = std::vec::IntoIter<PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replaces_in_place() {
        let mut pvs = PropertyValues::new().with("name", "tony").with("age", 50);
        pvs.add("name", "rod");

        let names: Vec<&str> = pvs.iter().map(PropertyValue::name).collect();
        assert_eq!(names, vec!["name", "age"]);
        assert_eq!(pvs.get("name").unwrap().value(), &Value::from("rod"));
        assert_eq!(pvs.len(), 2);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut pvs = PropertyValues::new().with("a", 1).with("b", 2);

        assert!(pvs.contains("a"));
        assert_eq!(pvs.remove("a").map(|pv| pv.into_parts().0), Some("a".to_string()));
        assert!(!pvs.contains("a"));
        assert!(pvs.remove("missing").is_none());
    }

    #[test]
    fn test_changes_since() {
        let old = PropertyValues::new().with("name", "tony").with("age", 50);
        let new = PropertyValues::new()
            .with("name", "tony")
            .with("age", 51)
            .with("touchy", "x");

        let changes = new.changes_since(&old);
        assert_eq!(changes.len(), 2);
        assert!(changes.contains("age"));
        assert!(changes.contains("touchy"));
        assert!(old.changes_since(&old).is_empty());
    }

    #[test]
    fn test_same_bindings_ignores_order() {
        let a = PropertyValues::new().with("x", 1).with("y", 2);
        let b = PropertyValues::new().with("y", 2).with("x", 1);
        let c = PropertyValues::new().with("x", 1);

        assert!(a.same_bindings(&b));
        assert!(!a.same_bindings(&c));
        assert!(!c.same_bindings(&a));
    }

    #[test]
    fn test_parse_text_block() {
        let pvs: PropertyValues = "# pool\nsize=10\nname: main\nsize=20".parse().unwrap();

        let names: Vec<&str> = pvs.iter().map(PropertyValue::name).collect();
        assert_eq!(names, vec!["size", "name"]);
        assert_eq!(pvs.get("size").unwrap().value(), &Value::from("20"));
        assert_eq!(pvs.get("name").unwrap().value(), &Value::from("main"));
        assert!("".parse::<PropertyValues>().unwrap().is_empty());
    }
}
