//! # 문자열 유틸리티
//!
//! 프로퍼티 경로와 텍스트 값 변환에 쓰이는 공통 문자열 함수들입니다.

use crate::domain::value::Properties;

/// 중첩 프로퍼티 경로 구분자
pub const NESTED_PROPERTY_SEPARATOR: char = '.';

/// 문자열이 비어 있거나 공백만으로 구성되었는지 확인
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::is_blank;
///
/// assert!(is_blank("   "));
/// assert!(!is_blank(" a "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 콤마로 구분된 문자열을 잘라 각 항목의 앞뒤 공백을 제거합니다.
///
/// 빈 문자열은 빈 벡터가 됩니다. 중간의 빈 항목은 그대로 유지됩니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::comma_delimited_to_vec;
///
/// assert_eq!(comma_delimited_to_vec("a, b,c"), vec!["a", "b", "c"]);
/// assert!(comma_delimited_to_vec("").is_empty());
/// ```
pub fn comma_delimited_to_vec(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

/// 경로를 첫 번째 구분자에서 `(head, rest)`로 나눕니다.
///
/// 구분자가 없으면 `None`을 반환합니다.
pub fn split_nested_path(path: &str) -> Option<(&str, &str)> {
    path.split_once(NESTED_PROPERTY_SEPARATOR)
}

/// `key=value` 또는 `key: value` 형식의 줄 단위 텍스트를 프로퍼티 블록으로 파싱합니다.
///
/// - `#` 또는 `!`로 시작하는 줄은 주석입니다.
/// - 구분자가 없는 줄은 값이 빈 문자열인 키가 됩니다.
/// - 같은 키가 다시 나오면 나중 값이 우선합니다.
///
/// # 예제
/// ```rust,ignore
/// let props = parse_properties_block("# pool\nsize=10\nname: main");
/// assert_eq!(props["size"], "10");
/// ```
pub fn parse_properties_block(text: &str) -> Properties {
    properties_lines(text).collect()
}

/// 프로퍼티 블록의 `(키, 값)` 쌍을 텍스트에 나온 순서대로 돌려줍니다 (중복 키 포함).
pub fn properties_lines(text: &str) -> impl Iterator<Item = (String, String)> + '_ {
    text.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            return None;
        }
        let (key, value) = match line.find(['=', ':']) {
            Some(pos) => (&line[..pos], &line[pos + 1..]),
            None => (line, ""),
        };
        Some((key.trim().to_string(), value.trim().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("  World  "));
    }

    #[test]
    fn test_comma_delimited_to_vec() {
        assert_eq!(comma_delimited_to_vec("a, b,c"), vec!["a", "b", "c"]);
        assert_eq!(comma_delimited_to_vec("single"), vec!["single"]);
        assert_eq!(comma_delimited_to_vec("a,,b"), vec!["a", "", "b"]);
        assert!(comma_delimited_to_vec("").is_empty());
    }

    #[test]
    fn test_split_nested_path() {
        assert_eq!(split_nested_path("spouse.spouse.name"), Some(("spouse", "spouse.name")));
        assert_eq!(split_nested_path("name"), None);
    }

    #[test]
    fn test_parse_properties_block() {
        let text = "# comment\n! another\nsize = 10\nname: main pool\n\nflag\nurl=jdbc:h2:mem";
        let props = parse_properties_block(text);

        assert_eq!(props.len(), 4);
        assert_eq!(props["size"], "10");
        assert_eq!(props["name"], "main pool");
        assert_eq!(props["flag"], "");
        // 첫 번째 구분자에서만 자름
        assert_eq!(props["url"], "jdbc:h2:mem");
    }

    #[test]
    fn test_properties_lines_keep_text_order() {
        let lines: Vec<(String, String)> = properties_lines("b=2\n# skip\na: 1\nb=3").collect();
        assert_eq!(
            lines,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }
}
