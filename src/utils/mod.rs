//! 공통 유틸리티 함수 모듈
//!
//! 크레이트 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 프로퍼티 경로 분리, 콤마 구분 목록, 프로퍼티 블록 파싱
//! - [`display_terminal`] - 데모 바이너리의 터미널 출력 포맷팅
//!
//! # Examples
//!
//! ```rust,ignore
//! use bean_factory::utils::string_utils::comma_delimited_to_vec;
//! use bean_factory::utils::display_terminal::print_boxed_title;
//!
//! let names = comma_delimited_to_vec("tony, rod");
//! print_boxed_title("Bean Factory Demo");
//! ```

pub mod string_utils;
pub mod display_terminal;
