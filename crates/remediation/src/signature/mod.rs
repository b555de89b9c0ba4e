//! 오류 시그니처 -- 탐지 패턴과 구조화된 해결 가이드
//!
//! 시그니처는 YAML로 작성되어 [`SignatureDef`]로 역직렬화된 뒤,
//! 검증과 패턴 컴파일을 거쳐 불변 [`Signature`]가 됩니다.
//!
//! # 아키텍처
//! - [`types`]: 시그니처 데이터 구조와 검증
//! - [`pattern`]: 대소문자 무시 정규식 탐지 규칙
//! - [`loader`]: YAML 파일/디렉토리 로딩

pub mod loader;
pub mod pattern;
pub mod types;

pub use loader::SignatureLoader;
pub use pattern::{DetectionRule, RegexPattern};
pub use types::{Signature, SignatureDef, Step};
