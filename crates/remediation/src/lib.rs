#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`signature`]: 시그니처 데이터 구조, 탐지 패턴, YAML 로더
//! - [`builtin`]: 컴파일 시점에 포함되는 내장 시그니처 테이블
//! - [`registry`]: 순서가 보존되는 불변 시그니처 레지스트리와 빌더
//! - [`engine`]: 최초 매칭 분류(`match_one`)와 스트림 필터(`enrich`)
//! - [`summary`]: 심각도별 집계와 그룹화
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! builtin YAML + extra dirs -> RegistryBuilder -> SignatureRegistry
//!                                                       |
//!                       LogEntry stream -> MatchingEngine -> EnrichedIssue
//! ```

pub mod builtin;
pub mod engine;
pub mod error;
pub mod registry;
pub mod signature;
pub mod summary;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::{EnrichedIssue, MatchingEngine, ProgressKey};

// 레지스트리
pub use registry::{RegistryBuilder, SignatureRegistry};

// 시그니처
pub use signature::{DetectionRule, RegexPattern, Signature, SignatureDef, SignatureLoader, Step};

// 요약
pub use summary::{SeveritySummary, SignatureCount, group_by_severity};

// 에러
pub use error::RemediationError;
