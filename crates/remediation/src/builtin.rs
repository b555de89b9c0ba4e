//! 내장 시그니처 테이블
//!
//! `signatures/` 디렉토리의 YAML 파일을 컴파일 시점에 포함합니다.
//! 파일 순서와 파일 내 작성 순서가 곧 매칭 우선순위입니다.
//! 새 파일을 추가하면 이 목록에도 추가해야 합니다.

use crate::error::RemediationError;
use crate::signature::{SignatureDef, SignatureLoader};

/// (소스 이름, YAML 원문) 목록, 우선순위 순서
pub const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "builtin:01-business-engine.yaml",
        include_str!("../signatures/01-business-engine.yaml"),
    ),
    (
        "builtin:02-certificates.yaml",
        include_str!("../signatures/02-certificates.yaml"),
    ),
    (
        "builtin:03-database.yaml",
        include_str!("../signatures/03-database.yaml"),
    ),
    (
        "builtin:04-integration-engine.yaml",
        include_str!("../signatures/04-integration-engine.yaml"),
    ),
    (
        "builtin:05-comms-engine.yaml",
        include_str!("../signatures/05-comms-engine.yaml"),
    ),
    (
        "builtin:06-openid.yaml",
        include_str!("../signatures/06-openid.yaml"),
    ),
    (
        "builtin:07-email.yaml",
        include_str!("../signatures/07-email.yaml"),
    ),
    (
        "builtin:08-licensing.yaml",
        include_str!("../signatures/08-licensing.yaml"),
    ),
    (
        "builtin:09-service.yaml",
        include_str!("../signatures/09-service.yaml"),
    ),
];

/// 내장 시그니처 정의를 우선순위 순서로 파싱합니다.
///
/// 내장 데이터는 크레이트와 함께 버전 관리되므로 실패는 빌드 결함을 의미하지만,
/// 패닉 대신 에러로 전달합니다.
pub fn builtin_definitions() -> Result<Vec<(&'static str, SignatureDef)>, RemediationError> {
    let mut defs = Vec::new();
    for (source, yaml) in BUILTIN_SOURCES {
        for def in SignatureLoader::parse_yaml(yaml, source)? {
            defs.push((*source, def));
        }
    }
    Ok(defs)
}
