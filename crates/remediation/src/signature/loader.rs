//! 시그니처 파일 로더 -- YAML 시그니처 팩을 디스크에서 로드합니다.
//!
//! 디렉토리 내의 `.yml`/`.yaml` 파일을 파일명 순서로 스캔하고 파싱합니다.
//! 파일 순서가 곧 매칭 우선순위이므로 정렬은 결정적이어야 합니다.
//! 잘못된 파일은 건너뛰지 않고 로딩 전체를 실패시킵니다.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::RemediationError;

use super::types::SignatureDef;

/// 시그니처 파일 크기 상한
pub const MAX_SIGNATURE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB
/// 한 디렉토리에서 로드할 수 있는 시그니처 정의 수 상한
pub const MAX_SIGNATURES_COUNT: usize = 10_000;

/// 시그니처 파일 로더
pub struct SignatureLoader;

impl SignatureLoader {
    /// 디렉토리에서 모든 YAML 시그니처 파일을 로드합니다.
    ///
    /// `.yml` 또는 `.yaml` 확장자를 가진 파일만 파일명 순서로 처리합니다.
    /// 반환되는 정의는 파일 순서, 파일 내 작성 순서를 그대로 따릅니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 어떤 파일이든 읽기 또는 파싱에 실패한 경우
    /// - 정의 수가 `MAX_SIGNATURES_COUNT`를 초과하는 경우
    pub async fn load_directory(
        dir: impl AsRef<Path>,
    ) -> Result<Vec<SignatureDef>, RemediationError> {
        let dir = dir.as_ref();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| RemediationError::Load {
                path: dir.display().to_string(),
                reason: format!("failed to read directory: {e}"),
            })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RemediationError::Load {
                path: dir.display().to_string(),
                reason: format!("failed to read directory entry: {e}"),
            })?
        {
            let path = entry.path();

            // .yml / .yaml 확장자만 처리
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");

            if is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        let mut defs = Vec::new();
        for path in &paths {
            let loaded = Self::load_file(path).await?;
            tracing::debug!(
                path = %path.display(),
                count = loaded.len(),
                "loaded signature file"
            );
            defs.extend(loaded);

            if defs.len() > MAX_SIGNATURES_COUNT {
                return Err(RemediationError::Load {
                    path: dir.display().to_string(),
                    reason: format!("too many signatures: max {MAX_SIGNATURES_COUNT}"),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            files = paths.len(),
            count = defs.len(),
            "loaded signature definitions"
        );

        Ok(defs)
    }

    /// 단일 YAML 파일에서 시그니처 정의를 로드합니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Vec<SignatureDef>, RemediationError> {
        let path = path.as_ref();

        // 파일 크기 검증
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| RemediationError::Load {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_SIGNATURE_FILE_SIZE {
            return Err(RemediationError::Load {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_SIGNATURE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RemediationError::Load {
                path: path.display().to_string(),
                reason: format!("failed to read file: {e}"),
            })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱하여 시그니처 정의 목록을 생성합니다.
    ///
    /// 구조 검증만 수행하며, 패턴 컴파일과 ID 중복 검사는 레지스트리 빌드 시점에 이뤄집니다.
    /// 보통은 시퀀스이지만, 정의 하나만 있는 파일은 매핑도 허용합니다.
    /// 빈 문서는 빈 목록으로 취급합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<Vec<SignatureDef>, RemediationError> {
        let parse_error = |e: serde_yaml::Error| RemediationError::Load {
            path: source.to_owned(),
            reason: format!("YAML parse error: {e}"),
        };

        // 문서 형태를 먼저 판별해야 필드 단위 에러 메시지가 보존됨
        let doc: Option<Value> = serde_yaml::from_str(yaml_str).map_err(parse_error)?;
        let defs = match doc {
            None | Some(Value::Null) => Vec::new(),
            Some(seq @ Value::Sequence(_)) => {
                serde_yaml::from_value::<Vec<SignatureDef>>(seq).map_err(parse_error)?
            }
            Some(other) => vec![serde_yaml::from_value::<SignatureDef>(other).map_err(parse_error)?],
        };

        for def in &defs {
            def.validate()?;
        }

        Ok(defs)
    }
}
