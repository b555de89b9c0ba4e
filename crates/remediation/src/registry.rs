//! 시그니처 레지스트리 -- 순서가 보존되는 불변 시그니처 목록
//!
//! 레지스트리의 순서가 곧 매칭 우선순위입니다.
//! ID 인덱스는 조회용 보조 맵일 뿐, 순서를 결정하지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! let registry = RegistryBuilder::new()
//!     .with_builtin()
//!     .load_dir("/etc/logmedic/signatures")
//!     .await?
//!     .disable_categories(["Licensing"])
//!     .build()?;
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use logmedic_core::config::SignaturesConfig;

use crate::builtin::builtin_definitions;
use crate::error::RemediationError;
use crate::signature::{Signature, SignatureDef, SignatureLoader};

/// 시그니처 레지스트리
///
/// 생성 후에는 변경되지 않으며, `Arc`로 감싸 여러 스레드에서 잠금 없이 읽을 수 있습니다.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    /// 작성 순서 = 우선순위 순서
    signatures: Vec<Arc<Signature>>,
    /// ID -> `signatures` 인덱스
    index: HashMap<String, usize>,
}

impl SignatureRegistry {
    /// 내장 시그니처만으로 레지스트리를 생성합니다.
    pub fn builtin() -> Result<Self, RemediationError> {
        RegistryBuilder::new().with_builtin().build()
    }

    /// 모든 시그니처를 우선순위 순서로 반환합니다.
    pub fn all(&self) -> &[Arc<Signature>] {
        &self.signatures
    }

    /// ID로 시그니처를 조회합니다. 없으면 `None`입니다.
    pub fn find_by_id(&self, id: &str) -> Option<&Arc<Signature>> {
        self.index.get(id).map(|&idx| &self.signatures[idx])
    }

    /// 등록된 시그니처 수
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// 시그니처가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// 시그니처 ID를 우선순위 순서로 반환합니다.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|sig| sig.id.as_str())
    }

    /// 관련 시그니처 중 레지스트리에 존재하는 것만 반환합니다.
    pub fn related(&self, signature: &Signature) -> Vec<&Arc<Signature>> {
        signature
            .related
            .iter()
            .filter_map(|id| {
                let found = self.find_by_id(id);
                if found.is_none() {
                    tracing::debug!(
                        signature_id = %signature.id,
                        related_id = %id,
                        "related signature not in registry"
                    );
                }
                found
            })
            .collect()
    }

    /// 분류 목록 (처음 나타난 순서, 중복 제거)
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.signatures
            .iter()
            .map(|sig| sig.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

/// 시그니처 소스
#[derive(Debug, Clone)]
enum Source {
    /// 내장 테이블
    Builtin,
    /// 추가 정의 (소스 이름, 정의 목록)
    Defs(String, Vec<SignatureDef>),
}

/// 레지스트리 빌더
///
/// 소스는 추가한 순서대로 우선순위를 가집니다.
/// `build()`에서 모든 정의를 검증하며, 하나라도 잘못되면 레지스트리를 만들지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    sources: Vec<Source>,
    disabled_ids: HashSet<String>,
    disabled_categories: Vec<String>,
}

impl RegistryBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 시그니처 설정 섹션으로 빌더를 구성합니다.
    ///
    /// 내장 테이블, `extra_dirs`(설정 순서), 비활성화 목록을 차례로 적용합니다.
    pub async fn from_config(config: &SignaturesConfig) -> Result<Self, RemediationError> {
        let mut builder = Self::new();
        if config.builtin {
            builder = builder.with_builtin();
        }
        for dir in &config.extra_dirs {
            builder = builder.load_dir(dir).await?;
        }
        Ok(builder
            .disable_ids(config.disabled.iter().cloned())
            .disable_categories(config.disabled_categories.iter().cloned()))
    }

    /// 내장 시그니처 테이블을 추가합니다.
    pub fn with_builtin(mut self) -> Self {
        self.sources.push(Source::Builtin);
        self
    }

    /// 시그니처 정의 하나를 추가합니다.
    pub fn add(self, def: SignatureDef) -> Self {
        self.extend("inline", [def])
    }

    /// 시그니처 정의 여러 개를 추가합니다.
    pub fn extend(
        mut self,
        source_name: impl Into<String>,
        defs: impl IntoIterator<Item = SignatureDef>,
    ) -> Self {
        self.sources
            .push(Source::Defs(source_name.into(), defs.into_iter().collect()));
        self
    }

    /// 디렉토리의 YAML 시그니처 팩을 로드하여 추가합니다.
    pub async fn load_dir(self, dir: impl AsRef<Path>) -> Result<Self, RemediationError> {
        let dir = dir.as_ref();
        let defs = SignatureLoader::load_directory(dir).await?;
        Ok(self.extend(dir.display().to_string(), defs))
    }

    /// 지정한 ID의 시그니처를 제외합니다.
    pub fn disable_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// 지정한 분류의 시그니처를 제외합니다. 대소문자는 무시합니다.
    pub fn disable_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_categories
            .extend(categories.into_iter().map(Into::into));
        self
    }

    fn is_disabled(&self, signature: &Signature) -> bool {
        self.disabled_ids.contains(&signature.id)
            || self
                .disabled_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&signature.category))
    }

    /// 모든 정의를 검증하고 레지스트리를 생성합니다.
    ///
    /// 비활성화된 정의도 검증 대상이며, ID 중복 검사에도 포함됩니다.
    ///
    /// # Errors
    /// - 패턴 컴파일 실패, 빈 ID/제목, 단계 번호 불연속
    /// - 소스 전체에서 ID 중복
    pub fn build(self) -> Result<SignatureRegistry, RemediationError> {
        let mut defs: Vec<(String, SignatureDef)> = Vec::new();
        for source in &self.sources {
            match source {
                Source::Builtin => {
                    defs.extend(
                        builtin_definitions()?
                            .into_iter()
                            .map(|(name, def)| (name.to_owned(), def)),
                    );
                }
                Source::Defs(name, list) => {
                    defs.extend(list.iter().cloned().map(|def| (name.clone(), def)));
                }
            }
        }

        let mut seen_ids = HashSet::new();
        let mut registry = SignatureRegistry::default();
        let mut disabled = 0usize;

        for (source_name, def) in defs {
            let signature = def.compile()?;

            if !seen_ids.insert(signature.id.clone()) {
                return Err(RemediationError::DuplicateId {
                    signature_id: signature.id,
                    source_name,
                });
            }

            if self.is_disabled(&signature) {
                tracing::debug!(signature_id = %signature.id, "signature disabled");
                disabled += 1;
                continue;
            }

            registry
                .index
                .insert(signature.id.clone(), registry.signatures.len());
            registry.signatures.push(Arc::new(signature));
        }

        for id in &self.disabled_ids {
            if !seen_ids.contains(id) {
                tracing::warn!(signature_id = %id, "disabled signature id is not defined");
            }
        }

        tracing::info!(
            count = registry.len(),
            disabled,
            "signature registry built"
        );

        Ok(registry)
    }
}
