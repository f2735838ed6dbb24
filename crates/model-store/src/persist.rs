//! 스냅샷 파일 저장/로드
//!
//! 모델 파일은 내보내기 문서를 들여쓴 JSON으로 담습니다. 저장은 같은 디렉토리의
//! 임시 파일(`.{name}.tmp`)에 쓴 뒤 rename 하므로, 중간에 실패해도 기존 파일이
//! 반쯤 쓰인 상태로 남지 않습니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use threatforge_core::error::ImportError;

use crate::error::StoreError;
use crate::export::ThreatModelExport;
use crate::store::{ModelSnapshot, ThreatModelStore};

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// 문서를 파일에 원자적으로 씁니다.
pub async fn write_document(path: &Path, doc: &ThreatModelExport) -> Result<(), StoreError> {
    let json = doc.to_json_pretty()?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, json.as_bytes())
        .await
        .map_err(|e| io_error(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(path, e));
    }

    debug!(path = %path.display(), bytes = json.len(), "document written");
    Ok(())
}

/// 파일을 읽습니다. 크기 제한을 넘으면 읽기 전에 거부합니다.
pub async fn read_document_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>, StoreError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > max_bytes {
        return Err(ImportError::TooLarge {
            size,
            max: max_bytes,
        }
        .into());
    }

    tokio::fs::read(path).await.map_err(|e| io_error(path, e))
}

impl ThreatModelStore {
    /// 현재 모델을 내보내 파일에 저장합니다.
    pub async fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let doc = self.export();
        write_document(path, &doc).await?;
        info!(path = %path.display(), nodes = doc.diagram.nodes.len(), "model saved");
        Ok(())
    }

    /// 파일에서 모델을 가져와 현재 상태를 교체합니다.
    pub async fn load_from_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ModelSnapshot>, StoreError> {
        let path = path.as_ref();
        let bytes = read_document_bytes(path, self.config().max_document_bytes).await?;
        let snapshot = self.import_slice(&bytes)?;
        info!(path = %path.display(), nodes = snapshot.nodes.len(), "model loaded");
        Ok(snapshot)
    }
}
