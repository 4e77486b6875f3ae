//! Persistência do TokenRecord em arquivo JSON

use std::path::{Path, PathBuf};

use tokio::fs;

use super::TokenRecord;
use crate::error::Result;

/// Arquivo único contendo o token atual
///
/// A escrita é atômica (arquivo temporário + rename), então um leitor nunca
/// vê um JSON pela metade. Não há lock entre processos.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê o token salvo
    ///
    /// Arquivo ausente, ilegível ou corrompido resulta em `None`.
    pub async fn load(&self) -> Option<TokenRecord> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::error!("Erro ao ler arquivo de token {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!("Arquivo de token inválido {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Sobrescreve o token salvo
    pub async fn save(&self, record: &TokenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_vec(record)?).await?;
        fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Token salvo em {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample() -> TokenRecord {
        TokenRecord {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at: Utc::now() + Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token.json"));

        store.save(&sample()).await.unwrap();

        let mut second = sample();
        second.access_token = "access-2".to_string();
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.access_token, "access-2");
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupted_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(TokenStore::new(&path).load().await.is_none());
    }
}
