//! Atualização do `.env` depois que o código de autorização é consumido
//!
//! O código do amoCRM vale uma única vez. Depois da troca o `.env` passa a
//! guardar `AMO_REFRESH_TOKEN` e a linha `AMO_AUTH_CODE` fica comentada, para
//! que um restart não tente reutilizar o código.

use std::path::Path;

use regex::{NoExpand, Regex};

use crate::error::{AmoCrmError, Result};

const REFRESH_TOKEN_KEY: &str = "AMO_REFRESH_TOKEN";

/// Reescreve o conteúdo de um `.env`
pub fn rewrite_env(content: &str, refresh_token: &str) -> Result<String> {
    let refresh_re = Regex::new(r"(?m)^AMO_REFRESH_TOKEN=[^\r\n]*")
        .map_err(|e| AmoCrmError::ConfigError(e.to_string()))?;
    let auth_code_re = Regex::new(r"(?m)^(AMO_AUTH_CODE=[^\r\n]*)")
        .map_err(|e| AmoCrmError::ConfigError(e.to_string()))?;

    let line = format!("{}={}", REFRESH_TOKEN_KEY, refresh_token);

    let mut updated = if refresh_re.is_match(content) {
        refresh_re.replace(content, NoExpand(&line)).into_owned()
    } else {
        let mut appended = content.to_string();
        if !appended.is_empty() && !appended.ends_with('\n') {
            appended.push('\n');
        }
        appended.push_str(&line);
        appended.push('\n');
        appended
    };

    updated = auth_code_re.replace(&updated, "# ${1}").into_owned();
    Ok(updated)
}

/// Aplica [`rewrite_env`] no arquivo; arquivo ausente é ignorado
pub async fn update_env_file(path: &Path, refresh_token: &str) -> Result<()> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Arquivo {} não encontrado, pulando atualização", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let updated = rewrite_env(&content, refresh_token)?;
    tokio::fs::write(path, updated).await?;

    tracing::info!("Arquivo {} atualizado com o novo refresh token", path.display());
    Ok(())
}
