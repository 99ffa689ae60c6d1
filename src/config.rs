use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TomatilloConfig {
    pub database: Option<String>,
    pub authority: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("tomatillo.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".tomatillo").join("tomatillo.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<TomatilloConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: TomatilloConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &TomatilloConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tomatillo.toml");

        let config = TomatilloConfig {
            database: Some("catalog.db".to_string()),
            authority: Some("org.example.provider".to_string()),
        };
        write_config(&path, &config, false).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("catalog.db"));
        assert_eq!(loaded.authority.as_deref(), Some("org.example.provider"));
    }

    #[test]
    fn test_write_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tomatillo.toml");

        write_config(&path, &TomatilloConfig::default(), false).unwrap();
        assert!(write_config(&path, &TomatilloConfig::default(), false).is_err());
        assert!(write_config(&path, &TomatilloConfig::default(), true).is_ok());
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());
    }
}
