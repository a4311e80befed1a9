use crate::error::ConfigError;

use serde::{de::DeserializeOwned, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::{fs, fs::File, io::AsyncWriteExt};

pub const APP_NAME: &str = "kidtube";

pub struct ConfigFileHandler<C> {
    config_type: std::marker::PhantomData<C>,
    path: PathBuf,
}

impl<C: Serialize + DeserializeOwned + Default> ConfigFileHandler<C> {
    pub async fn from_config_file(config_name: &str) -> Result<Self, ConfigError> {
        let dir = ensure_config_dir_exists().await?;
        Ok(Self::from_dir(&dir, config_name))
    }

    pub fn from_dir(dir: &Path, config_name: &str) -> Self {
        Self {
            config_type: std::marker::PhantomData,
            path: dir.join(format!("{}.toml", config_name)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config, writing the defaults first if the file doesn't exist yet.
    pub async fn read(&self) -> Result<C, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(error) => match error.kind() {
                io::ErrorKind::NotFound => {
                    let config = Default::default();
                    Self::write_to_path(&self.path, &config).await?;
                    Ok(config)
                }
                _ => Err(ConfigError::ReadConfigFile(error)),
            },
        }
    }

    async fn write_to_path(path: &Path, config: &C) -> Result<(), ConfigError> {
        let toml = toml::to_string(config)?;
        let mut file = File::create(path)
            .await
            .map_err(ConfigError::CreateConfigFile)?;
        file.write_all(toml.as_bytes())
            .await
            .map_err(ConfigError::WriteConfigFile)?;
        file.flush().await.map_err(ConfigError::WriteConfigFile)?;
        Ok(())
    }
}

pub async fn ensure_config_dir_exists() -> Result<PathBuf, ConfigError> {
    let dir = find_config_dir()?;
    fs::create_dir_all(&dir)
        .await
        .map_err(ConfigError::CreateConfigDir)?;

    Ok(dir)
}

fn find_config_dir() -> Result<PathBuf, ConfigError> {
    let mut path = PathBuf::new();

    match std::env::var("XDG_CONFIG_HOME") {
        Ok(config_dir) => path.push(config_dir),
        _ => {
            let home = std::env::var("HOME")?;
            path.push(home);
            path.push(".config");
        }
    }

    path.push(APP_NAME);
    Ok(path)
}
