use crate::domain::model::{Credential, DEFAULT_SERVER};
use crate::utils::error::{ConnectorError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_server")]
    pub server: String,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub continue_on_fail: bool,
}

impl ProfileConfig {
    /// 從 TOML 檔案載入連線設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConnectorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析連線設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConnectorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JDY_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn credential(&self) -> Credential {
        Credential::new(
            self.connection.server.clone(),
            self.connection.api_key.clone(),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout_seconds.unwrap_or(30))
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        self.credential().validate()
    }
}
