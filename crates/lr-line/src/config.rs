//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. line-relay.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lr_http::Timeout;

use crate::error::{LineError, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "line-relay.toml";

/// Default media upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "https://obs-sg.line-apps.com/talk/m/upload.nhn";

/// LINE talk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Access token sent as a bearer token
    #[serde(default)]
    pub access_token: String,

    /// Base URL of the talk RPC endpoint
    #[serde(default)]
    pub talk_url: String,

    /// Media upload endpoint
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory for staging downloaded media (OS temp dir when unset)
    pub staging_dir: Option<PathBuf>,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            talk_url: String::new(),
            upload_url: default_upload_url(),
            user_agent: default_user_agent(),
            staging_dir: None,
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Read timeout in seconds (also the connect timeout unless set)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: Option<f64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: None,
        }
    }
}

impl HttpConfig {
    /// Transport timeout described by this configuration
    pub fn timeout(&self) -> Result<Timeout> {
        let timeout = match self.connect_timeout_secs {
            Some(connect) => Timeout::split(connect, self.timeout_secs),
            None => Timeout::secs(self.timeout_secs),
        };
        timeout.map_err(|e| LineError::Config(e.to_string()))
    }
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_user_agent() -> String {
    format!("line-relay/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> f64 {
    lr_http::timeout::DEFAULT_TIMEOUT_SECS
}

/// Main configuration for line-relay
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub line: LineConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 文字列から設定を読み込む (環境変数展開あり、上書きなし)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        toml::from_str(&expanded)
            .map_err(|e| LineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// # 引数
    /// * `path` - TOML ファイルのパス
    ///
    /// ファイル読み込み後、環境変数で上書きします。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./line-relay.toml` があればそれを、なければ環境変数のみを使います。
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        Self::from_env()
    }

    /// 必須項目の検証
    pub fn validate(&self) -> Result<()> {
        if self.line.access_token.is_empty() {
            return Err(LineError::Config("LINE_ACCESS_TOKEN not set".to_string()));
        }
        if self.line.talk_url.is_empty() {
            return Err(LineError::Config("LINE_TALK_URL not set".to_string()));
        }
        if self.line.upload_url.is_empty() {
            return Err(LineError::Config("upload_url must not be empty".to_string()));
        }
        self.http.timeout()?;
        Ok(())
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("LINE_ACCESS_TOKEN") {
            self.line.access_token = token;
        }
        if let Ok(url) = std::env::var("LINE_TALK_URL") {
            if !url.is_empty() {
                self.line.talk_url = url;
            }
        }
        if let Ok(url) = std::env::var("LINE_UPLOAD_URL") {
            if !url.is_empty() {
                self.line.upload_url = url;
            }
        }
        if let Ok(agent) = std::env::var("LINE_USER_AGENT") {
            if !agent.is_empty() {
                self.line.user_agent = agent;
            }
        }
        if let Ok(dir) = std::env::var("LINE_STAGING_DIR") {
            if !dir.is_empty() {
                self.line.staging_dir = Some(PathBuf::from(dir));
            }
        }

        // 数値として解釈できない値は無視する
        if let Some(secs) = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.http.timeout_secs = secs;
        }
        if let Some(secs) = std::env::var("HTTP_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.http.connect_timeout_secs = Some(secs);
        }
    }
}
