//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the
//! resolved configuration used to build the client and session.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the wayfarer-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the travel-planning API.
    #[arrrg(optional, "Base URL of the API (default: http://0.0.0.0:8081/api/v1)", "URL")]
    pub api_url: Option<String>,

    /// Chat id to resume.
    #[arrrg(optional, "Chat id to resume (default: a fresh chat)", "ID")]
    pub chat_id: Option<String>,

    /// File to persist session tokens between runs.
    #[arrrg(optional, "File to persist session tokens between runs", "PATH")]
    pub session_file: Option<String>,

    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "PATH")]
    pub config: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// The subset of the configuration that may come from a YAML file.
#[derive(Debug, Default, Deserialize)]
struct ChatConfigFile {
    api_url: Option<String>,
    chat_id: Option<String>,
    session_file: Option<PathBuf>,
    timeout_secs: Option<u64>,
    no_color: Option<bool>,
}

/// Resolved configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the travel-planning API. `None` uses the client
    /// default (or the `WAYFARER_API_URL` environment variable).
    pub api_url: Option<String>,

    /// Chat id to resume, if any.
    pub chat_id: Option<String>,

    /// File used to persist session tokens, if any.
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            api_url: None,
            chat_id: None,
            session_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_color: true,
        }
    }

    /// Sets the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the chat id to resume.
    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Sets the session persistence file.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads configuration from a YAML file, using defaults for any
    /// field the file omits.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open config file", err))?;
        let reader = BufReader::new(file);
        let file: ChatConfigFile = serde_yaml::from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse config file", Some(Box::new(err)))
        })?;
        Ok(Self::new().merge(file))
    }

    fn merge(mut self, file: ChatConfigFile) -> Self {
        if file.api_url.is_some() {
            self.api_url = file.api_url;
        }
        if file.chat_id.is_some() {
            self.chat_id = file.chat_id;
        }
        if file.session_file.is_some() {
            self.session_file = file.session_file;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(no_color) = file.no_color {
            self.use_color = !no_color;
        }
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    /// Resolves arguments into a configuration. A `--config` file is
    /// loaded first; explicit flags override its values.
    fn try_from(args: ChatArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => ChatConfig::load(path)?,
            None => ChatConfig::new(),
        };
        if args.api_url.is_some() {
            config.api_url = args.api_url;
        }
        if args.chat_id.is_some() {
            config.chat_id = args.chat_id;
        }
        if let Some(session_file) = args.session_file {
            config.session_file = Some(PathBuf::from(session_file));
        }
        if args.no_color {
            config.use_color = false;
        }
        Ok(config)
    }
}
