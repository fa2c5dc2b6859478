//! Conversion configuration.

use ironorchestra_openapi::DEFAULT_DOCS_BASE_URL;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default Orchestra repository file, relative to the working directory.
pub const DEFAULT_INPUT: &str = "OrchestraFIXLatest.xml";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "./fix-fields.yml";

/// Environment variable overriding the input file.
pub const INPUT_ENV: &str = "IRONORCHESTRA_INPUT";

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Orchestra repository to read.
    pub input: PathBuf,
    /// YAML file to write.
    pub output: PathBuf,
    /// Base URL for `externalDocs` links.
    pub docs_base_url: String,
}

impl ConvertConfig {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }

    /// Default settings with the input taken from [`INPUT_ENV`] when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder().input_from_env().build()
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ConvertConfig`].
#[derive(Debug, Clone)]
pub struct ConvertConfigBuilder {
    input: PathBuf,
    output: PathBuf,
    docs_base_url: String,
}

impl ConvertConfigBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            docs_base_url: DEFAULT_DOCS_BASE_URL.to_string(),
        }
    }

    /// Sets the input file.
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Sets the output file.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Sets the documentation base URL.
    #[must_use]
    pub fn docs_base_url(mut self, url: impl Into<String>) -> Self {
        self.docs_base_url = url.into();
        self
    }

    /// Applies the [`INPUT_ENV`] override, if present.
    #[must_use]
    pub fn input_from_env(self) -> Self {
        self.input_override(std::env::var_os(INPUT_ENV))
    }

    /// Applies an input override; empty values are ignored.
    #[must_use]
    pub fn input_override(self, value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => self.input(path),
            _ => self,
        }
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ConvertConfig {
        ConvertConfig {
            input: self.input,
            output: self.output,
            docs_base_url: self.docs_base_url,
        }
    }
}

impl Default for ConvertConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
