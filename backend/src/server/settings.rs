//! Application settings loaded via OrthoConfig.
//!
//! Every key can come from a `--flag`, a `DOCVAULT_*` environment variable,
//! or a config file, in that order of precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use docvault::domain::UploadPolicy;
use ortho_config::OrthoConfig;
use serde::Deserialize;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf"];
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("max_upload_bytes must be greater than zero")]
    ZeroUploadLimit,
    #[error("allowed_extensions must name at least one extension")]
    NoAllowedExtensions,
}

/// Runtime settings for the DocVault server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DOCVAULT")]
pub struct AppSettings {
    /// PostgreSQL connection URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Directory receiving raw uploads.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted upload, in bytes.
    #[ortho_config(default = 52_428_800)]
    pub max_upload_bytes: usize,
    /// Accepted extensions; the environment takes a comma-separated list.
    #[serde(default, deserialize_with = "extension_list")]
    pub allowed_extensions: Option<Vec<String>>,
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
}

/// A single value arrives as a string, several as a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn extension_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(list) => list.split(',').map(str::to_owned).collect(),
        OneOrMany::Many(items) => items
            .iter()
            .flat_map(|item| item.split(','))
            .map(str::to_owned)
            .collect(),
    }))
}

impl AppSettings {
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn max_upload_bytes(&self) -> Result<usize, SettingsError> {
        if self.max_upload_bytes == 0 {
            return Err(SettingsError::ZeroUploadLimit);
        }
        Ok(self.max_upload_bytes)
    }

    pub fn upload_policy(&self) -> Result<UploadPolicy, SettingsError> {
        let policy = match &self.allowed_extensions {
            Some(extensions) => UploadPolicy::new(extensions),
            None => UploadPolicy::new(DEFAULT_ALLOWED_EXTENSIONS),
        };
        if policy.allowed_extensions().next().is_none() {
            return Err(SettingsError::NoAllowedExtensions);
        }
        Ok(policy)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 5] = [
        "DOCVAULT_DATABASE_URL",
        "DOCVAULT_UPLOAD_DIR",
        "DOCVAULT_MAX_UPLOAD_BYTES",
        "DOCVAULT_ALLOWED_EXTENSIONS",
        "DOCVAULT_BIND_ADDR",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("docvault")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.upload_dir(), PathBuf::from("uploads"));
        assert_eq!(settings.max_upload_bytes().expect("limit"), DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(
            settings
                .upload_policy()
                .expect("policy")
                .allowed_extensions()
                .collect::<Vec<_>>(),
            vec!["pdf"]
        );
        assert_eq!(
            settings.bind_addr().expect("addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal addr")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "DOCVAULT_DATABASE_URL",
                Some("postgres://localhost/docvault".to_owned()),
            ),
            ("DOCVAULT_UPLOAD_DIR", Some("/srv/uploads".to_owned())),
            ("DOCVAULT_MAX_UPLOAD_BYTES", Some("1024".to_owned())),
            ("DOCVAULT_ALLOWED_EXTENSIONS", Some("pdf, PDFA".to_owned())),
            ("DOCVAULT_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/docvault")
        );
        assert_eq!(settings.upload_dir(), PathBuf::from("/srv/uploads"));
        assert_eq!(settings.max_upload_bytes().expect("limit"), 1024);
        assert!(settings.upload_policy().expect("policy").allows("scan.pdfa"));
        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
    }

    #[rstest]
    #[case("pdf", vec!["pdf"])]
    #[case("PDF,txt", vec!["pdf", "txt"])]
    fn single_and_listed_extensions_load(#[case] raw: &str, #[case] expected: Vec<&str>) {
        let _guard = lock_env(KEYS.map(|key| {
            let value = (key == "DOCVAULT_ALLOWED_EXTENSIONS").then(|| raw.to_owned());
            (key, value)
        }));

        let policy = load_from_empty_args().upload_policy().expect("policy");
        assert_eq!(policy.allowed_extensions().collect::<Vec<_>>(), expected);
    }

    #[rstest]
    #[case(0, None, None)]
    #[case(1024, Some(vec![" ".to_owned(), String::new()]), None)]
    #[case(1024, None, Some("not an address"))]
    fn invalid_values_are_rejected(
        #[case] max_upload_bytes: usize,
        #[case] allowed_extensions: Option<Vec<String>>,
        #[case] bind_addr: Option<&str>,
    ) {
        let settings = AppSettings {
            database_url: None,
            upload_dir: None,
            max_upload_bytes,
            allowed_extensions,
            bind_addr: bind_addr.map(str::to_owned),
        };
        let failed = settings.max_upload_bytes().is_err()
            || settings.upload_policy().is_err()
            || settings.bind_addr().is_err();
        assert!(failed);
    }
}
