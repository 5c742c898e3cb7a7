use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// TCP port the HTTP server listens on
    pub port: u16,
    /// Path to the SQLite database file
    pub dbfile: String,
    /// Directory served as static files at `/`
    pub web_dir: PathBuf,
    /// Shared secret for sign-in; authentication is off when unset or empty
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7540,
            dbfile: "scheduler.db".to_string(),
            web_dir: PathBuf::from("./web"),
            password: None,
        }
    }
}

impl Config {
    /// Loads defaults, then the TOML file, then `TODO_*` environment variables.
    pub fn load(config_file: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("TODO_"))
            .extract()
    }

    /// The configured secret, treating an empty value as no secret.
    pub fn secret(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Environment values such as `TODO_PASSWORD=1234` arrive as numbers; keep
/// them as the literal text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = Config::load(Path::new("missing.toml"))?;
            assert_eq!(config, Config::default());
            assert_eq!(config.secret(), None);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                r#"
                port = 8080
                dbfile = "from-file.db"
                "#,
            )?;
            jail.set_env("TODO_DBFILE", "/tmp/from-env.db");
            jail.set_env("TODO_WEB_DIR", "public");

            let config = Config::load(Path::new("config.toml"))?;
            assert_eq!(config.port, 8080);
            assert_eq!(config.dbfile, "/tmp/from-env.db");
            assert_eq!(config.web_dir, PathBuf::from("public"));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_password_from_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("TODO_PASSWORD", "12345");
            jail.set_env("TODO_PORT", "9000");

            let config = Config::load(Path::new("missing.toml"))?;
            assert_eq!(config.secret(), Some("12345"));
            assert_eq!(config.port, 9000);
            Ok(())
        });
    }

    #[test]
    fn test_empty_password_disables_auth() {
        let config = Config {
            password: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(config.secret(), None);
    }
}
