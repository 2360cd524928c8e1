use config::{Config, Environment};
use serde::Deserialize;

use super::error::SetsumeiError;

/// Параметры подключения к MySQL из ENV переменных (MYSQL_*)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MysqlConnection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub dbname: String,
}

impl MysqlConnection {
    pub fn from_env() -> Result<Self, SetsumeiError> {
        Self::from_source(Environment::with_prefix("MYSQL"))
    }

    /// `MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`, `MYSQL_PASS`, `MYSQL_DBNAME`
    pub fn from_source(env: Environment) -> Result<Self, SetsumeiError> {
        let settings = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3306)?
            .set_default("user", "isucon")?
            .set_default("pass", "isucon")?
            .set_default("dbname", "isuumo")?
            .add_source(env.try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Command-line arguments understood by the `mysql` client
    pub fn client_args(&self) -> Vec<String> {
        vec![
            format!("-h{}", self.host),
            format!("-P{}", self.port),
            format!("-u{}", self.user),
            format!("-p{}", self.pass),
            self.dbname.clone(),
        ]
    }

    /// Same as `client_args` with the password masked, for logs
    pub fn display_args(&self) -> String {
        format!(
            "-h{} -P{} -u{} -p*** {}",
            self.host, self.port, self.user, self.dbname
        )
    }
}
