use serde::Deserialize;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: SecretString,
    #[serde(default)]
    pub redis_url: Option<SecretString>,
}

impl RedisSettings {
    pub fn get_redis_url(&self) -> SecretString {
        match &self.redis_url {
            Some(url) => url.clone(),
            None if self.password.expose_secret().is_empty() => {
                SecretString::new(format!("redis://{}:{}", self.host, self.port).into_boxed_str())
            }
            None => SecretString::new(
                format!("redis://:{}@{}:{}", self.password.expose_secret(), self.host, self.port).into_boxed_str(),
            ),
        }
    }
}
