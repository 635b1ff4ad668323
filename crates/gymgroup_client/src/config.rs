use crate::GymClientError;
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://www.thegymgroup.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub email: String,
    pub pin: SecretString,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, GymClientError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, GymClientError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let email = get("GYMGROUP_EMAIL")
            .ok_or_else(|| GymClientError::Config("GYMGROUP_EMAIL missing".into()))?;
        let pin = get("GYMGROUP_PIN")
            .ok_or_else(|| GymClientError::Config("GYMGROUP_PIN missing".into()))?;
        let base_url = get("GYMGROUP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Ok(Self {
            email,
            pin: SecretString::new(pin.into()),
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_pin() {
        let get = |k: &str| match k {
            "GYMGROUP_EMAIL" => Some("member@example.com".into()),
            _ => None,
        };
        let res = Config::from_env_with(get);
        assert!(res.is_err());
    }

    #[test]
    fn from_env_reads_values_and_defaults_base_url() {
        let get = |k: &str| match k {
            "GYMGROUP_EMAIL" => Some("member@example.com".into()),
            "GYMGROUP_PIN" => Some("12345678".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.email, "member@example.com");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn from_env_honours_base_url_override() {
        let get = |k: &str| match k {
            "GYMGROUP_EMAIL" => Some("member@example.com".into()),
            "GYMGROUP_PIN" => Some("12345678".into()),
            "GYMGROUP_BASE_URL" => Some("http://localhost".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost");
    }
}
