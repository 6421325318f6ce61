use portero::AllowListEntry;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub allow_list: Vec<AllowListEntry>,
    pub trusted_hops: usize,
    pub forwarded_header: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{
        providers::{Format, Toml},
        Figment,
    };

    #[test]
    fn default_config_extracts() {
        let config = Figment::new()
            .merge(Toml::string(include_str!("./default.toml")))
            .extract::<Config>()
            .unwrap();
        assert_eq!(config.trusted_hops, 1);
        assert_eq!(config.forwarded_header, "x-forwarded-for");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.allow_list.len(), 3);
    }

    #[test]
    fn bad_allow_list_entry_is_a_load_error() {
        let result = Figment::new()
            .merge(Toml::string(
                r#"
                listen_addr = "0.0.0.0:3000"
                allow_list = ["10.0.0.0/33"]
                trusted_hops = 1
                forwarded_header = "x-forwarded-for"
                request_timeout = "10s"
                "#,
            ))
            .extract::<Config>();
        assert!(result.is_err());
    }
}
