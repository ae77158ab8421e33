use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{validate_bind_address, validate_path, Validate};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard")]
#[command(about = "JSON API over the daily forecast outputs")]
pub struct DashboardConfig {
    /// Bind address; defaults to loopback only
    #[arg(long = "server.address", default_value = "127.0.0.1")]
    pub server_address: String,

    /// TCP port to bind
    #[arg(long = "server.port", default_value = "8501")]
    pub server_port: u16,

    /// Directory holding forecast_results.csv and the per-coin data files
    #[arg(long, default_value = "./output")]
    pub data_dir: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl DashboardConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr =
            self.server_address
                .parse()
                .map_err(|e| ForecastError::InvalidConfigValueError {
                    field: "server.address".to_string(),
                    value: self.server_address.clone(),
                    reason: format!("Invalid IP address: {}", e),
                })?;
        Ok(SocketAddr::new(ip, self.server_port))
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validate_bind_address("server.address", &self.server_address)?;
        validate_path("data_dir", &self.data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_loopback() {
        let config = DashboardConfig::try_parse_from(["dashboard"]).unwrap();
        assert_eq!(config.server_address, "127.0.0.1");
        assert_eq!(config.server_port, 8501);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8501".parse().unwrap()
        );
    }

    #[test]
    fn test_accepts_dotted_server_flags() {
        let config = DashboardConfig::try_parse_from([
            "dashboard",
            "--server.address",
            "0.0.0.0",
            "--server.port",
            "9000",
        ])
        .unwrap();
        assert_eq!(config.server_address, "0.0.0.0");
        assert_eq!(config.server_port, 9000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr_rejects_hostnames() {
        let config =
            DashboardConfig::try_parse_from(["dashboard", "--server.address", "example.com"])
                .unwrap();
        assert!(config.socket_addr().is_err());
        assert!(config.validate().is_err());
    }
}
