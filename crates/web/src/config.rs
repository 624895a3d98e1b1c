use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./resources/www/";

pub struct WebConfig {
    pub address: SocketAddr,
    /// Directory with the built frontend.
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl WebConfig {
    /// Reads `BIND_ADDRESS`, `PORT` and `STATIC_DIR`. Unset variables keep
    /// their defaults, `None` if a set variable can not be parsed.
    pub fn from_env() -> Option<Self> {
        let mut config = Self::default();
        if let Ok(address) = env::var("BIND_ADDRESS") {
            config.address.set_ip(address.parse().ok()?);
        }
        if let Ok(port) = env::var("PORT") {
            config.address.set_port(port.parse().ok()?);
        }
        if let Ok(static_dir) = env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(static_dir);
        }
        Some(config)
    }
}
