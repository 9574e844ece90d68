use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Directory holding the HTML pages and the `static/` assets.
    pub static_dir: PathBuf,
    /// Take the client address from `X-Forwarded-For`. Only enable behind a
    /// proxy that overwrites the header.
    pub trust_proxy: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            db_path: PathBuf::from("./mossai.db"),
            static_dir: PathBuf::from("./public"),
            trust_proxy: false,
        }
    }
}
