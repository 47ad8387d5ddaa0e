use env_logger::Env;
use log::error;

use mandeltiles::config::ServerConfig;
use mandeltiles::server::{router, Server};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration failure: {}", e);
            std::process::exit(1);
        }
    };

    let server = Server::new(config.port, router(config));
    if let Err(e) = server.run().await {
        error!("could not start server: {}", e);
        std::process::exit(1);
    }
}
