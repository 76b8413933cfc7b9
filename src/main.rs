use actix::Actor;
use anyhow::Result;
use log::info;
use tokio::io::{self, BufReader};

use pipeline_controller::{configs::ClientConfig, shell, Controller, HttpService};

#[actix_rt::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = ClientConfig::from_env();
    info!("training service at {}", config.base_url());

    let service = HttpService::new(config)?;
    let controller = Controller::new(service).start();

    shell::run(controller, BufReader::new(io::stdin()), io::stdout()).await?;
    info!("shell closed");
    Ok(())
}
