use clap::Parser;
use stackdb::config::Config;
use stackdb::{server, Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    server::run(config).await
}
