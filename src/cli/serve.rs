use tokio::io::{BufReader, stdin, stdout};
use tracing::info;

use crate::{
    config::Config,
    error::Result,
    mcp::McpServer,
    spotify::{SpotifyClient, http::HttpTransport},
};

pub async fn serve(config: &Config) -> Result<()> {
    let transport = HttpTransport::from_config(config).await?;
    let server = McpServer::new(SpotifyClient::new(transport));

    info!(api_url = %config.api_url, "starting spotify tool server");
    server.serve(BufReader::new(stdin()), stdout()).await
}
