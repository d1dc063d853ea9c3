use std::sync::Arc;

use crate::{config::Config, error::Result, spotify};

pub async fn auth(config: Arc<Config>) -> Result<()> {
    spotify::auth::auth(config).await.map(|_| ())
}
