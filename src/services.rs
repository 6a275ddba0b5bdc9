use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::settings::Settings;

pub mod http;
pub mod pix;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid pix key: {0}")]
    InvalidKey(String),
    #[error("Invalid payload: {0}")]
    Payload(String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(settings: Settings) -> Result<(), anyhow::Error> {
    let (pix_tx, mut pix_rx) = mpsc::channel(512);

    let mut pix_service = pix::PixService::new();

    println!("[*] Starting Pix service.");
    let handler = pix::PixRequestHandler::new(
        settings.merchant.name,
        settings.merchant.city,
        settings.merchant.pix_key,
        settings.merchant.pix_key_type,
        settings.txid.prefix,
    )?;
    tokio::spawn(async move {
        pix_service.run(handler, &mut pix_rx).await;
    });

    println!("[*] Starting HTTP server.");
    http::start_http_server(&settings.server.host, settings.server.port, pix_tx).await?;

    Ok(())
}
