use crate::admin::{AdminConnection, AdminError, AdminResult};

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cms_config::ConnectionConfig;
use error_location::ErrorLocation;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const ENDPOINT_PING: &str = "/admin/api/ping";
const ENDPOINT_RUN_LEVEL: &str = "/admin/api/runlevel";
const ENDPOINT_STOP: &str = "/admin/api/stop";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct RunLevelResponse {
    level: u8,
}

/// Admin connection over the server's HTTP admin API.
///
/// Keeps a local connected latch mirroring the server-side session: connect
/// probes the server and sets it, disconnect only clears it. A cleared latch
/// lets `is_connected` answer without touching the network, which is what
/// makes the shutdown sequencer observe its own disconnect immediately.
pub struct HttpAdminClient {
    base_url: String,
    user: String,
    password: String,
    client: Client,
    connected: AtomicBool,
}

impl HttpAdminClient {
    pub fn new(config: &ConnectionConfig) -> AdminResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
            client,
            connected: AtomicBool::new(false),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// One authenticated round trip to the ping endpoint.
    async fn probe(&self) -> AdminResult<()> {
        let response = self
            .client
            .get(self.url(ENDPOINT_PING))
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: String::from(ENDPOINT_PING),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl AdminConnection for HttpAdminClient {
    async fn connect(&self) -> AdminResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            debug!("Connection to {} already established", self.base_url);
            return Ok(());
        }

        self.probe().await?;
        self.connected.store(true, Ordering::SeqCst);
        debug!("Connection to {} established", self.base_url);

        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.probe().await.is_ok()
    }

    async fn run_level(&self) -> AdminResult<u8> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AdminError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let response = self
            .client
            .get(self.url(ENDPOINT_RUN_LEVEL))
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: String::from(ENDPOINT_RUN_LEVEL),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let body: RunLevelResponse = response.json().await?;

        Ok(body.level)
    }

    async fn stop_server(&self) -> AdminResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AdminError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let result = self
            .client
            .post(self.url(ENDPOINT_STOP))
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            // A server that honors the stop request may tear the connection
            // down mid-response; that is the expected way for this call to
            // fail.
            Err(e) => {
                debug!("Stop request did not complete cleanly: {e}");
                return Err(AdminError::ConnectionSevered {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: String::from(ENDPOINT_STOP),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!("Connection to {} released", self.base_url);
    }
}
