//! ngrok tunnel exposing the local server, used to test webhooks.
//!
//! The tunnel runs in process: an ngrok session is opened with the configured
//! auth token and an HTTP endpoint forwards to this server. Traffic stops
//! when the [`Tunnel`] is dropped.

use crate::config::AppConfig;
use anyhow::{Context, bail};
use ngrok::{
    Session,
    forwarder::Forwarder,
    prelude::*,
    tunnel::HttpTunnel,
};
use url::Url;

/// Running ngrok tunnel
pub struct Tunnel {
    pub public_url: String,
    _forwarder: Forwarder<HttpTunnel>,
    _session: Session,
}

/// Address ngrok forwards the public traffic to
fn forward_url(app_config: &AppConfig) -> anyhow::Result<Url> {
    Url::parse(&app_config.local_url()).context("invalid local server url")
}

/// Starts the tunnel if enabled in the config.
///
/// # Errors
/// Fails if the tunnel is enabled without an auth token, or if the ngrok
/// session or endpoint cannot be established.
pub async fn start(app_config: &AppConfig) -> anyhow::Result<Option<Tunnel>> {
    if !app_config.tunnel_enabled() {
        log::info!("ngrok is disabled");
        return Ok(None);
    }

    if app_config.ngrok_authtoken.is_empty() {
        bail!("NGROK_AUTHTOKEN is required when NGROK_AUTOSTART is true");
    }

    let to_url = forward_url(app_config)?;

    let session = Session::builder()
        .authtoken(app_config.ngrok_authtoken.clone())
        .connect()
        .await
        .context("failed to open ngrok session")?;

    let mut endpoint = session.http_endpoint();
    if !app_config.ngrok_domain.is_empty() {
        endpoint.domain(app_config.ngrok_domain.clone());
    }

    let forwarder = endpoint
        .listen_and_forward(to_url)
        .await
        .context("failed to start ngrok endpoint")?;

    let public_url = forwarder.url().to_string();
    log::info!("ngrok tunnel established at: {public_url}");

    Ok(Some(Tunnel {
        public_url,
        _forwarder: forwarder,
        _session: session,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_from;

    #[test]
    fn test_forward_url_targets_own_port() {
        let app_config = config_from(&[("WEB_SERVER_PORT", "8080")]);

        let url = forward_url(&app_config).unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/");
        assert_eq!(url.port(), Some(8080));
    }

    #[ntex::test]
    async fn test_start_disabled() {
        let app_config = config_from(&[]);
        assert!(start(&app_config).await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_start_requires_authtoken() {
        let app_config = config_from(&[("NGROK_AUTOSTART", "true")]);

        let err = start(&app_config).await.err().unwrap();

        assert!(err.to_string().contains("NGROK_AUTHTOKEN is required"));
    }
}
