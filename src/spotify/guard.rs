//! Device selection and the session guard around device-sensitive calls.

use std::future::Future;

use tracing::{debug, info};

use crate::{
    error::Result,
    spotify::transport::{ApiRequest, Credentials, Transport},
    types::{Device, RawDevices, decode},
};

/// Picks the device a playback command should target.
///
/// The first active device wins; otherwise the first listed device is the
/// candidate. Returns `None` for an empty list.
pub fn select_candidate(devices: &[Device]) -> Option<&Device> {
    devices
        .iter()
        .find(|d| d.is_active)
        .or_else(|| devices.first())
}

pub async fn fetch_devices<T: Transport>(transport: &T) -> Result<Vec<Device>> {
    let value = transport
        .send(ApiRequest::get("/me/player/devices"))
        .await?;
    Ok(decode::<RawDevices>(value)?
        .map(|d| d.devices)
        .unwrap_or_default())
}

/// Wraps an operation so it runs with valid auth and a usable device.
#[allow(async_fn_in_trait)]
pub trait Guard {
    /// Runs `operation`, passing the candidate device when no device is
    /// active, or `None` when one already is.
    async fn guard<R, F, Fut>(&self, operation: F) -> Result<R>
    where
        F: FnOnce(Option<Device>) -> Fut,
        Fut: Future<Output = Result<R>>;
}

/// Guard backed by the session's credentials and device list.
///
/// Every invocation re-checks both: token expiry first, because listing
/// devices needs a valid token, then device activity. A failed refresh ends
/// the invocation before anything else is sent.
pub struct SessionGuard<'a, S> {
    session: &'a S,
}

impl<'a, S> SessionGuard<'a, S>
where
    S: Transport + Credentials,
{
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    async fn ensure_auth(&self) -> Result<()> {
        if self.session.token_expired().await? {
            info!("access token expired, refreshing");
            self.session.refresh_token().await?;
        } else {
            debug!("access token valid");
        }
        Ok(())
    }

    async fn inject_device(&self) -> Result<Option<Device>> {
        let devices = fetch_devices(self.session).await?;
        if devices.iter().any(|d| d.is_active) {
            return Ok(None);
        }

        let candidate = select_candidate(&devices).cloned();
        match &candidate {
            Some(device) => info!(
                device = device.name.as_deref().unwrap_or("unknown"),
                "no active device, assigning candidate"
            ),
            None => info!("no devices available"),
        }
        Ok(candidate)
    }
}

impl<S> Guard for SessionGuard<'_, S>
where
    S: Transport + Credentials,
{
    async fn guard<R, F, Fut>(&self, operation: F) -> Result<R>
    where
        F: FnOnce(Option<Device>) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        self.ensure_auth().await?;
        let device = self.inject_device().await?;
        operation(device).await
    }
}
