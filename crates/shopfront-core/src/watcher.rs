//! Site settings polling
//!
//! A background task re-reads the settings on a fixed interval and
//! publishes them through a `watch` channel. Only changed values wake
//! subscribers; a failed poll keeps whatever was last published.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use shopfront_api::{ApiClient, ApiError, SiteSettings};

#[async_trait]
pub trait SettingsSource: Send + Sync + 'static {
    async fn fetch_settings(&self) -> Result<SiteSettings, ApiError>;
}

#[async_trait]
impl SettingsSource for ApiClient {
    async fn fetch_settings(&self) -> Result<SiteSettings, ApiError> {
        self.get_settings().await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PollControl {
    Continue,
    Cancel,
}

/// Handle to a running settings poll. Dropping it stops the poll.
pub struct SettingsWatch {
    control: watch::Sender<PollControl>,
    settings: watch::Receiver<Option<SiteSettings>>,
}

impl SettingsWatch {
    /// Start polling `source` every `period`, beginning immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        source: Arc<dyn SettingsSource>,
        period: Duration,
        initial: Option<SiteSettings>,
    ) -> Self {
        let (control_tx, control_rx) = watch::channel(PollControl::Continue);
        let (settings_tx, settings_rx) = watch::channel(initial);

        tokio::spawn(poll_loop(source, period, control_rx, settings_tx));

        tracing::debug!(period_secs = period.as_secs(), "Started settings watch");

        Self {
            control: control_tx,
            settings: settings_rx,
        }
    }

    /// Most recently published settings
    pub fn latest(&self) -> Option<SiteSettings> {
        self.settings.borrow().clone()
    }

    /// Wait for the next published change. Returns false once the poll
    /// has stopped.
    pub async fn changed(&mut self) -> bool {
        self.settings.changed().await.is_ok()
    }

    /// Independent receiver for another consumer
    pub fn subscribe(&self) -> watch::Receiver<Option<SiteSettings>> {
        self.settings.clone()
    }

    pub fn cancel(&self) {
        let _ = self.control.send(PollControl::Cancel);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.control.borrow() == PollControl::Cancel
    }
}

impl Drop for SettingsWatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_loop(
    source: Arc<dyn SettingsSource>,
    period: Duration,
    mut control: watch::Receiver<PollControl>,
    settings: watch::Sender<Option<SiteSettings>>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = control.changed() => {
                if cancelled(&mut control, changed) {
                    tracing::debug!("Settings watch cancelled");
                    return;
                }
            }
            _ = ticker.tick() => {
                // A slow request must not hold up cancellation
                let outcome = tokio::select! {
                    outcome = source.fetch_settings() => outcome,
                    changed = control.changed() => {
                        if cancelled(&mut control, changed) {
                            tracing::debug!("Settings watch cancelled during poll");
                            return;
                        }
                        continue;
                    }
                };

                match outcome {
                    Ok(fresh) => {
                        let published = settings.send_if_modified(|current| {
                            if current.as_ref() == Some(&fresh) {
                                false
                            } else {
                                *current = Some(fresh);
                                true
                            }
                        });
                        if published {
                            tracing::debug!("Site settings changed");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Settings poll failed; keeping last value");
                    }
                }
            }
        }
    }
}

fn cancelled(
    control: &mut watch::Receiver<PollControl>,
    changed: Result<(), watch::error::RecvError>,
) -> bool {
    changed.is_err() || *control.borrow_and_update() == PollControl::Cancel
}
