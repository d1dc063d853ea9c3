use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    projection::project_track,
    records::{PlaybackState, Queue, Track},
    spotify::{
        SpotifyClient,
        guard::{Guard, fetch_devices, select_candidate},
        target_device,
        transport::{ApiRequest, Credentials, Transport},
    },
    types::{Device, RawPlayback, RawQueue, decode},
    utils::track_uri,
};

impl<T> SpotifyClient<T>
where
    T: Transport + Credentials,
{
    /// The currently playing track, or `None` when nothing is playing or the
    /// playing item is not a track.
    pub async fn current_track(&self) -> Result<Option<Track>> {
        let value = self
            .call(
                "current_track",
                ApiRequest::get("/me/player/currently-playing"),
            )
            .await?;
        let Some(playback) = decode::<RawPlayback>(value)? else {
            return Ok(None);
        };

        let raw = playback.track_item()?;
        Ok(project_track(raw.as_ref(), false).map(|mut track| {
            track.is_playing = playback.is_playing;
            track
        }))
    }

    pub async fn playback_state(&self) -> Result<PlaybackState> {
        let value = self
            .call("playback_state", ApiRequest::get("/me/player"))
            .await?;
        let Some(playback) = decode::<RawPlayback>(value)? else {
            return Ok(PlaybackState::default());
        };

        let raw = playback.track_item()?;
        let track = project_track(raw.as_ref(), false).map(|mut track| {
            track.is_playing = playback.is_playing;
            track
        });

        Ok(PlaybackState {
            is_playing: playback.is_playing.unwrap_or(false),
            track,
            progress_ms: playback.progress_ms,
            volume_percent: playback.device.as_ref().and_then(|d| d.volume_percent),
            device: playback.device,
            shuffle_state: playback.shuffle_state,
            repeat_state: playback.repeat_state,
        })
    }

    pub async fn is_track_playing(&self) -> Result<bool> {
        Ok(self
            .current_track()
            .await?
            .is_some_and(|t| t.is_playing == Some(true)))
    }

    pub async fn devices(&self) -> Result<Vec<Device>> {
        fetch_devices(&self.transport)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list devices"))
    }

    pub async fn is_active_device(&self) -> Result<bool> {
        Ok(self.devices().await?.iter().any(|d| d.is_active))
    }

    pub async fn candidate_device(&self) -> Result<Option<Device>> {
        Ok(select_candidate(&self.devices().await?).cloned())
    }

    /// Starts playback of `track_id`, or resumes the paused track when no id
    /// is given.
    ///
    /// Resuming fails with [`Error::InvalidState`] when playback is already
    /// active or there is no current track to resume; in both cases no start
    /// call is sent.
    pub async fn start_playback(&self, track_id: Option<&str>, device: Option<&str>) -> Result<()> {
        self.session()
            .guard(|candidate| async move {
                let mut request = ApiRequest::put("/me/player/play")
                    .query_opt("device_id", target_device(device, candidate));

                match track_id {
                    Some(id) => {
                        request = request.json(serde_json::json!({ "uris": [track_uri(id)] }));
                    }
                    None => match self.current_track().await? {
                        Some(track) if track.is_playing == Some(true) => {
                            return Err(Error::invalid_state("playback already active"));
                        }
                        Some(_) => debug!("resuming current playback"),
                        None => {
                            return Err(Error::invalid_state(
                                "no track_id provided and no current playback to resume",
                            ));
                        }
                    },
                }

                self.call("start_playback", request).await?;
                info!(track_id, "playback started");
                Ok(())
            })
            .await
    }

    /// Pauses playback. Does nothing when nothing is playing.
    ///
    /// Episodes and ads count as playing, so the decision comes from the
    /// player state rather than the current track.
    pub async fn pause_playback(&self, device: Option<&str>) -> Result<()> {
        self.session()
            .guard(|candidate| async move {
                let value = self
                    .call("pause_playback", ApiRequest::get("/me/player"))
                    .await?;
                let playing = decode::<RawPlayback>(value)?
                    .and_then(|p| p.is_playing)
                    .unwrap_or(false);
                if !playing {
                    debug!("nothing playing, pause skipped");
                    return Ok(());
                }

                let request = ApiRequest::put("/me/player/pause")
                    .query_opt("device_id", target_device(device, candidate));
                self.call("pause_playback", request).await?;
                info!("playback paused");
                Ok(())
            })
            .await
    }

    pub async fn skip_track(&self, skips: u32) -> Result<()> {
        if skips == 0 {
            return Err(Error::invalid_argument("num_skips must be at least 1"));
        }

        self.session()
            .guard(|candidate| async move {
                let device = target_device(None, candidate);
                for _ in 0..skips {
                    let request =
                        ApiRequest::post("/me/player/next").query_opt("device_id", device.clone());
                    self.call("skip_track", request).await?;
                }
                info!(skips, "skipped tracks");
                Ok(())
            })
            .await
    }

    pub async fn previous_track(&self) -> Result<()> {
        self.session()
            .guard(|candidate| async move {
                let request = ApiRequest::post("/me/player/previous")
                    .query_opt("device_id", target_device(None, candidate));
                self.call("previous_track", request).await.map(|_| ())
            })
            .await
    }

    pub async fn seek_to_position(&self, position_ms: u64) -> Result<()> {
        self.session()
            .guard(|candidate| async move {
                let request = ApiRequest::put("/me/player/seek")
                    .query("position_ms", position_ms)
                    .query_opt("device_id", target_device(None, candidate));
                self.call("seek_to_position", request).await.map(|_| ())
            })
            .await
    }

    pub async fn set_volume(&self, volume_percent: u8) -> Result<()> {
        if volume_percent > 100 {
            return Err(Error::invalid_argument(format!(
                "volume must be between 0 and 100, got {volume_percent}"
            )));
        }

        self.session()
            .guard(|candidate| async move {
                let request = ApiRequest::put("/me/player/volume")
                    .query("volume_percent", volume_percent)
                    .query_opt("device_id", target_device(None, candidate));
                self.call("set_volume", request).await.map(|_| ())
            })
            .await
    }

    /// Appends a track to the queue. Accepts a bare id or a track URI.
    pub async fn add_to_queue(&self, track_id: &str, device: Option<&str>) -> Result<()> {
        self.session()
            .guard(|candidate| async move {
                let request = ApiRequest::post("/me/player/queue")
                    .query("uri", track_uri(track_id))
                    .query_opt("device_id", target_device(device, candidate));
                self.call("add_to_queue", request).await?;
                info!(track_id, "added to queue");
                Ok(())
            })
            .await
    }

    /// The upcoming queue, with the currently playing track looked up fresh
    /// rather than taken from the queue payload.
    pub async fn get_queue(&self) -> Result<Queue> {
        self.session()
            .guard(|_| async move {
                let value = self
                    .call("get_queue", ApiRequest::get("/me/player/queue"))
                    .await?;
                let Some(raw) = decode::<RawQueue>(value)? else {
                    return Ok(Queue::default());
                };

                let queue = raw
                    .queue
                    .iter()
                    .filter_map(|t| project_track(t.as_ref(), false))
                    .collect();

                Ok(Queue {
                    currently_playing: self.current_track().await?,
                    queue,
                })
            })
            .await
    }
}
