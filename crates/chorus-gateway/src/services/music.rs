use std::collections::BTreeMap;
use std::sync::Arc;

use chorus_core::error::{ChorusError, Result};
use chorus_core::protocol::Outbound;

use crate::compat::{clamp_score, CompatibilityEstimator};
use crate::realtime::{NowPlaying, RealtimeCtx};

/// Now-playing status, song sharing and compatibility scoring.
pub struct MusicService {
    estimator: Arc<dyn CompatibilityEstimator>,
}

fn anonymous() -> ChorusError {
    ChorusError::Internal("music event from anonymous connection".into())
}

impl MusicService {
    pub fn new(estimator: Arc<dyn CompatibilityEstimator>) -> Self {
        Self { estimator }
    }

    /// Overwrites the sender's status, then tells everyone.
    pub fn now_playing(&self, ctx: &mut RealtimeCtx<'_>, song: String, artist: String) -> Result<()> {
        let user = {
            let me = ctx.sender_mut().ok_or_else(anonymous)?;
            me.currently_playing = Some(NowPlaying {
                song: song.clone(),
                artist: artist.clone(),
            });
            me.display_name().to_string()
        };

        ctx.publish_all(&Outbound::NowPlaying { user, song, artist })?;
        Ok(())
    }

    pub fn share_song(
        &self,
        ctx: &mut RealtimeCtx<'_>,
        url: String,
        song: String,
        artist: String,
    ) -> Result<()> {
        let user = ctx
            .sender()
            .map(|u| u.display_name().to_string())
            .ok_or_else(anonymous)?;

        ctx.publish_all(&Outbound::SharedSong {
            user,
            song,
            artist,
            url,
        })?;
        Ok(())
    }

    /// Scores the sender against every other logged-in user, fresh each time,
    /// and replies to the sender only.
    pub fn music_profile(
        &self,
        ctx: &mut RealtimeCtx<'_>,
        top_artists: Option<Vec<String>>,
    ) -> Result<()> {
        if let Some(artists) = top_artists {
            ctx.sender_mut().ok_or_else(anonymous)?.music_profile = Some(artists);
        }

        let me = ctx.sender().ok_or_else(anonymous)?;
        let mut compatibility = BTreeMap::new();
        ctx.registry().for_each_except(ctx.conn().id(), |_, other| {
            let score = clamp_score(self.estimator.score(me, other));
            compatibility.insert(other.display_name().to_string(), score);
        });

        let out = Outbound::CompatibilityUpdate {
            user: me.display_name().to_string(),
            compatibility,
        };
        ctx.reply(&out)?;
        Ok(())
    }
}
