//! Posting a random target photo.

mod compose;
mod twitter;

pub use compose::{base58, compose_message, short_url};
pub use twitter::TwitterClient;

use crate::cache::ImageCache;
use crate::error::{Error, Result};
use crate::record::{PhotoRecord, RecordKey, RecordPatch, is_safe};
use crate::store::{DocumentStore, Filter, Query};
use crate::utils::date::cooldown_cutoff;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

/// Social posting service.
#[allow(async_fn_in_trait)]
pub trait Poster {
    /// Upload an image and return its media id.
    async fn upload_media(&self, image: Vec<u8>, file_name: &str) -> Result<String>;

    /// Publish `text` with the uploaded media and return the server time.
    async fn publish(&self, text: &str, media_id: &str) -> Result<DateTime<Utc>>;

    /// Upload then publish.
    async fn post_photo(&self, text: &str, image: Vec<u8>, file_name: &str) -> Result<DateTime<Utc>> {
        let media_id = self.upload_media(image, file_name).await?;
        self.publish(text, &media_id).await
    }
}

/// Settings for a posting run.
#[derive(Debug, Clone)]
pub struct PostSettings {
    /// Hashtag appended to the message.
    pub hashtag: String,
    /// Months before a photo may be posted again.
    pub cooldown_months: u32,
    /// Message length limit in characters.
    pub max_chars: usize,
    /// Compose the message but do not post or update the store.
    pub dry_run: bool,
}

/// What a posting run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The photo was posted and its record updated.
    Posted {
        /// Posted record.
        key: RecordKey,
        /// Message text.
        message: String,
        /// Server-assigned post time.
        posted_at: DateTime<Utc>,
    },
    /// Dry run: the photo that would have been posted.
    DryRun {
        /// Selected record.
        key: RecordKey,
        /// Message text.
        message: String,
    },
}

/// Message for `record`.
pub fn message_for(record: &PhotoRecord, settings: &PostSettings) -> Result<String> {
    let link = short_url(&record.source_id)?;
    Ok(compose_message(
        &record.title,
        &record.owner_name,
        &link,
        &settings.hashtag,
        settings.max_chars,
    ))
}

/// Post one random target photo whose cooldown has passed.
///
/// Candidates are tried in random order. A candidate is skipped when it is
/// missing, has no safety scores, fails the safety gate, has no valid short
/// link, or its image cannot be fetched. Returns [`Error::NothingToPost`] when no candidate remains.
pub async fn post_random<P, S>(
    poster: &P,
    store: &S,
    cache: &ImageCache,
    settings: &PostSettings,
    now: DateTime<Utc>,
) -> Result<PostOutcome>
where
    P: Poster,
    S: DocumentStore,
{
    let cutoff = cooldown_cutoff(now, settings.cooldown_months);
    info!(
        "Retrieving target photos last posted before {}",
        cutoff.format("%Y-%m-%d")
    );
    let mut keys = store
        .query_keys(
            &Query::photos()
                .filter(Filter::Target(true))
                .filter(Filter::PostedAtOrBefore(cutoff)),
        )
        .await?;
    info!("{} candidate(s)", keys.len());
    keys.shuffle(&mut rand::thread_rng());

    for key in keys {
        let Some(record) = store.get(&key).await? else {
            warn!("{} disappeared from the store", key);
            continue;
        };

        match &record.safety {
            Some(scores) if is_safe(scores) => {}
            Some(scores) => {
                info!("Skipping {}: flagged {:?}", key, scores.flagged());
                continue;
            }
            None => {
                info!("Skipping {}: no safety scores", key);
                continue;
            }
        }

        let message = match message_for(&record, settings) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping {}: {}", key, e);
                continue;
            }
        };
        let path = match cache.fetch(&record.download_url, &record.key.name).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping {}: {}", key, e);
                continue;
            }
        };

        if settings.dry_run {
            return Ok(PostOutcome::DryRun { key, message });
        }

        info!("Posting {}", key);
        debug!("{}", message);
        let image = tokio::fs::read(&path).await?;
        let file_name = format!("{}.jpg", record.key.name);
        let posted_at = poster.post_photo(&message, image, &file_name).await?;

        let patch = RecordPatch {
            last_posted: Some(posted_at),
            ..RecordPatch::default()
        };
        store.update(&key, &patch).await?;
        return Ok(PostOutcome::Posted {
            key,
            message,
            posted_at,
        });
    }

    Err(Error::NothingToPost)
}
