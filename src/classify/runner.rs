//! Classification of stored records.

use super::crop::CropBox;
use super::decision::{Decision, LocalizedObject, Observation, TargetTerms, decide};
use crate::cache::ImageCache;
use crate::constants::MAX_BATCH_WRITE;
use crate::error::{Error, Result};
use crate::output::progress;
use crate::record::{PhotoRecord, pick_url};
use crate::store::{DocumentStore, Filter, Query};
use crate::vision::{Detector, Feature};
use image::GenericImageView;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Settings for a classification run.
#[derive(Debug, Clone)]
pub struct ClassifySettings {
    /// Category words that make a photo a target.
    pub targets: TargetTerms,
    /// Byte budget for the stored label list.
    pub label_byte_budget: usize,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    /// Records that reached a decision.
    pub classified: usize,
    /// Of those, records without a target.
    pub negatives: usize,
    /// Records left unclassified after an error.
    pub unclassified: usize,
}

/// Classify the image at `image_path` and record the outcome on `record`.
///
/// Any error before a decision is reached (unreadable image, failed first
/// detection request) is returned and `record` is left untouched.
pub async fn classify_record<D: Detector>(
    detector: &D,
    record: &mut PhotoRecord,
    image_path: &Path,
    settings: &ClassifySettings,
) -> Result<Decision> {
    let bytes = tokio::fs::read(image_path).await?;
    let image = image::load_from_memory(&bytes).map_err(|e| Error::ImageDecode {
        path: image_path.to_path_buf(),
        source: e,
    })?;
    let (width, height) = image.dimensions();

    let annotations = detector
        .annotate(&bytes, &[Feature::Labels, Feature::Objects, Feature::SafeSearch])
        .await?;
    debug!(
        "{}: {} labels, {} objects",
        record.key.name,
        annotations.labels.len(),
        annotations.objects.len()
    );

    let observation = Observation {
        labels: annotations.labels,
        objects: annotations
            .objects
            .into_iter()
            .map(|o| LocalizedObject {
                crop: CropBox::from_normalized(&o.vertices, width, height),
                name: o.name,
                score: o.score,
            })
            .collect(),
    };

    let decision = decide(detector, &image, &observation, &settings.targets).await;
    record.mark_classified(
        decision.is_target,
        &decision.labels,
        settings.label_byte_budget,
    );
    record.safety = annotations.safety;

    Ok(decision)
}

/// Classify every unclassified photo in the store.
///
/// Per-record failures are logged and counted; only the initial query can
/// fail the run. Classified records are written with
/// [`DocumentStore::put_many`] every [`MAX_BATCH_WRITE`] records and once at
/// the end.
pub async fn classify_pending<D, S>(
    detector: &D,
    store: &S,
    cache: &ImageCache,
    settings: &ClassifySettings,
    show_progress: bool,
) -> Result<ClassifySummary>
where
    D: Detector,
    S: DocumentStore,
{
    let pending = store
        .query(&Query::photos().filter(Filter::Classified(false)))
        .await?;
    info!("Found {} unclassified photo(s)", pending.len());

    let mut summary = ClassifySummary::default();
    let mut decided: Vec<(PhotoRecord, bool)> = Vec::new();
    let pb = progress::create_record_progress(pending.len(), "photos", show_progress);

    for mut record in pending {
        match classify_one(detector, cache, &mut record, settings).await {
            Ok(decision) => {
                decided.push((record, decision.is_target));
                if decided.len() >= MAX_BATCH_WRITE {
                    store_decided(store, &mut decided, &mut summary).await;
                }
            }
            Err(e) => {
                warn!("Leaving {} unclassified: {}", record.key.name, e);
                summary.unclassified += 1;
            }
        }
        progress::inc_progress(pb.as_ref());
    }
    store_decided(store, &mut decided, &mut summary).await;

    progress::finish_progress(pb, "done");
    info!(
        "Classified {} photo(s), {} negative, {} left unclassified",
        summary.classified, summary.negatives, summary.unclassified
    );
    Ok(summary)
}

/// Write a batch of classified records and count the outcome.
///
/// A failed write leaves the whole batch unclassified for the next run.
async fn store_decided<S: DocumentStore>(
    store: &S,
    decided: &mut Vec<(PhotoRecord, bool)>,
    summary: &mut ClassifySummary,
) {
    if decided.is_empty() {
        return;
    }
    let (records, targets): (Vec<PhotoRecord>, Vec<bool>) = decided.drain(..).unzip();

    match store.put_many(&records).await {
        Ok(()) => {
            debug!("Stored {} classified record(s)", records.len());
            summary.classified += records.len();
            summary.negatives += targets.iter().filter(|is_target| !**is_target).count();
        }
        Err(e) => {
            error!("Failed to store {} classified record(s): {}", records.len(), e);
            summary.unclassified += records.len();
        }
    }
}

async fn classify_one<D: Detector>(
    detector: &D,
    cache: &ImageCache,
    record: &mut PhotoRecord,
    settings: &ClassifySettings,
) -> Result<Decision> {
    let url = if record.download_url.is_empty() {
        pick_url(&record.key.name, &record.urls)?
    } else {
        record.download_url.clone()
    };
    let path = cache.fetch(&url, &record.key.name).await?;

    let decision = classify_record(detector, record, &path, settings).await?;
    if decision.is_target {
        info!("{} is a target", record.key.name);
    } else {
        debug!("{} is not a target", record.key.name);
        if let Err(e) = cache.quarantine(&path).await {
            warn!("Could not move {} aside: {}", path.display(), e);
        }
    }
    Ok(decision)
}
