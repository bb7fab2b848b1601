//! # Encode / Decode Pipeline
//!
//! Drives the framer, planner, encoder and decoder end to end.
//!
//! ```text
//! encode: Idle -> Framed -> Planned -> Embedding(1..n) -> Done
//!                              \-> Error (capacity)
//! decode: Idle -> Extracted -> Parsed -> Done
//!                                \-> Error (format / truncation)
//! ```
//!
//! Planning always finishes before any carrier is touched, so a capacity failure
//! produces no output at all. The concurrent variants hand each carrier to a blocking
//! worker, bounded by a semaphore, and put results back in carrier order.

use image::RgbImage;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::decoder::{self, Extraction};
use super::{bitcodec, encoder, framer, planner};
use crate::common::error::{Result, StegoError};

/// Byte capacity of each carrier, in order.
pub fn capacities(carriers: &[RgbImage]) -> Vec<usize> {
    carriers
        .iter()
        .map(|c| bitcodec::capacity(c.width(), c.height()))
        .collect()
}

/// Hide `hidden` images across `carriers`.
///
/// Returns one encoded image per carrier, same order and dimensions. Carriers that
/// receive no data are returned unchanged.
///
/// # Errors
/// - [`StegoError::Format`] if a hidden image is empty
/// - [`StegoError::Capacity`] if the carriers cannot hold the framed stream
pub fn encode(carriers: &[RgbImage], hidden: &[RgbImage]) -> Result<Vec<RgbImage>> {
    let stream = framer::serialize(hidden)?;
    debug!("Framed: {} bytes for {} hidden image(s)", stream.len(), hidden.len());

    let chunks = planner::split(&stream, &capacities(carriers))?;
    debug!("Planned: {} chunk(s)", chunks.len());

    let encoded = chunks
        .iter()
        .zip(carriers)
        .map(|(chunk, carrier)| {
            debug!("Embedding carrier {}: {} bytes", chunk.carrier + 1, chunk.len());
            encoder::embed(chunk.carrier, carrier, chunk.bytes, chunk.terminal)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Encoded {} hidden image(s) ({} bytes) into {} carrier(s)",
        hidden.len(),
        stream.len(),
        carriers.len()
    );
    Ok(encoded)
}

/// Recover hidden images from encoded carriers given in their original order.
///
/// # Errors
/// [`StegoError::Format`] or [`StegoError::TruncatedStream`] if the stream is damaged.
pub fn decode(carriers: &[RgbImage]) -> Result<Vec<RgbImage>> {
    let stream = decoder::decode_all(carriers)?;
    debug!("Extracted: {} bytes", stream.len());

    let images = framer::deserialize(&stream)?;
    info!(
        "Decoded {} hidden image(s) from {} carrier(s)",
        images.len(),
        carriers.len()
    );
    Ok(images)
}

/// Run `job` on every carrier with at most `workers` running at once.
///
/// Results come back in carrier order. The first failure aborts the units that have
/// not started and is returned; later failures are dropped.
async fn run_bounded<T, F>(carriers: Vec<RgbImage>, workers: usize, job: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(usize, RgbImage) -> Result<T> + Send + Sync + 'static,
{
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let job = Arc::new(job);
    let mut set = JoinSet::new();

    for (index, carrier) in carriers.into_iter().enumerate() {
        let permits = permits.clone();
        let job = job.clone();
        set.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| StegoError::Worker(e.to_string()))?;
            let output = tokio::task::spawn_blocking(move || (*job)(index, carrier))
                .await
                .map_err(|e| StegoError::Worker(format!("carrier {} task panicked: {}", index, e)))??;
            Ok::<_, StegoError>((index, output))
        });
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(set.len()).collect();
    while let Some(joined) = set.join_next().await {
        let outcome = joined
            .map_err(|e| StegoError::Worker(e.to_string()))
            .and_then(|result| result);
        match outcome {
            Ok((index, output)) => slots[index] = Some(output),
            Err(e) => {
                warn!("Carrier unit failed, cancelling the rest: {}", e);
                set.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| StegoError::Worker(format!("carrier {} produced no result", index)))
        })
        .collect()
}

/// Concurrent [`encode`]: framing and planning run first, then up to `workers`
/// carriers are embedded in parallel.
pub async fn encode_concurrent(
    carriers: Vec<RgbImage>,
    hidden: Vec<RgbImage>,
    workers: usize,
) -> Result<Vec<RgbImage>> {
    if workers == 0 {
        return encode(&carriers, &hidden);
    }

    let stream = framer::serialize(&hidden)?;
    let chunks = planner::split(&stream, &capacities(&carriers))?;
    let assignments: Arc<Vec<(Vec<u8>, bool)>> = Arc::new(
        chunks
            .iter()
            .map(|chunk| (chunk.bytes.to_vec(), chunk.terminal))
            .collect(),
    );
    debug!(
        "Planned {} bytes over {} carrier(s), embedding with {} worker(s)",
        stream.len(),
        assignments.len(),
        workers
    );

    let count = carriers.len();
    let encoded = run_bounded(carriers, workers, move |index, carrier| {
        let (bytes, terminal) = &assignments[index];
        debug!("Embedding carrier {}: {} bytes", index + 1, bytes.len());
        encoder::embed(index, &carrier, bytes, *terminal)
    })
    .await?;

    info!(
        "Encoded {} hidden image(s) ({} bytes) into {} carrier(s)",
        hidden.len(),
        stream.len(),
        count
    );
    Ok(encoded)
}

/// Concurrent [`decode`]: every carrier is extracted in parallel, then the results
/// are assembled strictly in carrier order.
pub async fn decode_concurrent(carriers: Vec<RgbImage>, workers: usize) -> Result<Vec<RgbImage>> {
    if workers == 0 {
        return decode(&carriers);
    }

    let count = carriers.len();
    let extractions: Vec<Extraction> =
        run_bounded(carriers, workers, |_, carrier| Ok(decoder::extract(&carrier))).await?;
    let stream = decoder::assemble(extractions)?;
    debug!("Extracted: {} bytes", stream.len());

    let images = framer::deserialize(&stream)?;
    info!(
        "Decoded {} hidden image(s) from {} carrier(s)",
        images.len(),
        count
    );
    Ok(images)
}
