use futures::future::try_join_all;
use std::future::Future;
use tracing::{debug, instrument};

use super::{FetchError, SummonerId};

/// Chunking parameters for batched summoner reads.
///
/// `per_chunk` bounds how many ids go into a single upstream call and
/// `max_concurrent_chunks` bounds how many of those calls are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub per_chunk: usize,
    pub max_concurrent_chunks: usize,
}

impl BatchConfig {
    pub fn new(per_chunk: usize, max_concurrent_chunks: usize) -> Result<Self, FetchError> {
        let config = Self {
            per_chunk,
            max_concurrent_chunks,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.per_chunk == 0 || self.max_concurrent_chunks == 0 {
            return Err(FetchError::InvalidBatchConfig {
                per_chunk: self.per_chunk,
                max_concurrent_chunks: self.max_concurrent_chunks,
            });
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            per_chunk: 70,
            max_concurrent_chunks: 5,
        }
    }
}

/// Splits `items` into ordered chunks of at most `config.per_chunk` elements.
fn chunk_ids(
    items: &[SummonerId],
    config: &BatchConfig,
) -> Result<Vec<Vec<SummonerId>>, FetchError> {
    config.validate()?;
    Ok(items
        .chunks(config.per_chunk)
        .map(<[SummonerId]>::to_vec)
        .collect())
}

/// Fetches one result per id, in input order.
///
/// Chunks are dispatched in waves of `max_concurrent_chunks`; a wave must
/// finish entirely before the next one starts. The first failing chunk aborts
/// the whole fetch and nothing fetched so far is returned.
#[instrument(skip(ids, fetch_chunk), fields(ids = ids.len()))]
pub async fn fetch_all<T, F, Fut>(
    ids: &[SummonerId],
    config: BatchConfig,
    fetch_chunk: F,
) -> Result<Vec<T>, FetchError>
where
    F: Fn(Vec<SummonerId>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let chunks = chunk_ids(ids, &config)?;
    let wave_count = chunks.len().div_ceil(config.max_concurrent_chunks);
    debug!(
        chunks = chunks.len(),
        waves = wave_count,
        per_chunk = config.per_chunk,
        max_concurrent_chunks = config.max_concurrent_chunks,
        "Fetching summoners in waves"
    );

    let mut results = Vec::with_capacity(ids.len());
    for (wave_index, wave) in chunks.chunks(config.max_concurrent_chunks).enumerate() {
        let requests = wave.iter().map(|chunk| {
            let requested = chunk.len();
            let pending = fetch_chunk(chunk.clone());
            async move {
                let fetched = pending.await?;
                if fetched.len() != requested {
                    return Err(FetchError::ChunkLength {
                        requested,
                        returned: fetched.len(),
                    });
                }
                Ok(fetched)
            }
        });

        let wave_results = try_join_all(requests).await?;
        debug!(wave = wave_index, chunks = wave_results.len(), "Wave completed");

        for chunk in wave_results {
            results.extend(chunk);
        }
    }

    Ok(results)
}
