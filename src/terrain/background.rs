//! Off-thread world generation.
//!
//! Generation is the one operation slow enough to notice, so a caller can
//! hand it to a dedicated tokio runtime and keep serving edits and meshes
//! from the current store. Each request gets a ticket; only the newest
//! ticket's store is delivered, older ones come back as stale.

use std::collections::HashSet;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::config::WorldConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::terrain::generator::WorldGenerator;
use crate::voxel::store::{next_generation, ChunkStore};
use crate::voxel::voxel::Voxel;

/// Identifies one generation request
pub type Ticket = u64;

/// Request sent to the worker
#[derive(Debug)]
struct GenerationRequest {
    ticket: Ticket,
    config: WorldConfig,
}

/// How a request ended
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Store generated for the newest request
    Ready(ChunkStore),
    /// A newer request was issued before this one finished
    Stale,
    /// Invalid config or a failed worker
    Failed(Error),
}

/// Result of a generation request
#[derive(Debug)]
pub struct GenerationResult {
    pub ticket: Ticket,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    /// The generated store, if this request is current and succeeded
    pub fn into_store(self) -> Option<ChunkStore> {
        match self.outcome {
            GenerationOutcome::Ready(store) => Some(store),
            _ => None,
        }
    }
}

/// World generator running on its own tokio runtime
pub struct BackgroundGenerator {
    /// Channel for sending requests to the worker loop
    request_tx: mpsc::UnboundedSender<GenerationRequest>,
    /// Channel for receiving finished stores
    result_rx: mpsc::UnboundedReceiver<(Ticket, Result<ChunkStore>)>,
    /// Tickets issued but not yet reported
    pending: HashSet<Ticket>,
    next_ticket: Ticket,
    latest: Option<Ticket>,
    _runtime: Runtime,
}

impl BackgroundGenerator {
    /// Start the worker runtime
    pub fn new() -> Result<Self> {
        let (request_tx, request_rx) = mpsc::unbounded_channel::<GenerationRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("world-gen")
            .enable_all()
            .build()?;

        runtime.spawn(Self::worker_loop(request_rx, result_tx));

        Ok(Self {
            request_tx,
            result_rx,
            pending: HashSet::new(),
            next_ticket: 1,
            latest: None,
            _runtime: runtime,
        })
    }

    /// Receive requests and run each on the blocking pool
    async fn worker_loop(
        mut request_rx: mpsc::UnboundedReceiver<GenerationRequest>,
        result_tx: mpsc::UnboundedSender<(Ticket, Result<ChunkStore>)>,
    ) {
        while let Some(request) = request_rx.recv().await {
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                let ticket = request.ticket;
                let result = match tokio::task::spawn_blocking(move || Self::generate(request.config)).await {
                    Ok(result) => result,
                    Err(e) => Err(Error::Generation(format!("generation task {} failed: {}", ticket, e))),
                };
                // Receiver gone means the generator was dropped
                let _ = result_tx.send((ticket, result));
            });
        }
    }

    fn generate(config: WorldConfig) -> Result<ChunkStore> {
        config.validate()?;
        let layout = config.layout()?;
        let generator = WorldGenerator::new(config.terrain.clone(), Voxel(config.default_material));
        Ok(generator.generate_as(&config.extent, layout, next_generation()))
    }

    /// Queue a generation; supersedes every earlier request
    pub fn request(&mut self, config: WorldConfig) -> Result<Ticket> {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        self.request_tx
            .send(GenerationRequest { ticket, config })
            .map_err(|_| Error::Generation("generation worker has stopped".into()))?;

        self.pending.insert(ticket);
        self.latest = Some(ticket);
        log::debug!("queued world generation ticket {}", ticket);
        Ok(ticket)
    }

    /// Collect finished requests without blocking
    pub fn poll(&mut self) -> Vec<GenerationResult> {
        let mut results = Vec::new();
        while let Ok((ticket, result)) = self.result_rx.try_recv() {
            results.push(self.resolve(ticket, result));
        }
        results
    }

    /// Block until every outstanding request has finished.
    ///
    /// Must not be called from inside an async context.
    pub fn wait(&mut self) -> Vec<GenerationResult> {
        let mut results = Vec::new();
        while !self.pending.is_empty() {
            match self.result_rx.blocking_recv() {
                Some((ticket, result)) => results.push(self.resolve(ticket, result)),
                None => {
                    log::error!("generation worker stopped with {} requests pending", self.pending.len());
                    results.extend(self.pending.drain().map(|ticket| GenerationResult {
                        ticket,
                        outcome: GenerationOutcome::Failed(Error::Generation("generation worker has stopped".into())),
                    }));
                }
            }
        }
        results.sort_by_key(|r| r.ticket);
        results
    }

    fn resolve(&mut self, ticket: Ticket, result: Result<ChunkStore>) -> GenerationResult {
        self.pending.remove(&ticket);
        let outcome = match result {
            Ok(_) if self.latest != Some(ticket) => {
                log::debug!("discarding stale world generation ticket {}", ticket);
                GenerationOutcome::Stale
            }
            Ok(store) => {
                log::info!("world generation ticket {} ready ({} chunks)", ticket, store.len());
                GenerationOutcome::Ready(store)
            }
            Err(e) => {
                log::warn!("world generation ticket {} failed: {}", ticket, e);
                GenerationOutcome::Failed(e)
            }
        };
        GenerationResult { ticket, outcome }
    }

    /// Number of requests not yet reported
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Newest ticket issued
    pub fn latest_ticket(&self) -> Option<Ticket> {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldExtent;

    fn small_config(seed: u32) -> WorldConfig {
        let mut config = WorldConfig {
            chunk_size: 8,
            extent: WorldExtent::new(2, 2),
            ..Default::default()
        };
        config.terrain.seed = seed;
        config
    }

    #[test]
    fn test_request_and_wait() {
        let mut generator = BackgroundGenerator::new().unwrap();
        let ticket = generator.request(small_config(1)).unwrap();
        assert!(generator.is_busy());

        let mut results = generator.wait();
        assert_eq!(results.len(), 1);
        let result = results.remove(0);
        assert_eq!(result.ticket, ticket);
        let store = result.into_store().unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.layout().chunk_size(), 8);
        assert!(!generator.is_busy());
    }

    #[test]
    fn test_superseded_request_is_stale() {
        let mut generator = BackgroundGenerator::new().unwrap();
        let first = generator.request(small_config(1)).unwrap();
        let second = generator.request(small_config(2)).unwrap();
        assert_eq!(generator.latest_ticket(), Some(second));

        let results = generator.wait();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ticket, first);
        assert!(matches!(results[0].outcome, GenerationOutcome::Stale));
        assert_eq!(results[1].ticket, second);
        assert!(matches!(results[1].outcome, GenerationOutcome::Ready(_)));
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut generator = BackgroundGenerator::new().unwrap();
        let config = WorldConfig { chunk_size: 0, ..Default::default() };
        generator.request(config).unwrap();

        let results = generator.wait();
        assert!(matches!(
            results[0].outcome,
            GenerationOutcome::Failed(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_poll_eventually_delivers() {
        let mut generator = BackgroundGenerator::new().unwrap();
        generator.request(small_config(3)).unwrap();

        let mut delivered = Vec::new();
        for _ in 0..500 {
            delivered.extend(generator.poll());
            if !delivered.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(delivered.len(), 1);
        assert_eq!(generator.pending_count(), 0);
    }
}
