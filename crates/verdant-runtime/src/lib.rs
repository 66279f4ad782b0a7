#![forbid(unsafe_code)]
//! Background chunk realization: a fixed pool of named worker threads pulls
//! build jobs off a bounded queue, runs the generator lineup against each
//! chunk, and hands finished chunks back over a completion queue the
//! coordinator drains once per frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{Builder, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use verdant_chunk::{Chunk, FeatureGenerator};

/// A chunk handed to the pool for voxel fill and geometry build. The chunk
/// moves into the job; the coordinator gets it back in the [`JobOut`].
pub struct BuildJob {
    pub chunk: Chunk,
    pub job_id: u64,
}

/// A realized chunk coming back from a worker.
pub struct JobOut {
    pub chunk: Chunk,
    pub job_id: u64,
    /// Wall-clock milliseconds the realization took, for load diagnostics.
    pub t_realize_ms: u32,
}

/// Worker pool handle. Dropping it without [`Runtime::shutdown`] detaches the
/// workers; they exit once the job queue closes.
pub struct Runtime {
    job_tx: Sender<BuildJob>,
    res_rx: Receiver<JobOut>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
    handles: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Spawns `workers` build threads (0 means one per available core). Every
    /// worker shares the same generator prototypes; chunks are realized with
    /// exclusive ownership so the prototypes are only ever cloned from.
    pub fn new(generators: Arc<Vec<Box<dyn FeatureGenerator>>>, workers: usize) -> std::io::Result<Self> {
        let workers = if workers == 0 {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            workers
        };
        // Bounded so a stalled coordinator exerts backpressure instead of
        // piling up chunks; results are unbounded because the coordinator
        // always drains them.
        let (job_tx, job_rx) = bounded::<BuildJob>(workers * 4);
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            let generators = generators.clone();
            let handle = Builder::new()
                .name(format!("verdant-build-{i}"))
                .spawn(move || {
                    while let Ok(job) = job_rx.recv() {
                        // In-flight rises before queued falls so the pool
                        // never reads idle during the handoff.
                        inflight.fetch_add(1, Ordering::SeqCst);
                        queued.fetch_sub(1, Ordering::SeqCst);
                        let BuildJob { mut chunk, job_id } = job;
                        let t0 = Instant::now();
                        chunk.realize(&generators);
                        chunk.set_dirty(false);
                        let t_realize_ms = t0.elapsed().as_millis() as u32;
                        log::debug!(
                            "built chunk {:?} in {} ms (job {})",
                            chunk.coord(),
                            t_realize_ms,
                            job_id
                        );
                        // Publish the result before going idle so an observer
                        // never sees an idle pool with a completed job missing.
                        let sent = res_tx.send(JobOut {
                            chunk,
                            job_id,
                            t_realize_ms,
                        });
                        inflight.fetch_sub(1, Ordering::SeqCst);
                        if sent.is_err() {
                            break;
                        }
                    }
                })?;
            handles.push(handle);
        }

        Ok(Self {
            job_tx,
            res_rx,
            queued,
            inflight,
            workers,
            handles,
        })
    }

    /// Offers a job to the pool. Returns the job back if the queue is full;
    /// the caller retries on a later frame.
    pub fn submit_build_job(&self, job: BuildJob) -> Result<(), BuildJob> {
        self.queued.fetch_add(1, Ordering::SeqCst);
        match self.job_tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.queued.fetch_sub(1, Ordering::SeqCst);
                Err(err.into_inner())
            }
        }
    }

    /// Everything finished since the last call, without blocking.
    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Jobs accepted but not yet picked up by a worker.
    #[inline]
    pub fn queued_jobs(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Jobs currently being realized.
    #[inline]
    pub fn inflight_jobs(&self) -> usize {
        self.inflight.load(Ordering::SeqCst)
    }

    /// No work queued or running. Completed results may still be waiting in
    /// the drain queue.
    pub fn is_idle(&self) -> bool {
        self.queued_jobs() == 0 && self.inflight_jobs() == 0
    }

    /// Closes the job queue and joins every worker. A worker that panicked
    /// surfaces here rather than dying silently mid-run.
    pub fn shutdown(self) {
        drop(self.job_tx);
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("verdant-build").to_string();
            if let Err(payload) = handle.join() {
                log::error!("worker thread {name} panicked");
                std::panic::resume_unwind(payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use verdant_items::InstanceId;
    use verdant_scene::SceneHandle;
    use verdant_world::ChunkCoord;

    struct StampGen {
        runs: Arc<AtomicUsize>,
    }

    impl FeatureGenerator for StampGen {
        fn name(&self) -> &str {
            "stamp"
        }
        fn create(&mut self, chunk: &mut Chunk) {
            self.runs.fetch_add(1, Ordering::Relaxed);
            chunk.set(0, 0, 0, 1);
        }
        fn create_object(&mut self, _chunk: &Chunk) -> bool {
            true
        }
        fn active(&mut self, _parent: Option<SceneHandle>) {}
        fn update(&mut self, _c: &Chunk, _at: (i32, i32, i32), _o: InstanceId, _n: InstanceId) {}
        fn clone_box(&self) -> Box<dyn FeatureGenerator> {
            Box::new(StampGen {
                runs: self.runs.clone(),
            })
        }
    }

    fn pool(runs: &Arc<AtomicUsize>, workers: usize) -> Runtime {
        let gens: Vec<Box<dyn FeatureGenerator>> = vec![Box::new(StampGen { runs: runs.clone() })];
        Runtime::new(Arc::new(gens), workers).unwrap()
    }

    fn drain_until(rt: &Runtime, want: usize) -> Vec<JobOut> {
        let mut out = Vec::new();
        for _ in 0..200 {
            out.extend(rt.drain_worker_results());
            if out.len() >= want {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn jobs_come_back_realized() {
        let runs = Arc::new(AtomicUsize::new(0));
        let rt = pool(&runs, 2);
        for id in 0..4u64 {
            let chunk = Chunk::new(8, ChunkCoord::new(id as i32, 0, 0));
            rt.submit_build_job(BuildJob { chunk, job_id: id }).unwrap_or_else(|_| panic!("queue full"));
        }
        let out = drain_until(&rt, 4);
        assert_eq!(out.len(), 4);
        assert_eq!(runs.load(Ordering::Relaxed), 4);
        for job in &out {
            assert!(!job.chunk.is_dirty());
            assert_eq!(job.chunk.get(0, 0, 0), 1);
            assert_eq!(job.chunk.feature_count(), 1);
        }
        rt.shutdown();
    }

    #[test]
    fn idle_pool_never_hides_a_finished_job() {
        let runs = Arc::new(AtomicUsize::new(0));
        let rt = pool(&runs, 1);
        let chunk = Chunk::new(8, ChunkCoord::new(0, 0, 0));
        assert!(rt.submit_build_job(BuildJob { chunk, job_id: 9 }).is_ok());
        for _ in 0..200 {
            if rt.is_idle() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(rt.is_idle());
        // The result was published before the worker went idle, so it must be
        // drainable right now.
        let out = rt.drain_worker_results();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job_id, 9);
        rt.shutdown();
    }

    #[test]
    fn shutdown_joins_cleanly_with_queued_work() {
        let runs = Arc::new(AtomicUsize::new(0));
        let rt = pool(&runs, 2);
        for id in 0..3u64 {
            let chunk = Chunk::new(8, ChunkCoord::new(0, 0, id as i32));
            let _ = rt.submit_build_job(BuildJob { chunk, job_id: id });
        }
        rt.shutdown();
    }
}
