//! Pipeline (component I): the worker pool over outer 3-boxes, the exporter
//! thread that drains certificates and rewrites the checkpoint, and the
//! library-level [`run`] entry point.
//!
//! Ported from `cpp/src/pipeline/pipeline.hpp`'s `Pipeline::{start_box_processor,
//! start_exporter, init, start, stop}`. The thread pool is bare `std::thread`
//! handles plus `std::sync::atomic` flags, the same shape `original_source`
//! uses — neither the teacher nor any other repo in the pack pulls in a
//! thread-pool crate for this kind of bespoke worker loop.

mod box_processor;

pub use box_processor::{process_box3, BoxOutcome};

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::FatalError;
use crate::geom::Matrix3;
use crate::interval::Interval;
use crate::io::{self, PolyhedraHeader};
use crate::queue::{ConcurrentFifo, ConcurrentPriority, WorkQueue};
use crate::subdiv::{Box3, EliminatedBox3};
use crate::symmetry;

/// The three outcomes `run` can report, mirroring spec's external-interface
/// contract for the library entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The outer queue drained completely: every 3-box is either eliminated
    /// or witnessed non-terminal.
    CompletedCover,
    /// `box_iteration_limit` or an external stop request ended the run with
    /// boxes still pending; the checkpoint holds them.
    StoppedCheckpointed,
}

/// Worker pool plus exporter over one configured run.
pub struct Pipeline<I: Interval> {
    config: Arc<Config<I>>,
    box_queue: Arc<ConcurrentPriority<Reverse<Box3>>>,
    certificate_queue: Arc<ConcurrentFifo<EliminatedBox3>>,
    residual_queue: Arc<ConcurrentFifo<Box3>>,
    symmetries: Arc<Vec<Matrix3<I>>>,
    stop: Arc<AtomicBool>,
    processed_box_count: Arc<AtomicU32>,
    terminated_thread_count: Arc<AtomicU8>,
    /// Workers currently observing an empty outer queue. When this reaches
    /// `thread_count` with the queue still empty, the cover is complete and
    /// `run` stops on its own rather than spinning forever — `pipeline.hpp`
    /// has no such check and instead relies entirely on `box_iteration_limit`
    /// or an external stop to end a run.
    idle_worker_count: Arc<AtomicU32>,
    /// Set only by the idle-quiescence check in [`Pipeline::start_box_processor`],
    /// never by an external stop or `box_iteration_limit` — distinguishes
    /// "drained naturally" from "stopped early" for [`Pipeline::run`]'s exit
    /// code, since both paths set `stop` itself.
    cover_complete: Arc<AtomicBool>,
}

impl<I: Interval + Send + Sync + 'static> Pipeline<I> {
    /// Builds a pipeline and restores its outer queue from `config`'s boxes
    /// file if one exists, else seeds a single root 3-box.
    ///
    /// `original_source`'s `init()` instead hardcodes a specific depth-4 seed
    /// box (`Box(Id(4,0b0101), Id(4,0b0011), Id(4,0b1010))`) when no
    /// checkpoint is found — itself commented as a placeholder the original
    /// author meant to replace with the true root box. This crate starts
    /// from the true root, covering the whole orientation space rather than
    /// one reference-case corner of it.
    pub fn new(config: Config<I>) -> Result<Self, FatalError> {
        config.validate()?;

        let symmetries = if config.symmetry_skip {
            symmetry::symmetries(config.hole.vertices(), true)
        } else {
            Vec::new()
        };

        let box_queue: ConcurrentPriority<Reverse<Box3>> = ConcurrentPriority::new();
        match io::read_checkpoint(&config.boxes_path()) {
            Ok(Some(checkpoint)) => {
                info!(count = checkpoint.pending.len(), "restored outer queue from checkpoint");
                box_queue.push_all(checkpoint.pending.into_iter().map(Reverse));
            }
            Ok(None) => box_queue.push(Reverse(Box3::root())),
            Err(err) => {
                warn!(%err, "checkpoint unreadable, starting from root box");
                box_queue.push(Reverse(Box3::root()));
            }
        }

        let header = PolyhedraHeader {
            hole: config.hole.vertices().iter().map(vertex_to_f64::<I>).collect(),
            plug: config.plug.vertices().iter().map(vertex_to_f64::<I>).collect(),
            hull_epsilon_factor: config.hull_epsilon_factor,
        };
        io::write_polyhedra_header(&config.polyhedra_path(), &header)?;

        Ok(Self {
            config: Arc::new(config),
            box_queue: Arc::new(box_queue),
            certificate_queue: Arc::new(ConcurrentFifo::new()),
            residual_queue: Arc::new(ConcurrentFifo::new()),
            symmetries: Arc::new(symmetries),
            stop: Arc::new(AtomicBool::new(false)),
            processed_box_count: Arc::new(AtomicU32::new(0)),
            terminated_thread_count: Arc::new(AtomicU8::new(0)),
            idle_worker_count: Arc::new(AtomicU32::new(0)),
            cover_complete: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A clone of the stop flag the caller can set from a signal handler
    /// (`rupert-cli` wires this to `ctrlc`).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    fn start_box_processor(&self) {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            let Some(Reverse(box3)) = self.box_queue.pop() else {
                let idle = self.idle_worker_count.fetch_add(1, Ordering::SeqCst) + 1;
                if idle as u8 == self.config.thread_count && self.box_queue.size() == 0 {
                    self.cover_complete.store(true, Ordering::Relaxed);
                    self.stop.store(true, Ordering::Relaxed);
                }
                thread::sleep(Duration::from_millis(10));
                self.idle_worker_count.fetch_sub(1, Ordering::SeqCst);
                continue;
            };
            match process_box3(&self.config, box3, &self.symmetries) {
                Ok(BoxOutcome::Eliminated(certificate)) => self.certificate_queue.push(certificate),
                Ok(BoxOutcome::NonTerminal) => {}
                Ok(BoxOutcome::Subdivide(children)) => self.box_queue.push_all(children.into_iter().map(Reverse)),
                Ok(BoxOutcome::Residual(residual)) => self.residual_queue.push(residual),
                Err(err) => {
                    warn!(%err, "box processor hit a fatal error, stopping run");
                    self.stop.store(true, Ordering::Relaxed);
                    break;
                }
            }

            let processed = self.processed_box_count.fetch_add(1, Ordering::Relaxed) + 1;
            if self.config.box_iteration_limit != 0 && processed >= self.config.box_iteration_limit {
                self.stop.store(true, Ordering::Relaxed);
                break;
            }
        }
        self.terminated_thread_count.fetch_add(1, Ordering::Relaxed);
    }

    fn drain_and_export(&self) -> Result<(), FatalError> {
        let certificates = self.certificate_queue.pop_all();
        if !certificates.is_empty() {
            io::append_certificates(&self.config.terminal_boxes_path(), &certificates)?;
            info!(count = certificates.len(), "exported certificates");
        }
        Ok(())
    }

    fn write_checkpoint(&self) -> Result<(), FatalError> {
        let pending: Vec<Box3> = self.box_queue.pop_all().into_iter().map(|Reverse(b)| b).collect();
        // pop_all drains the queue; put everything straight back so the run
        // can keep going after the checkpoint write (the exporter calls this
        // repeatedly, not just at shutdown).
        self.box_queue.push_all(pending.iter().copied().map(Reverse));
        io::write_checkpoint_atomic(&self.config.boxes_path(), &io::Checkpoint { pending })?;
        Ok(())
    }

    fn start_exporter(&self) -> Result<(), FatalError> {
        loop {
            if self.certificate_queue.size() >= self.config.export_size_threshold {
                self.drain_and_export()?;
            } else {
                thread::sleep(Duration::from_secs(1));
            }
            if self.stop.load(Ordering::Relaxed)
                && self.terminated_thread_count.load(Ordering::Relaxed) >= self.config.thread_count
            {
                break;
            }
        }
        // Final drain: everything the workers pushed between the last
        // threshold-triggered export and their exit.
        self.drain_and_export()?;
        self.write_checkpoint()?;
        Ok(())
    }

    /// Runs the configured worker pool plus exporter to completion (outer
    /// queue empty) or until stopped, then returns the corresponding exit
    /// code. Residual boxes (range overflow) are available afterwards via
    /// [`Pipeline::residuals`].
    pub fn run(&self) -> Result<ExitCode, FatalError> {
        thread::scope(|scope| {
            for _ in 0..self.config.thread_count {
                scope.spawn(|| self.start_box_processor());
            }
            let exporter_result = self.start_exporter();
            exporter_result
        })?;

        if self.cover_complete.load(Ordering::Relaxed) {
            Ok(ExitCode::CompletedCover)
        } else {
            Ok(ExitCode::StoppedCheckpointed)
        }
    }

    /// 3-boxes that hit the depth cap without being resolved either way.
    pub fn residuals(&self) -> Vec<Box3> {
        self.residual_queue.pop_all()
    }
}

fn vertex_to_f64<I: Interval>(vertex: &crate::geom::Vector3<I>) -> (f64, f64, f64) {
    (vertex.x.mid(), vertex.y.mid(), vertex.z.mid())
}

/// Library-level entry point (spec's `run(config) -> exit_code`): builds a
/// pipeline from `config` and runs it to completion or until stopped.
pub fn run<I: Interval + Send + Sync + 'static>(config: Config<I>) -> Result<ExitCode, FatalError> {
    let pipeline = Pipeline::new(config)?;
    pipeline.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Polyhedron, Vector3};
    use crate::interval::FastInterval;

    fn tetrahedron() -> Polyhedron<FastInterval> {
        Polyhedron::new(vec![
            Vector3::from_f64(1.0, 1.0, 1.0),
            Vector3::from_f64(1.0, -1.0, -1.0),
            Vector3::from_f64(-1.0, 1.0, -1.0),
            Vector3::from_f64(-1.0, -1.0, 1.0),
        ])
    }

    fn config(dir: &std::path::Path) -> Config<FastInterval> {
        let mut cfg = Config::new("pipeline_test", tetrahedron(), tetrahedron(), dir);
        cfg.box_iteration_limit = 40;
        cfg.rectangle_iteration_limit = 64;
        cfg
    }

    #[test]
    fn run_stops_at_box_iteration_limit_and_writes_a_checkpoint() {
        let dir = tempdir();
        let cfg = config(dir.path());
        let exit_code = run(cfg).unwrap();
        assert_eq!(exit_code, ExitCode::StoppedCheckpointed);
        assert!(std::path::Path::new(&dir.path().join("pipeline_test_boxes.bin")).exists());
    }

    #[test]
    fn polyhedra_header_is_written_on_construction() {
        let dir = tempdir();
        let cfg = config(dir.path());
        let pipeline = Pipeline::new(cfg).unwrap();
        let header = io::read_polyhedra_header(&pipeline.config.polyhedra_path()).unwrap();
        assert_eq!(header.hole.len(), 4);
        assert_eq!(header.plug.len(), 4);
    }

    /// Minimal temp-directory helper; this crate doesn't depend on
    /// `tempfile` itself (only `rupert-cli`'s dev-dependencies do), so tests
    /// clean up a uniquely named subdirectory of `std::env::temp_dir()` by
    /// hand.
    fn tempdir() -> TempDir {
        let path = std::env::temp_dir().join(format!("rupert_pipeline_test_{:?}", std::thread::current().id()));
        std::fs::create_dir_all(&path).unwrap();
        TempDir { path }
    }

    struct TempDir {
        path: std::path::PathBuf,
    }

    impl TempDir {
        fn path(&self) -> &std::path::Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.path).ok();
        }
    }
}
