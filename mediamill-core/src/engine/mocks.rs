//! Scripted engine doubles.
//!
//! These let the orchestrator be exercised without a transcoder binary on
//! PATH: the mock spawner records every invocation (including the concat
//! manifest content, captured before the job unstages it), optionally
//! fabricates output bytes, and tracks how many invocations were ever in
//! flight at once.

use super::{EngineEvent, EngineProcess, EngineSpawner};
use crate::error::{CoreError, CoreResult};
use crate::probe::MediaProber;
use std::fs;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded engine invocation.
#[derive(Debug, Clone)]
pub struct MockInvocation {
    pub args: Vec<String>,
    /// Content of the concat manifest, when the invocation used one.
    pub manifest: Option<String>,
}

/// Script for one spawned process.
#[derive(Debug, Clone, Default)]
pub struct MockProcessPlan {
    pub events: Vec<EngineEvent>,
    pub exit_code: i32,
    /// Bytes to fabricate at the output slot (the last argument).
    pub output_bytes: Option<Vec<u8>>,
}

impl MockProcessPlan {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: EngineEvent) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn with_output(mut self, bytes: &[u8]) -> Self {
        self.output_bytes = Some(bytes.to_vec());
        self
    }
}

#[derive(Default)]
struct MockInner {
    preflight_error: Mutex<Option<String>>,
    preflight_delay: Mutex<Duration>,
    preflight_calls: AtomicUsize,
    plans: Mutex<Vec<MockProcessPlan>>,
    invocations: Mutex<Vec<MockInvocation>>,
    invocation_hold: Mutex<Duration>,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

/// Mock `EngineSpawner` with scripted per-invocation plans. Clones share
/// state, so a test can keep a probe handle after moving the spawner into
/// an `EngineHandle`.
#[derive(Clone, Default)]
pub struct MockEngineSpawner {
    inner: Arc<MockInner>,
}

impl MockEngineSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `preflight` fail with a missing-dependency error.
    pub fn fail_preflight(&self, dependency: &str) {
        *self.inner.preflight_error.lock().unwrap() = Some(dependency.to_string());
    }

    /// Stretches `preflight` so concurrent loaders can pile up on it.
    pub fn set_preflight_delay(&self, delay: Duration) {
        *self.inner.preflight_delay.lock().unwrap() = delay;
    }

    /// Makes every spawned process hold its invocation open for `delay`.
    pub fn set_invocation_hold(&self, delay: Duration) {
        *self.inner.invocation_hold.lock().unwrap() = delay;
    }

    /// Queues the plan for the next spawned process. Without queued plans
    /// every spawn succeeds with no events and no fabricated output.
    pub fn push_plan(&self, plan: MockProcessPlan) {
        self.inner.plans.lock().unwrap().push(plan);
    }

    #[must_use]
    pub fn preflight_calls(&self) -> usize {
        self.inner.preflight_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.inner.invocations.lock().unwrap().clone()
    }

    /// Highest number of invocations ever in flight at the same time.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.inner.max_live.load(Ordering::SeqCst)
    }
}

impl EngineSpawner for MockEngineSpawner {
    fn preflight(&self) -> CoreResult<()> {
        self.inner.preflight_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.inner.preflight_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match self.inner.preflight_error.lock().unwrap().as_ref() {
            Some(dependency) => Err(CoreError::DependencyNotFound(dependency.clone())),
            None => Ok(()),
        }
    }

    fn spawn(&self, args: &[String], scratch_dir: &Path) -> CoreResult<Box<dyn EngineProcess>> {
        let manifest = capture_manifest(args, scratch_dir);
        self.inner.invocations.lock().unwrap().push(MockInvocation {
            args: args.to_vec(),
            manifest,
        });

        let plan = {
            let mut plans = self.inner.plans.lock().unwrap();
            if plans.is_empty() {
                MockProcessPlan::success()
            } else {
                plans.remove(0)
            }
        };
        if let Some(bytes) = &plan.output_bytes {
            if let Some(output) = args.last() {
                fs::write(scratch_dir.join(output), bytes)?;
            }
        }

        let live = self.inner.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(Box::new(MockEngineProcess {
            events: plan.events,
            exit_code: plan.exit_code,
            hold: *self.inner.invocation_hold.lock().unwrap(),
            inner: Arc::clone(&self.inner),
            waited: false,
        }))
    }
}

fn capture_manifest(args: &[String], scratch_dir: &Path) -> Option<String> {
    if !args.iter().any(|a| a == "concat") {
        return None;
    }
    let input_pos = args.iter().position(|a| a == "-i")?;
    let name = args.get(input_pos + 1)?;
    fs::read_to_string(scratch_dir.join(name)).ok()
}

struct MockEngineProcess {
    events: Vec<EngineEvent>,
    exit_code: i32,
    hold: Duration,
    inner: Arc<MockInner>,
    waited: bool,
}

impl EngineProcess for MockEngineProcess {
    fn handle_events(&mut self, handler: &mut dyn FnMut(EngineEvent)) -> CoreResult<()> {
        if !self.hold.is_zero() {
            std::thread::sleep(self.hold);
        }
        for event in self.events.drain(..) {
            handler(event);
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        if !self.waited {
            self.waited = true;
            self.inner.live.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(ExitStatus::from_raw(self.exit_code << 8))
    }
}

/// Mock duration prober with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct MockProber {
    duration: Option<f64>,
}

impl MockProber {
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        Self { duration }
    }
}

impl MediaProber for MockProber {
    fn duration_secs(&self, _path: &Path) -> CoreResult<Option<f64>> {
        Ok(self.duration)
    }
}
