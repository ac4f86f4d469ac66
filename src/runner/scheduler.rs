//! Dependency-ordered task execution.
//!
//! The scheduler runs the closure of the selected tasks. Ready tasks (all
//! dependencies stored) are dispatched in identifier order onto at most
//! `workers` scoped threads; completions come back over a channel and are
//! stored before any dependent is released. A task never starts until every
//! result it will read is final.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{DiagError, Result};
use crate::tasks::{Identifier, RegisteredTask, TaskRegistry, TaskResult, Upstream};

use super::dependency::DependencyGraph;
use super::overrides::{override_result, OptionSet};
use super::store::{ResultStore, TaskRecord};

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Progress events emitted while a run is in flight.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A task is about to start.
    Starting {
        identifier: &'a Identifier,
        index: usize,
        total: usize,
    },
    /// A task's result was stored.
    Finished {
        identifier: &'a Identifier,
        result: &'a TaskResult,
        was_override: bool,
    },
}

/// The validated execution plan for one run.
#[derive(Debug)]
pub struct RunPlan {
    graph: DependencyGraph,
    order: Vec<Identifier>,
}

impl RunPlan {
    /// Tasks in the order a single worker would run them.
    pub fn order(&self) -> &[Identifier] {
        &self.order
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct Completion {
    identifier: Identifier,
    result: TaskResult,
    was_override: bool,
    duration: Duration,
}

/// Runs tasks from a [`TaskRegistry`] in dependency order.
pub struct Scheduler<'r> {
    registry: &'r TaskRegistry,
    workers: usize,
    options: OptionSet,
}

impl<'r> Scheduler<'r> {
    pub fn new(registry: &'r TaskRegistry) -> Self {
        Self {
            registry,
            workers: DEFAULT_WORKERS,
            options: OptionSet::default(),
        }
    }

    /// Maximum number of tasks executing at once (at least one).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Options and overrides handed to tasks.
    pub fn options(mut self, options: OptionSet) -> Self {
        self.options = options;
        self
    }

    /// Compute and validate the plan for `selected` without running anything.
    pub fn plan(&self, selected: &[Identifier]) -> Result<RunPlan> {
        for id in selected {
            if self.registry.get(id).is_none() {
                return Err(DiagError::UnknownTask {
                    selector: id.to_string(),
                });
            }
        }

        let nodes = self.registry.graph().closure(selected);
        let graph = self.registry.graph().restrict(&nodes);
        let order = graph.topological_order()?;
        Ok(RunPlan { graph, order })
    }

    /// Run `selected` and everything it depends on.
    pub fn run(&self, selected: &[Identifier]) -> Result<ResultStore> {
        self.run_with_progress(selected, |_| {})
    }

    /// Run with a progress callback, invoked on the calling thread.
    pub fn run_with_progress(
        &self,
        selected: &[Identifier],
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> Result<ResultStore> {
        let plan = self.plan(selected)?;
        let total = plan.len();
        let mut store = ResultStore::new();

        tracing::info!("Running {} tasks on up to {} workers", total, self.workers);

        let mut pending: HashMap<&Identifier, usize> = plan
            .order
            .iter()
            .map(|id| (id, plan.graph.dependencies_of(id).map_or(0, BTreeSet::len)))
            .collect();
        let mut ready: BTreeSet<&Identifier> = pending
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(id, _)| *id)
            .collect();

        let (tx, rx) = mpsc::channel::<Completion>();
        let mut running = 0usize;
        let mut started = 0usize;

        thread::scope(|scope| -> Result<()> {
            loop {
                while running < self.workers {
                    let Some(id) = ready.pop_first() else {
                        break;
                    };
                    let Some(registered) = self.registry.get(id) else {
                        continue;
                    };

                    started += 1;
                    running += 1;
                    on_progress(RunProgress::Starting {
                        identifier: id,
                        index: started,
                        total,
                    });

                    let options = self.options.for_task(id);
                    if let Some(result) = override_result(&options) {
                        tracing::debug!("{} result set by override", id);
                        let _ = tx.send(Completion {
                            identifier: id.clone(),
                            result,
                            was_override: true,
                            duration: Duration::ZERO,
                        });
                        continue;
                    }

                    let upstream = upstream_for(registered, &store);
                    let task = registered.task();
                    let identifier = id.clone();
                    let tx = tx.clone();
                    tracing::debug!("Dispatching {}", identifier);

                    scope.spawn(move || {
                        let start = Instant::now();
                        let result = panic::catch_unwind(AssertUnwindSafe(|| {
                            task.execute(&options, &upstream)
                        }))
                        .unwrap_or_else(|payload| {
                            let message = panic_message(payload.as_ref());
                            tracing::warn!("{} panicked: {}", identifier, message);
                            let mut result = TaskResult::error(format!("Task panicked: {}", message));
                            result.error = message;
                            result
                        });
                        let _ = tx.send(Completion {
                            identifier,
                            result,
                            was_override: false,
                            duration: start.elapsed(),
                        });
                    });
                }

                if running == 0 {
                    break;
                }

                let completion = rx.recv().map_err(|e| {
                    DiagError::Other(anyhow::anyhow!("worker channel closed: {}", e))
                })?;
                running -= 1;

                let identifier = completion.identifier;
                tracing::debug!(
                    "{} finished with {} in {:?}",
                    identifier,
                    completion.result.status,
                    completion.duration
                );
                store.insert(TaskRecord {
                    identifier: identifier.clone(),
                    result: Arc::new(completion.result),
                    was_override: completion.was_override,
                    duration: completion.duration,
                });
                if let Some(record) = store.get(&identifier) {
                    on_progress(RunProgress::Finished {
                        identifier: &record.identifier,
                        result: &record.result,
                        was_override: record.was_override,
                    });
                }

                if let Some(dependents) = plan.graph.dependents_of(&identifier) {
                    for dependent in dependents {
                        if let Some(count) = pending.get_mut(dependent) {
                            *count -= 1;
                            if *count == 0 {
                                ready.insert(dependent);
                            }
                        }
                    }
                }
            }
            Ok(())
        })?;

        tracing::info!(
            "Run finished: {} results, worst status {}",
            store.len(),
            store.worst_status()
        );
        Ok(store)
    }
}

/// Snapshot the stored results a task declared, zero values for the rest.
fn upstream_for(registered: &RegisteredTask, store: &ResultStore) -> Upstream {
    let mut upstream = Upstream::new();
    for dependency in registered.dependencies() {
        let result = dependency
            .resolved
            .as_ref()
            .and_then(|id| store.get(id))
            .map(|record| Arc::clone(&record.result))
            .unwrap_or_default();
        upstream.insert(dependency.declared.clone(), result);
    }
    upstream
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
