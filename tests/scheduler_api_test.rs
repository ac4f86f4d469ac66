//! Integration tests for the registry and scheduler public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use diagrun::runner::{OptionSet, Scheduler};
use diagrun::tasks::{Identifier, Status, Task, TaskOptions, TaskRegistry, TaskResult, Upstream};
use diagrun::DiagError;

struct Probe {
    id: &'static str,
    deps: Vec<&'static str>,
    status: Status,
    calls: Arc<AtomicUsize>,
}

impl Probe {
    fn new(id: &'static str, deps: &[&'static str], status: Status) -> Self {
        Self {
            id,
            deps: deps.to_vec(),
            status,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Task for Probe {
    fn identifier(&self) -> Identifier {
        self.id.parse().unwrap()
    }

    fn explain(&self) -> String {
        format!("probe {}", self.id)
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.iter().map(|d| d.to_string()).collect()
    }

    fn execute(&self, options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let seen: Vec<String> = self
            .deps
            .iter()
            .map(|d| format!("{}={}", d, upstream.get(d).status))
            .collect();
        let mut summary = seen.join(",");
        if let Some(tag) = options.get("tag") {
            summary.push_str(&format!(" tag={}", tag));
        }
        TaskResult::new(self.status, summary)
    }
}

#[test]
fn dependencies_run_first_and_feed_upstream() {
    let mut builder = TaskRegistry::builder();
    builder
        .register(Probe::new("Test/Graph/Leaf", &[], Status::Warning), true)
        .register(Probe::new("Test/Graph/Middle", &["Test/Graph/Leaf"], Status::Success), true)
        .register(Probe::new("Test/Graph/Top", &["Test/Graph/Middle", "Test/Graph/Leaf"], Status::Info), true);
    let registry = builder.build().unwrap();

    let selected = registry.select(&["Test/Graph/Top"]).unwrap();
    let store = Scheduler::new(&registry).workers(3).run(&selected).unwrap();

    assert_eq!(store.len(), 3);
    let order: Vec<String> = store.completion_order().iter().map(|id| id.to_string()).collect();
    assert_eq!(order, vec!["Test/Graph/Leaf", "Test/Graph/Middle", "Test/Graph/Top"]);
    assert_eq!(
        store.result("Test/Graph/Top").unwrap().summary,
        "Test/Graph/Middle=Success,Test/Graph/Leaf=Warning"
    );
    assert_eq!(store.worst_status(), Status::Warning);
}

#[test]
fn each_task_runs_once_in_a_diamond() {
    let base = Probe::new("Test/Diamond/Base", &[], Status::Success);
    let calls = Arc::clone(&base.calls);

    let mut builder = TaskRegistry::builder();
    builder
        .register(base, true)
        .register(Probe::new("Test/Diamond/Left", &["Test/Diamond/Base"], Status::Success), true)
        .register(Probe::new("Test/Diamond/Right", &["Test/Diamond/Base"], Status::Success), true)
        .register(
            Probe::new("Test/Diamond/Join", &["Test/Diamond/Left", "Test/Diamond/Right"], Status::Success),
            true,
        );
    let registry = builder.build().unwrap();

    let selected = registry.select(&["Test/Diamond/*"]).unwrap();
    let store = Scheduler::new(&registry).run(&selected).unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cycles_are_rejected_before_anything_runs() {
    let first = Probe::new("Test/Cycle/First", &["Test/Cycle/Second"], Status::Success);
    let calls = Arc::clone(&first.calls);

    let mut builder = TaskRegistry::builder();
    builder
        .register(first, true)
        .register(Probe::new("Test/Cycle/Second", &["Test/Cycle/First"], Status::Success), true);

    let outcome = builder.build().and_then(|registry| {
        let selected = registry.select(&["Test/Cycle/First"])?;
        Scheduler::new(&registry).run(&selected).map(|_| ())
    });

    assert!(matches!(outcome, Err(DiagError::CircularDependency { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_dependency_reads_as_none() {
    let mut builder = TaskRegistry::builder();
    builder.register(Probe::new("Test/Lonely/Task", &["Test/Lonely/Ghost"], Status::Success), true);
    let registry = builder.build().unwrap();
    assert_eq!(registry.unresolved().len(), 1);

    let selected = registry.select(&["Test/Lonely/Task"]).unwrap();
    let store = Scheduler::new(&registry).run(&selected).unwrap();
    assert_eq!(
        store.result("Test/Lonely/Task").unwrap().summary,
        "Test/Lonely/Ghost=None"
    );
}

#[test]
fn options_and_overrides_flow_through() {
    let mut builder = TaskRegistry::builder();
    builder
        .register(Probe::new("Test/Opt/Source", &[], Status::Failure), true)
        .register(Probe::new("Test/Opt/Sink", &["Test/Opt/Source"], Status::Success), true);
    let registry = builder.build().unwrap();

    let mut options = OptionSet::new();
    options
        .extend_from_strs([
            "tag=everyone",
            "Test/Opt/Source.Status=success",
            "Test/Opt/Source.Payload=forced",
        ])
        .unwrap();

    let selected = registry.select(&["Test/Opt/Sink"]).unwrap();
    let store = Scheduler::new(&registry).options(options).run(&selected).unwrap();

    let source = store.get(&"Test/Opt/Source".parse().unwrap()).unwrap();
    assert!(source.was_override);
    assert_eq!(source.result.status, Status::Success);
    assert_eq!(source.result.payload.as_text(), Some("forced"));

    let sink = store.result("Test/Opt/Sink").unwrap();
    assert_eq!(sink.summary, "Test/Opt/Source=Success tag=everyone");
}

#[test]
fn opt_in_tasks_need_an_exact_selector() {
    let mut builder = TaskRegistry::builder();
    builder
        .register(Probe::new("Test/Select/Default", &[], Status::Success), true)
        .register(Probe::new("Test/Select/OptIn", &[], Status::Success), false);
    let registry = builder.build().unwrap();

    assert_eq!(registry.select(&["Test/*"]).unwrap().len(), 1);
    assert_eq!(registry.select(&["test/select/optin"]).unwrap().len(), 1);
    assert!(matches!(
        registry.select(&["Test/Nothing/*"]),
        Err(DiagError::UnknownTask { .. })
    ));
}
