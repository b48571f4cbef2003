//! Mutating the behavior list while other threads dispatch through it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use understudy_pipeline::{AnonymousBehavior, Behavior, BehaviorPipeline, RecordingBehavior};
use understudy_types::{args, Invocation, MethodDescriptor, Outcome, Target, TypeInfo, Value};

fn terminal(invocation: &mut Invocation) -> Outcome {
    invocation.value_outcome(Some(Value::new(0usize)))
}

fn count_method() -> Arc<MethodDescriptor> {
    MethodDescriptor::builder("count")
        .declaring_type("Counter")
        .returns(TypeInfo::of::<usize>())
        .build()
        .unwrap()
}

/// Adds one to whatever the rest of the chain returned.
fn incrementer() -> Arc<dyn Behavior> {
    Arc::new(
        AnonymousBehavior::new(|inv, next| {
            let inner = next.run(inv);
            let n = inner.value().and_then(|v| v.downcast::<usize>()).unwrap_or(0);
            inv.value_outcome(Some(Value::new(n + 1)))
        })
        .named("increment"),
    )
}

#[test]
fn concurrent_adds_never_tear_a_dispatch() {
    const WRITERS: usize = 4;
    const ADDS_PER_WRITER: usize = 50;
    const READERS: usize = 4;

    let pipeline = Arc::new(BehaviorPipeline::new());
    let recorder = Arc::new(RecordingBehavior::new());
    pipeline.add(recorder.clone());
    let method = count_method();

    let mut handles = Vec::new();
    for _ in 0..WRITERS {
        let pipeline = pipeline.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..ADDS_PER_WRITER {
                pipeline.add(incrementer());
            }
        }));
    }

    let observed = Arc::new(AtomicUsize::new(0));
    for _ in 0..READERS {
        let pipeline = pipeline.clone();
        let method = method.clone();
        let observed = observed.clone();
        handles.push(thread::spawn(move || {
            let mut last = 0;
            for _ in 0..100 {
                let mut invocation =
                    Invocation::new(Target::new("Counter"), method.clone(), args![]).unwrap();
                let outcome = pipeline.execute(&mut invocation, &terminal);
                let n = outcome.value().unwrap().downcast::<usize>().unwrap();
                // Behaviors are only ever added, so each dispatch sees at
                // least as many as the one before it.
                assert!(n >= last);
                assert!(n <= WRITERS * ADDS_PER_WRITER);
                last = n;
                observed.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pipeline.len(), 1 + WRITERS * ADDS_PER_WRITER);
    assert_eq!(recorder.len(), observed.load(Ordering::Relaxed));

    let mut invocation = Invocation::new(Target::new("Counter"), method, args![]).unwrap();
    let outcome = pipeline.execute(&mut invocation, &terminal);
    assert_eq!(
        outcome.value().unwrap().downcast::<usize>(),
        Some(WRITERS * ADDS_PER_WRITER)
    );
}

#[test]
fn behavior_removing_itself_finishes_the_current_call() {
    let pipeline = Arc::new(BehaviorPipeline::new());
    let handle = pipeline.clone();
    pipeline.add(Arc::new(
        AnonymousBehavior::new(move |inv, next| {
            handle.clear();
            next.run(inv)
        })
        .named("self-clearing"),
    ));
    pipeline.add(incrementer());

    let method = count_method();
    let mut invocation = Invocation::new(Target::new("Counter"), method.clone(), args![]).unwrap();
    let outcome = pipeline.execute(&mut invocation, &terminal);
    assert_eq!(outcome.value().unwrap().downcast::<usize>(), Some(1));
    assert!(pipeline.is_empty());

    let mut invocation = Invocation::new(Target::new("Counter"), method, args![]).unwrap();
    let outcome = pipeline.execute(&mut invocation, &terminal);
    assert_eq!(outcome.value().unwrap().downcast::<usize>(), Some(0));
}
