use parking_lot::Mutex;
use understudy_types::{Invocation, Outcome};

use crate::behavior::{Behavior, Next};

/// One call observed by a [`RecordingBehavior`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    /// The invocation as it arrived at the recorder.
    pub invocation: Invocation,
    /// What the rest of the chain produced.
    pub outcome: Outcome,
}

/// Delegates every call and logs it together with its outcome.
///
/// The outcome is returned unchanged; failures are logged like values.
#[derive(Debug, Default)]
pub struct RecordingBehavior {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .map(|call| call.invocation.clone())
            .collect()
    }

    /// Recorded calls to the member named `member`.
    pub fn calls_to(&self, member: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.invocation.method().name() == member)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Behavior for RecordingBehavior {
    fn name(&self) -> &str {
        "recording"
    }

    fn execute(&self, invocation: &mut Invocation, next: Next<'_>) -> Outcome {
        let arrived = invocation.clone();
        let outcome = next.run(invocation);
        self.calls.lock().push(RecordedCall {
            invocation: arrived,
            outcome: outcome.clone(),
        });
        outcome
    }
}
