//! Built-in behaviors.

pub mod anonymous;
pub mod default_value;
pub mod equality;
pub mod forwarding;
pub mod recording;

pub use anonymous::AnonymousBehavior;
pub use default_value::{DefaultValueBehavior, DefaultValueProvider};
pub use equality::IdentityEqualityBehavior;
pub use forwarding::ForwardingBehavior;
pub use recording::{RecordedCall, RecordingBehavior};
