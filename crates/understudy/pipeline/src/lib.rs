//! Dispatch half of the Understudy interception pipeline.
//!
//! Every member call on a stand-in object becomes an
//! [`Invocation`](understudy_types::Invocation) that is folded through an
//! ordered list of [`Behavior`]s:
//!
//! ```text
//! StandIn::invoke
//!   -> BehaviorPipeline::execute   (pins a snapshot of the list)
//!     -> behavior[0]  skip | short-circuit | next.run()
//!     -> behavior[1]  ...
//!     -> TerminalStep  NotImplemented, or forward to the real object
//! ```
//!
//! The first applicable behavior that does not delegate decides the
//! outcome. Failures travel as data inside the
//! [`Outcome`](understudy_types::Outcome) and are only turned back into an
//! `Err` at the [`StandIn`] boundary.

pub mod behavior;
pub mod behaviors;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stand_in;
pub mod target;
pub mod terminal;

pub use behavior::{Behavior, Next, TerminalStep};
pub use behaviors::{
    AnonymousBehavior, DefaultValueBehavior, DefaultValueProvider, ForwardingBehavior,
    IdentityEqualityBehavior, RecordedCall, RecordingBehavior,
};
pub use config::StandInConfig;
pub use error::{CallError, PipelineError};
pub use pipeline::{BehaviorPipeline, BehaviorSnapshot};
pub use stand_in::{Intercepted, StandIn};
pub use target::{CallTarget, MethodTable};
pub use terminal::{ForwardStep, NotImplementedStep};
