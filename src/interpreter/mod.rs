mod registry;

pub use registry::{DispatchStrategy, InterpreterRegistry, MatchCallback, MatchOutcome, UpdateCallback};
