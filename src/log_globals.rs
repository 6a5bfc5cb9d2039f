//! Global log stream instances.
//!
//! One stream per execution context, so every stream has a single producer.

use crate::logging::LogStream;

/// Sampling-context stream.
///
/// Producer: the beam updaters, all run from the one sampling tick.
/// Consumer: the control loop's log drain.
pub static ISR_LOG: LogStream = LogStream::new();

/// Control-loop stream.
///
/// Producer: the beam scheduler and startup code.
/// Consumer: the same loop's log drain.
pub static LOOP_LOG: LogStream = LogStream::new();
