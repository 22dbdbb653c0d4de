//! Boundary to the sandboxed runtime that executes code-event payloads.

/// Host-side script runtime owned by one avatar.
///
/// Implementations must not block the simulation thread; the runtime itself
/// enforces instruction budgets. The scheduler consults
/// [`has_runtime`](ScriptHost::has_runtime) and
/// [`errored`](ScriptHost::errored) before every firing and silently skips
/// the event when the runtime is missing or poisoned — events are never
/// queued or retried.
pub trait ScriptHost {
    /// Whether the owning avatar has a script runtime at all.
    fn has_runtime(&self) -> bool;

    /// Whether the runtime is in a persistent error state.
    fn errored(&self) -> bool;

    /// Execute `source`. `context` labels the origin for diagnostics, e.g.
    /// `animation (walk)`.
    fn run_script(&mut self, source: &str, context: &str);
}

/// Stand-in host for avatars without scripts; every event is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScriptHost;

impl ScriptHost for NullScriptHost {
    fn has_runtime(&self) -> bool {
        false
    }

    fn errored(&self) -> bool {
        false
    }

    fn run_script(&mut self, _source: &str, _context: &str) {}
}
