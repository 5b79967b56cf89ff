//! Explicit logging context passed to each pipeline component.

/// Default log target for library diagnostics.
pub const DEFAULT_TARGET: &str = "unwiki";

/// Logging handle for one unit of work (usually one repository).
///
/// Components log through `ctx.target()` rather than a module-level logger,
/// so callers can route or filter diagnostics per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    target: String,

    /// Dump raw responses at debug level when extraction fails
    pub dump_responses: bool,
}

impl Context {
    /// Create a context with the default target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose log target names a repository.
    pub fn for_repo(repo: &str) -> Self {
        Self::with_target(format!("{}::{}", DEFAULT_TARGET, repo))
    }

    /// Create a context with a custom log target.
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            dump_responses: false,
        }
    }

    /// Enable or disable response dumps on extraction failure.
    pub fn with_response_dumps(mut self, dump: bool) -> Self {
        self.dump_responses = dump;
        self
    }

    /// Log target used by every component.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_target(DEFAULT_TARGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target() {
        let ctx = Context::default();
        assert_eq!(ctx.target(), "unwiki");
        assert!(!ctx.dump_responses);
    }

    #[test]
    fn test_repo_target() {
        let ctx = Context::for_repo("octocat/hello-world").with_response_dumps(true);
        assert_eq!(ctx.target(), "unwiki::octocat/hello-world");
        assert!(ctx.dump_responses);
    }
}
