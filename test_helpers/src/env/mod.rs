//! Serialised environment mutation for tests.
//!
//! An [`EnvScope`] holds a process-wide re-entrant lock for its whole
//! lifetime. Variables changed through it are restored in reverse order when
//! it is dropped, so nested changes to the same key unwind correctly.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let mut scope = env::scope();
//! scope.set("APP_SERVER__PORT", "9000").remove("APP_DEBUG");
//! assert_eq!(std::env::var("APP_SERVER__PORT").as_deref(), Ok("9000"));
//! drop(scope);
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_LOCK: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Holds the environment lock and the values to restore.
#[must_use = "dropping the scope restores the environment immediately"]
pub struct EnvScope {
    saved: Vec<(String, Option<OsString>)>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl EnvScope {
    fn remember(&mut self, key: &str) {
        self.saved.push((key.to_owned(), env::var_os(key)));
    }

    /// Set `key` to `value` until the scope ends.
    pub fn set(&mut self, key: &str, value: impl AsRef<OsStr>) -> &mut Self {
        self.remember(key);
        // SAFETY: every mutation goes through `ENV_LOCK`, which this scope holds.
        unsafe { env::set_var(key, value) };
        self
    }

    /// Remove `key` until the scope ends.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: every mutation goes through `ENV_LOCK`, which this scope holds.
        unsafe { env::remove_var(key) };
        self
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            // SAFETY: the lock is still held; it is released after this body.
            match original {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("keys", &self.saved.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Acquire the environment lock and start an empty scope.
///
/// The lock is re-entrant, so a test may open a nested scope on the same
/// thread.
pub fn scope() -> EnvScope {
    EnvScope {
        saved: Vec::new(),
        _lock: ENV_LOCK.lock(),
    }
}

/// Start a scope with `vars` applied; `None` removes the variable.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::with_vars([("APP_NAME", Some("demo")), ("APP_DEBUG", None)]);
/// assert!(std::env::var("APP_DEBUG").is_err());
/// ```
pub fn with_vars<'a, I>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut scope = scope();
    for (key, value) in vars {
        match value {
            Some(value) => scope.set(key, value),
            None => scope.remove(key),
        };
    }
    scope
}
