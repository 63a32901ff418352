use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A logger type which is called with various information regarding the work done by the evaluator.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Keeps track of environment specific information which influences evaluation behavior.
#[derive(Clone)]
pub struct Environment {
    /// An information logger.
    pub logger: InfoLogger,
    /// Amount of workers used when jobs are executed in distributed mode.
    pub parallelism: usize,
}

impl Environment {
    /// Creates a new instance of `Environment`.
    pub fn new(logger: InfoLogger, parallelism: usize) -> Self {
        Self { logger, parallelism: parallelism.max(1) }
    }

    /// Creates a new instance of `Environment` with a logger which ignores all messages.
    pub fn new_silent(parallelism: usize) -> Self {
        Self::new(Arc::new(|_: &str| {}), parallelism)
    }

    /// Writes a message using the environment's logger.
    pub fn log(&self, message: &str) {
        (self.logger)(message)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Arc::new(|msg: &str| println!("{msg}")), num_cpus::get())
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").field("parallelism", &self.parallelism).finish_non_exhaustive()
    }
}
