//! # Storefront Runtime
//!
//! Runtime implementation for the storefront cart.
//!
//! This crate provides the [`Store`]: the single owner of a feature's state and
//! the only place actions enter the reducer.
//!
//! ## Core Components
//!
//! - **Store**: Holds the state behind a lock and serializes every action
//! - **Effect Executor**: Runs effect descriptions and feeds produced actions back
//! - **Cascade Loop**: Drains the action → reducer → effects → action loop
//!   before `send` returns
//!
//! ## Execution Model
//!
//! `send` takes the write lock, runs the reducer, and awaits every effect the
//! reducer returned (and every effect produced by fed-back actions) before the
//! lock is released. When `send` returns, the new state is visible and all of
//! its side effects have completed. Two concurrent `send` calls never
//! interleave.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use storefront_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// A single `send` fed back more actions than the configured limit
        ///
        /// This usually means an effect keeps producing the action that
        /// triggered it. Actions processed before the limit remain applied.
        #[error("Action cascade exceeded {0} actions")]
        CascadeLimit(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use storefront_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_cascade(16);
/// assert_eq!(config.max_cascade, 16);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of actions one `send` may process, including the
    /// initial action and all actions fed back by effects
    pub max_cascade: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_cascade: usize) -> Self {
        Self { max_cascade }
    }

    /// Set the cascade limit
    #[must_use]
    pub const fn with_max_cascade(mut self, max_cascade: usize) -> Self {
        self.max_cascade = max_cascade;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_cascade: 64 }
    }
}

/// Execute one effect to completion, returning the action it produced
///
/// - `None`: No-op
/// - `Future`: Awaited; a `Some(action)` result is returned for feedback
async fn run_effect<A>(effect: Effect<A>) -> Option<A> {
    match effect {
        Effect::None => {
            tracing::trace!("Executing Effect::None (no-op)");
            metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            None
        },
        Effect::Future(fut) => {
            tracing::trace!("Executing Effect::Future");
            metrics::counter!("store.effects.executed", "type" => "future").increment(1);
            fut.await
        },
    }
}

/// Store module - The runtime coordinator
pub mod store {
    use super::{
        Arc, AtomicBool, Ordering, Reducer, RwLock, StoreConfig, StoreError, VecDeque, run_effect,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, single writer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Access the injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Stop accepting actions
        ///
        /// Any `send` already holding the write lock finishes normally. Later
        /// calls return [`StoreError::ShutdownInProgress`].
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether `shutdown` has been called on this store or any clone
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Awaits every returned effect
        /// 4. Feeds any produced actions back through the reducer, repeating
        ///    until no actions remain
        /// 5. Releases the lock
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`] if the store is shutting down.
        /// - [`StoreError::CascadeLimit`] if the feedback loop exceeds
        ///   [`StoreConfig::max_cascade`] actions.
        ///
        /// # Panics
        ///
        /// If the reducer or an effect panics, the panic propagates to the caller.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shut_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed == self.config.max_cascade {
                    tracing::error!(
                        limit = self.config.max_cascade,
                        dropped = queue.len() + 1,
                        "Action cascade limit reached"
                    );
                    metrics::counter!("store.cascade.limit_reached").increment(1);
                    return Err(StoreError::CascadeLimit(self.config.max_cascade));
                }
                processed += 1;

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut *state, action, &*self.environment)
                };
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                for effect in effects {
                    queue.extend(run_effect(effect).await);
                }
            }

            tracing::debug!(actions = processed, "Action processing completed");
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let line_count = store.state(|s| s.items.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }
    }
}

pub use store::Store;
