//! Optimistic local mutation with rollback
//!
//! An [`OptimisticUpdate`] is a command object holding the value before the
//! change (`prior`), the value after it (`desired`) and the setter used to
//! apply either one. `run` applies `desired` immediately, awaits the
//! persisting call and restores `prior` if that call fails.

use crate::{ClientError, ClientResult};
use std::future::Future;

pub struct OptimisticUpdate<T, F>
where
    T: Clone,
    F: Fn(T),
{
    pub prior: T,
    pub desired: T,
    set: F,
}

impl<T, F> OptimisticUpdate<T, F>
where
    T: Clone + std::fmt::Debug,
    F: Fn(T),
{
    pub fn new(prior: T, desired: T, set: F) -> Self {
        Self { prior, desired, set }
    }

    pub fn apply(&self) {
        (self.set)(self.desired.clone());
    }

    pub fn revert(&self) {
        (self.set)(self.prior.clone());
    }

    /// Apply, persist, and roll back on failure
    ///
    /// The persisting error is folded into a single
    /// [`ClientError::OptimisticUpdate`] carrying its user message.
    pub async fn run<Fut, O>(self, persist: Fut) -> ClientResult<O>
    where
        Fut: Future<Output = ClientResult<O>>,
    {
        self.apply();
        match persist.await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.revert();
                tracing::warn!(
                    prior = ?self.prior,
                    desired = ?self.desired,
                    error = %e,
                    "Optimistic update rolled back"
                );
                Err(ClientError::OptimisticUpdate {
                    message: e.user_message(),
                })
            }
        }
    }
}
