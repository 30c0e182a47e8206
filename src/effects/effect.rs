//! One-shot effect descriptions.

use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Errors produced by running an effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error("Effect '{name}' failed: {message}")]
    Failed { name: String, message: String },

    #[error("Effect environment unavailable: {0}")]
    Environment(String),
}

impl EffectError {
    /// Shorthand for [`EffectError::Failed`].
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Factory producing a fresh effect each time it is run.
pub type EffectAction<E, Env> =
    Arc<dyn Fn() -> BoxedEffect<Option<E>, EffectError, Env> + Send + Sync>;

/// Description of an asynchronous operation queued by a step.
///
/// The engine only stores and forwards effects; the caller runs them (see
/// [`Machine`](crate::runner::Machine)) and feeds the optional resulting event
/// back into [`Statechart::send`](crate::core::Statechart::send).
///
/// Like transition actions in an effect system, an `Effect` holds a factory
/// rather than the effect itself, so the same description can be run more
/// than once.
pub struct Effect<E, Env = ()> {
    name: String,
    action: EffectAction<E, Env>,
}

impl<E, Env> Effect<E, Env>
where
    E: Send + 'static,
    Env: Clone + Send + Sync + 'static,
{
    /// Create an effect from a factory.
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> BoxedEffect<Option<E>, EffectError, Env> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(factory),
        }
    }

    /// Create an effect from a synchronous function of the environment.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Env) -> Result<Option<E>, EffectError> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(name, move || {
            let f = Arc::clone(&f);
            from_fn(move |env: &Env| (*f)(env)).boxed()
        })
    }

    /// Effect that immediately yields `event`.
    pub fn send(event: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new("send", move || pure(Some(event.clone())).boxed())
    }

    /// Effect that does nothing and yields no event.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, || pure(None).boxed())
    }
}

impl<E, Env> Effect<E, Env> {
    /// Name given at construction, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a fresh runnable effect.
    pub fn action(&self) -> BoxedEffect<Option<E>, EffectError, Env> {
        (*self.action)()
    }
}

impl<E, Env> Clone for Effect<E, Env> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<E, Env> fmt::Debug for Effect<E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillwater::effect::Effect as _;

    #[derive(Clone, Debug, PartialEq)]
    enum TestEvent {
        Loaded(u32),
    }

    #[derive(Clone)]
    struct TestEnv {
        value: u32,
    }

    #[tokio::test]
    async fn send_effect_yields_event() {
        let effect: Effect<TestEvent, ()> = Effect::send(TestEvent::Loaded(1));

        let result = effect.action().run(&()).await.unwrap();

        assert_eq!(result, Some(TestEvent::Loaded(1)));
        assert_eq!(effect.name(), "send");
    }

    #[tokio::test]
    async fn from_fn_reads_environment() {
        let effect: Effect<TestEvent, TestEnv> =
            Effect::from_fn("load", |env: &TestEnv| Ok(Some(TestEvent::Loaded(env.value))));

        let result = effect.action().run(&TestEnv { value: 7 }).await.unwrap();

        assert_eq!(result, Some(TestEvent::Loaded(7)));
    }

    #[tokio::test]
    async fn effect_can_run_twice() {
        let effect: Effect<TestEvent, ()> = Effect::send(TestEvent::Loaded(2));

        let first = effect.action().run(&()).await.unwrap();
        let second = effect.clone().action().run(&()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failing_effect_reports_error() {
        let effect: Effect<TestEvent, ()> =
            Effect::from_fn("save", |_: &()| Err(EffectError::failed("save", "disk full")));

        let result = effect.action().run(&()).await;

        assert_eq!(result, Err(EffectError::failed("save", "disk full")));
    }

    #[tokio::test]
    async fn noop_yields_nothing() {
        let effect: Effect<TestEvent, ()> = Effect::noop("idle");

        assert_eq!(effect.action().run(&()).await.unwrap(), None);
    }
}
