//! Long-running activities tied to a state's lifetime.

use std::sync::Arc;

/// Callback an activity uses to post events back to whoever runs the chart.
pub type SendFn<E> = Arc<dyn Fn(E) + Send + Sync>;

/// A long-running process started when a state is entered and stopped when
/// it is exited.
///
/// The engine never calls `start` or `stop`; it only reports which
/// activities a step began and ended. Implementations usually keep their
/// handle (timer, subscription) behind interior mutability.
///
/// # Example
///
/// ```rust
/// use harel::effects::{Activity, SendFn};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Blinker {
///     running: AtomicBool,
/// }
///
/// impl Activity<&'static str> for Blinker {
///     fn start(&self, send: SendFn<&'static str>) {
///         self.running.store(true, Ordering::SeqCst);
///         send("blink");
///     }
///
///     fn stop(&self) {
///         self.running.store(false, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait Activity<E>: Send + Sync {
    /// Begin the activity.
    fn start(&self, send: SendFn<E>);

    /// End the activity.
    fn stop(&self);

    /// Name used in logs and diagnostics.
    fn name(&self) -> &str {
        "activity"
    }
}

/// Shared handle to an activity, as stored in a [`State`](crate::core::State).
pub type ActivityHandle<E> = Arc<dyn Activity<E>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl Activity<u8> for Recorder {
        fn start(&self, send: SendFn<u8>) {
            self.log.lock().unwrap().push("start".into());
            send(1);
        }

        fn stop(&self) {
            self.log.lock().unwrap().push("stop".into());
        }
    }

    #[test]
    fn activity_posts_through_send_fn() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let send: SendFn<u8> = Arc::new(move |event| sink.lock().unwrap().push(event));

        let activity = Recorder::default();
        activity.start(send);
        activity.stop();

        assert_eq!(*received.lock().unwrap(), vec![1]);
        assert_eq!(*activity.log.lock().unwrap(), vec!["start", "stop"]);
    }

    #[test]
    fn default_name_is_generic() {
        let handle: ActivityHandle<u8> = Arc::new(Recorder::default());
        assert_eq!(handle.name(), "activity");
    }
}
