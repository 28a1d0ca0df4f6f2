//! Panic hook reporting uncaught and fatal panics.

use std::any::Any;
use std::panic;
use std::thread;

use serde_json::json;

use crate::context::{CallSite, RequestContext};
use crate::dispatcher::Dispatcher;
use crate::logger::Level;

/// Which panics get reported.
///
/// The hook runs before unwinding, so it cannot tell whether a panic will be
/// caught. A panic on the thread named `main` is reported as fatal even when
/// a `catch_unwind` further up recovers from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicPolicy {
    /// Panics on any thread.
    pub uncaught: bool,
    /// Panics on the main thread, which normally end the process.
    pub fatal: bool,
}

impl PanicPolicy {
    /// Level and message prefix for a panic on the named thread.
    pub fn classify(&self, thread: Option<&str>) -> Option<(Level, &'static str)> {
        if self.fatal && thread == Some("main") {
            Some((Level::Emergency, "Fatal error"))
        } else if self.uncaught {
            Some((Level::Critical, "Uncaught panic"))
        } else {
            None
        }
    }
}

/// Chain a reporting hook in front of the current one.
pub fn install(dispatcher: Dispatcher, policy: PanicPolicy) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let current = thread::current();
        if let Some((level, prefix)) = policy.classify(current.name()) {
            let site = info
                .location()
                .map(CallSite::from)
                .unwrap_or_else(CallSite::unknown);
            let request = RequestContext::current();
            dispatcher.log_with(
                level,
                &format!("{prefix}: {}", payload_message(info.payload())),
                json!({ "thread": current.name().unwrap_or("unnamed") }),
                &site,
                request.as_ref(),
            );
        }
        previous(info);
    }));
}

/// Text of a panic payload.
pub fn payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let both = PanicPolicy { uncaught: true, fatal: true };
        assert_eq!(both.classify(Some("main")), Some((Level::Emergency, "Fatal error")));
        assert_eq!(both.classify(Some("worker")), Some((Level::Critical, "Uncaught panic")));

        let fatal_only = PanicPolicy { uncaught: false, fatal: true };
        assert_eq!(fatal_only.classify(None), None);
        assert_eq!(fatal_only.classify(Some("main")).map(|c| c.0), Some(Level::Emergency));

        let uncaught_only = PanicPolicy { uncaught: true, fatal: false };
        assert_eq!(uncaught_only.classify(Some("main")).map(|c| c.0), Some(Level::Critical));
    }

    #[test]
    fn test_main_thread_is_fatal_whatever_the_outcome() {
        // Same answer whether or not the panic is later caught.
        let policy = PanicPolicy { uncaught: false, fatal: true };
        let caught = std::thread::Builder::new()
            .name("main".into())
            .spawn(move || {
                let name = thread::current().name().map(str::to_string);
                policy.classify(name.as_deref())
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(caught, Some((Level::Emergency, "Fatal error")));
    }

    #[test]
    fn test_payload_message() {
        let text: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(payload_message(text.as_ref()), "static text");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned text"));
        assert_eq!(payload_message(owned.as_ref()), "owned text");

        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(payload_message(other.as_ref()), "Box<dyn Any>");
    }
}
