//! Process hook installer.
//!
//! # Data Flow
//! ```text
//! Dispatcher construction
//!     → install() (first call in the process only)
//!         install_error_handler     → bridge.rs: WARN/ERROR tracing events → dispatcher
//!         install_exception_handler → panic.rs: any panic → critical record
//!         install_fatal_handler     → panic.rs: main-thread panic → emergency record
//! ```
//!
//! # Design Decisions
//! - Non-exclusive: the previous panic hook still runs, console output stays
//! - Installed at most once per process, by the first dispatcher built

pub mod bridge;
pub mod panic;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatcher::Dispatcher;
use crate::observability::logging;

pub use bridge::DispatchLayer;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the hooks requested by the dispatcher's configuration.
///
/// Returns `false` when hooks were already claimed by an earlier dispatcher
/// or none are requested.
pub fn install(dispatcher: &Dispatcher) -> bool {
    let config = dispatcher.config();
    if !config.wants_hooks() {
        return false;
    }
    if INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        tracing::debug!(facility = %dispatcher.facility(), "Process hooks already installed");
        return false;
    }

    if config.install_error_handler {
        let bridged = logging::init_logging_with(
            &config.observability.log_level,
            DispatchLayer::new(dispatcher.clone()),
        );
        if !bridged {
            tracing::debug!("Global subscriber already set, tracing bridge not installed");
        }
    }

    if config.install_exception_handler || config.install_fatal_handler {
        panic::install(
            dispatcher.clone(),
            panic::PanicPolicy {
                uncaught: config.install_exception_handler,
                fatal: config.install_fatal_handler,
            },
        );
    }

    tracing::debug!(
        facility = %dispatcher.facility(),
        error_handler = config.install_error_handler,
        exception_handler = config.install_exception_handler,
        fatal_handler = config.install_fatal_handler,
        "Process hooks installed"
    );
    true
}

/// Whether an earlier dispatcher already installed the hooks.
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}
