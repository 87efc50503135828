//! Process-wide audio session
//!
//! The host drives everything from one thread, and output devices are tied
//! to the thread that opened them, so the shared session lives in a
//! thread-local slot. It is built on first access and kept until the thread
//! exits. Code that can take the session explicitly (the frame driver,
//! tests) should construct its own with [`AudioSessionManager::open`].

use std::cell::{OnceCell, RefCell};

use super::graph::default_graph;
use super::manager::{AudioSessionManager, SessionSettings};
use super::DEFAULT_ASSET_ROOT;

thread_local! {
    static INSTANCE: OnceCell<RefCell<AudioSessionManager>> = const { OnceCell::new() };
}

/// Run `f` on the shared session, creating it on the first call
///
/// `asset_root` only matters for the call that creates the session; later
/// calls ignore it. Calling back into `with_instance` from inside `f` panics.
pub fn with_instance<R>(
    asset_root: Option<&str>,
    f: impl FnOnce(&mut AudioSessionManager) -> R,
) -> R {
    INSTANCE.with(|slot| {
        let session = slot.get_or_init(|| {
            let root = asset_root.unwrap_or(DEFAULT_ASSET_ROOT);
            RefCell::new(AudioSessionManager::open(
                SessionSettings::new(root),
                default_graph(),
            ))
        });
        f(&mut session.borrow_mut())
    })
}

/// Whether the shared session has been created on this thread
pub fn is_initialized() -> bool {
    INSTANCE.with(|slot| slot.get().is_some())
}
