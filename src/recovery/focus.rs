//! Focus bookkeeping for the OTP cells.
//!
//! Cells register a [`FocusHandle`] under their index when they are mounted and
//! unregister it when they go away. The registry tracks the logical focus on its
//! own, so moving focus to a cell without a handle is a no-op for the view but
//! still keeps the index consistent.

use std::{collections::BTreeMap, fmt, sync::Arc};

/// Something that can take input focus, e.g. a terminal cell or a DOM input.
pub trait FocusHandle: Send + Sync {
    fn focus(&self);
}

#[derive(Default)]
pub struct FocusRegistry {
    handles: BTreeMap<usize, Arc<dyn FocusHandle>>,
    focused: Option<usize>,
}

impl FocusRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a handle for `index`, replacing any previous one. If the cell is
    /// already the logical focus, the new handle receives it.
    pub fn register(&mut self, index: usize, handle: Arc<dyn FocusHandle>) {
        if self.focused == Some(index) {
            handle.focus();
        }
        self.handles.insert(index, handle);
    }

    pub fn unregister(&mut self, index: usize) -> Option<Arc<dyn FocusHandle>> {
        self.handles.remove(&index)
    }

    /// Moves focus to `index`. Returns `true` when a handle was invoked.
    ///
    /// The handle is called even if `index` is already the logical focus: the
    /// user may have moved the real focus elsewhere without telling the
    /// registry. Handles must tolerate being focused twice.
    pub fn focus(&mut self, index: usize) -> bool {
        self.focused = Some(index);

        match self.handles.get(&index) {
            Some(handle) => {
                handle.focus();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    #[must_use]
    pub fn is_mounted(&self, index: usize) -> bool {
        self.handles.contains_key(&index)
    }
}

impl fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRegistry")
            .field("mounted", &self.handles.keys().collect::<Vec<_>>())
            .field("focused", &self.focused)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub(crate) struct CountingHandle {
        pub(crate) calls: AtomicUsize,
    }

    impl CountingHandle {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FocusHandle for CountingHandle {
        fn focus(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn refocusing_the_same_cell_calls_the_handle_again() {
        let handle = Arc::new(CountingHandle::default());
        let mut registry = FocusRegistry::new();
        registry.register(2, handle.clone());

        assert!(registry.focus(2));
        assert!(registry.focus(2));
        assert_eq!(handle.calls(), 2);
        assert_eq!(registry.focused(), Some(2));
    }

    #[test]
    fn focus_on_unmounted_cell_is_safe() {
        let handle = Arc::new(CountingHandle::default());
        let mut registry = FocusRegistry::new();
        registry.register(1, handle.clone());
        assert!(registry.unregister(1).is_some());

        assert!(!registry.focus(1));
        assert_eq!(registry.focused(), Some(1));
        assert_eq!(handle.calls(), 0);
        assert!(!registry.is_mounted(1));
    }

    #[test]
    fn late_mount_receives_pending_focus() {
        let handle = Arc::new(CountingHandle::default());
        let mut registry = FocusRegistry::new();
        assert!(!registry.focus(0));

        registry.register(0, handle.clone());
        assert_eq!(handle.calls(), 1);
    }
}
