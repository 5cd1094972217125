use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::store::LocaleStore;

/// Mutable access to a [`LocaleStore`] that saves every locale when dropped.
///
/// The save runs on normal scope exit, early return, `?` propagation and
/// unwinding. `Drop` can't report errors, so failures are logged.
pub struct SaveGuard<'a> {
    store: Option<&'a mut LocaleStore>,
    dir: Option<PathBuf>,
}

impl<'a> SaveGuard<'a> {
    pub(crate) fn new(store: &'a mut LocaleStore, dir: Option<PathBuf>) -> Self {
        Self {
            store: Some(store),
            dir,
        }
    }

    pub fn target_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Give the store back without saving.
    pub fn into_inner(mut self) -> &'a mut LocaleStore {
        match self.store.take() {
            Some(store) => store,
            // `store` is only taken here and in `drop`.
            None => unreachable!("SaveGuard store already released"),
        }
    }
}

impl Deref for SaveGuard<'_> {
    type Target = LocaleStore;

    fn deref(&self) -> &LocaleStore {
        match &self.store {
            Some(store) => store,
            None => unreachable!("SaveGuard store already released"),
        }
    }
}

impl DerefMut for SaveGuard<'_> {
    fn deref_mut(&mut self) -> &mut LocaleStore {
        match &mut self.store {
            Some(store) => store,
            None => unreachable!("SaveGuard store already released"),
        }
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        let Some(store) = self.store.take() else {
            return;
        };
        match store.save_all(self.dir.as_deref()) {
            Ok(written) => debug!(written, "SaveGuard: saved on scope exit"),
            Err(e) => warn!(error = %e, "SaveGuard: save on scope exit failed"),
        }
    }
}
