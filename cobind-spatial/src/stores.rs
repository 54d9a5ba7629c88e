use log::debug;

use cobind_core::errors::CobindError;
use cobind_core::models::{Factor, FactorRoster};
use cobind_core::traits::SignalStore;

///
/// One open signal store per configured factor, indexed by factor id.
///
/// Every store is closed when the set is dropped, including when opening a
/// later factor's store fails part way through.
///
pub struct OpenStores<S: SignalStore> {
    stores: Vec<S>,
}

impl<S: SignalStore> OpenStores<S> {
    pub fn open_all<F>(roster: &FactorRoster, mut opener: F) -> Result<OpenStores<S>, CobindError>
    where
        F: FnMut(&Factor) -> Result<S, CobindError>,
    {
        let mut opened = OpenStores {
            stores: Vec::with_capacity(roster.len()),
        };
        for factor in &roster.factors {
            let store = opener(factor)?;
            debug!("Opened signal store for {}", factor.name);
            opened.stores.push(store);
        }
        Ok(opened)
    }

    pub fn get(&self, factor_id: usize) -> Option<&S> {
        self.stores.get(factor_id)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Close every store now.
    pub fn release(self) {
        drop(self)
    }
}

impl<S: SignalStore> Drop for OpenStores<S> {
    fn drop(&mut self) {
        for store in self.stores.iter_mut() {
            store.close();
        }
    }
}
