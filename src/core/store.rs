//! Observable state shared between the client core and whatever renders it.

use tokio::sync::watch;

/// Cloneable handle to a value that notifies subscribers on every change.
///
/// Views hold a [`watch::Receiver`] from [`Store::subscribe`] and re-render
/// when it reports a change; writers go through `set` or `update`.
#[derive(Debug)]
pub struct Store<T> {
    tx: watch::Sender<T>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(mutate);
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that observes every change made after this call.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_update_are_visible_to_readers() {
        let store = Store::new(vec![1]);
        store.update(|values| values.push(2));
        assert_eq!(store.get(), vec![1, 2]);

        store.set(vec![9]);
        assert_eq!(store.read(|values| values.len()), 1);
    }

    #[tokio::test]
    async fn subscribers_see_changes_made_through_any_clone() {
        let store = Store::new(0_u32);
        let writer = store.clone();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        writer.set(5);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 5);

        writer.update(|value| *value += 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 6);
    }

    #[test]
    fn subscriber_count_tracks_live_receivers() {
        let store: Store<String> = Store::default();
        assert_eq!(store.subscriber_count(), 0);
        let rx = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(rx);
        assert_eq!(store.subscriber_count(), 0);
    }
}
