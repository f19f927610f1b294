use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

pub struct PropertySubscriber {
    receiver: broadcast::Receiver<()>,
}

// PropertySubscriber intentionally does not implement Clone.
// Each subscriber should be unique; to get multiple subscribers, call
// Property::subscribe() multiple times.

impl PropertySubscriber {
    pub async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(_) => return true,
                // If we lagged behind, skip to the latest and keep waiting
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                // Channel closed: no more updates
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    pub fn try_recv(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(broadcast::error::TryRecvError::Empty) => false,
            // Consider lag as a change signal; the next recv() will align
            Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(broadcast::error::TryRecvError::Closed) => false,
        }
    }
}

/// Observable value cell. The watch channel holds the current value;
/// the broadcast channel carries change notifications to subscribers.
pub struct Property<T: Clone + Send + Sync> {
    watch_sender: Arc<watch::Sender<T>>,
    watch_receiver: watch::Receiver<T>,
    broadcast_sender: broadcast::Sender<()>,
    name: String,
}

impl<T: Clone + Send + Sync> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (watch_sender, watch_receiver) = watch::channel(initial_value);
        let (broadcast_sender, _) = broadcast::channel(100);
        Self {
            watch_sender: Arc::new(watch_sender),
            watch_receiver,
            broadcast_sender,
            name: name.into(),
        }
    }

    pub async fn get(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    /// Get the value synchronously. Safe from any thread; the value is
    /// already in memory.
    pub fn get_sync(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    pub async fn set(&self, new_value: T) {
        let _ = self.watch_sender.send(new_value);
        let _ = self.broadcast_sender.send(());
    }

    pub async fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        let mut new_value = self.watch_receiver.borrow().clone();
        updater(&mut new_value);
        let _ = self.watch_sender.send(new_value);
        let _ = self.broadcast_sender.send(());
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        PropertySubscriber {
            receiver: self.broadcast_sender.subscribe(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Clone + Send + Sync> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            watch_sender: self.watch_sender.clone(),
            watch_receiver: self.watch_receiver.clone(),
            broadcast_sender: self.broadcast_sender.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_notifies_subscribers() {
        let prop = Property::new(1i32, "counter");
        let mut subscriber = prop.subscribe();

        assert!(!subscriber.try_recv());
        prop.set(2).await;

        assert!(subscriber.try_recv());
        assert_eq!(prop.get().await, 2);
    }

    #[tokio::test]
    async fn update_mutates_in_place() {
        let prop = Property::new(vec![1, 2], "items");
        prop.update(|items| items.push(3)).await;
        assert_eq!(prop.get_sync(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let prop = Property::new("a".to_string(), "label");
        let clone = prop.clone();

        prop.set("b".to_string()).await;
        assert_eq!(clone.get_sync(), "b");
    }
}
