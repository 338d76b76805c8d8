use std::sync::Mutex;
use tokio::sync::Notify;

/// Store lifecycle states (spec.md §4.1 "lifecycle"). Callers issuing
/// queries or updates while the store is `Opening` or `Deleting` should
/// await [`Lifecycle::settle`] rather than fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Opening,
    Open,
    Error,
    Deleting,
}

pub struct Lifecycle {
    state: Mutex<State>,
    notify: Notify,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Idle),
            notify: Notify::new(),
        }
    }

    pub fn get(&self) -> State {
        *self.state.lock().expect("lifecycle mutex poisoned")
    }

    pub fn set(&self, next: State) {
        *self.state.lock().expect("lifecycle mutex poisoned") = next;
        self.notify.notify_waiters();
    }

    /// Waits until the store leaves a transient state (`Opening`,
    /// `Deleting`) and settles on `Open`, `Idle`, or `Error`.
    pub async fn settle(&self) -> State {
        loop {
            let current = self.get();
            if !matches!(current, State::Opening | State::Deleting) {
                return current;
            }
            self.notify.notified().await;
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn settle_returns_immediately_once_stable() {
        let lc = Lifecycle::new();
        lc.set(State::Open);
        assert_eq!(lc.settle().await, State::Open);
    }

    #[tokio::test]
    async fn settle_waits_for_a_transient_state_to_resolve() {
        let lc = Arc::new(Lifecycle::new());
        lc.set(State::Opening);
        let waiter = {
            let lc = lc.clone();
            tokio::spawn(async move { lc.settle().await })
        };
        tokio::task::yield_now().await;
        lc.set(State::Open);
        assert_eq!(waiter.await.unwrap(), State::Open);
    }
}
