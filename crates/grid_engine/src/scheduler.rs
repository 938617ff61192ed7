use tokio::task::JoinHandle;

/// Handle to one delayed task. Replacing or dropping it cancels the previous task.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `handle`, aborting whatever was armed before.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    /// Returns true if a task was still pending when cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
