use log::{debug, info, warn};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::Transport;
use crate::error::Result;
use crate::poller::device::{self, Device};
use crate::renderer::surface::SurfaceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Stop polling once the primary metric fails to update.
    pub halt_on_failure: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            halt_on_failure: true,
        }
    }
}

/// Owns a running poll loop. Dropping the handle stops the loop too.
pub struct PollerHandle {
    name: String,
    surface: Arc<OnceLock<SurfaceHandle>>,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Starts the refresh loop for `device` on the current runtime.
pub fn spawn(mut device: Device, transport: Arc<dyn Transport>, policy: PollPolicy) -> PollerHandle {
    let (stop, mut stopped) = watch::channel(false);
    let name = device.name().to_string();
    let surface = device.attach_slot();

    let task = tokio::spawn(async move {
        info!(
            "{}: polling {} every {} ms",
            device.name(),
            device.base_url(),
            device.refresh_interval().as_millis()
        );

        loop {
            let cycle = tokio::select! {
                result = device.refresh(&transport) => result,
                _ = stopped.changed() => break,
            };

            if let Err(e) = cycle {
                if policy.halt_on_failure {
                    warn!("{}: polling halted: {}", device.name(), e);
                    break;
                }
                debug!("{}: no update this cycle: {}", device.name(), e);
            }

            tokio::select! {
                _ = tokio::time::sleep(device.refresh_interval()) => {}
                _ = stopped.changed() => break,
            }
        }

        debug!("{}: poller finished", device.name());
    });

    PollerHandle {
        name,
        surface,
        stop,
        task,
    }
}

impl PollerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the display surface of a device that is already polling.
    pub fn attach(&self, surface: SurfaceHandle) -> Result<()> {
        device::attach(&self.surface, &self.name, surface)
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface.get().cloned()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops further polling and waits for the loop to exit.
    pub async fn detach(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            warn!("{}: poller task failed: {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::renderer::surface::Surface;
    use std::time::Duration;

    const DATETIME: &str = "/devices/clk1/clock/datetime";

    fn clock_transport() -> Arc<MockTransport> {
        let mock = Arc::new(MockTransport::new());
        mock.respond(DATETIME, "2024-01-01T00:00:00");
        mock
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_end_to_end() {
        let mock = clock_transport();
        let device = Device::new("Clock", "clk1").unwrap();
        let surface = Surface::handle();
        device.attach(surface.clone()).unwrap();

        let handle = spawn(device, mock.clone(), PollPolicy::default());
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(
            surface.lock().header(),
            Some("clk1: Clock: 2024-01-01T00:00:00")
        );
        assert_eq!(mock.count(DATETIME), 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let times = mock.request_times(DATETIME);
        assert!(times.len() >= 2);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }

        handle.detach().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_while_polling() {
        let mock = clock_transport();
        let device = Device::new("Clock", "clk1").unwrap();
        let handle = spawn(device, mock.clone(), PollPolicy::default());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(handle.surface().is_none());

        let surface = Surface::handle();
        handle.attach(surface.clone()).unwrap();
        assert!(handle.attach(Surface::handle()).is_err());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(
            surface.lock().header(),
            Some("clk1: Clock: 2024-01-01T00:00:00")
        );
        assert_eq!(surface.lock().stats().header_builds, 1);
        handle.detach().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_primary_halts_loop() {
        let mock = Arc::new(MockTransport::new());
        mock.fail("/devices/p1/sensor/power/W", 500);
        let device = Device::new("Power", "p1").unwrap();
        let surface = Surface::handle();
        device.attach(surface.clone()).unwrap();

        let handle = spawn(device, mock.clone(), PollPolicy::default());
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(mock.count("/devices/p1/sensor/power/W"), 1);
        assert!(handle.is_finished());
        assert_eq!(surface.lock().header(), Some("p1: Power"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_polling_after_failure() {
        let mock = Arc::new(MockTransport::new());
        mock.fail("/devices/p1/sensor/power/W", 500);
        let device = Device::new("Power", "p1").unwrap();

        let policy = PollPolicy {
            halt_on_failure: false,
        };
        let handle = spawn(device, mock.clone(), policy);
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(mock.count("/devices/p1/sensor/power/W"), 4);
        assert!(!handle.is_finished());
        handle.detach().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_secondary_does_not_block_reschedule() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("/devices/v/sensor/velocity/linear/x/m_s", "1");
        mock.hang("/devices/v/sensor/velocity/linear/y/m_s");
        mock.respond("/devices/v/sensor/velocity/linear/z/m_s", "3");
        let device = Device::new("LinearVelocity", "v").unwrap();

        let handle = spawn(device, mock.clone(), PollPolicy::default());
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(mock.count("/devices/v/sensor/velocity/linear/x/m_s"), 4);
        handle.detach().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_primary_delays_reschedule() {
        let mock = Arc::new(MockTransport::new());
        mock.hang(DATETIME);
        let device = Device::new("Clock", "clk1").unwrap();

        let handle = spawn(device, mock.clone(), PollPolicy::default());
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(mock.count(DATETIME), 1);
        assert!(!handle.is_finished());
        handle.detach().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_stops_polling() {
        let mock = clock_transport();
        let device = Device::new("Clock", "clk1").unwrap();
        let handle = spawn(device, mock.clone(), PollPolicy::default());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.detach().await;
        let polled = mock.count(DATETIME);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(mock.count(DATETIME), polled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_polls_every_two_seconds() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("/devices/mem0/memory/byte/count", "16");
        mock.respond("/devices/mem0/memory/byte/*", "[]");
        let device = Device::new("Memory", "mem0").unwrap();

        let handle = spawn(device, mock.clone(), PollPolicy::default());
        tokio::time::sleep(Duration::from_millis(4500)).await;

        assert_eq!(mock.count("/devices/mem0/memory/byte/*"), 3);
        assert_eq!(mock.count("/devices/mem0/memory/byte/count"), 1);
        handle.detach().await;
    }
}
