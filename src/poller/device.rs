use log::debug;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::client::Transport;
use crate::error::{PollError, Result};
use crate::models::device::MEMORY_COUNT_PATH;
use crate::models::reading::parse_count;
use crate::models::{DeviceKind, Frame, Metric, Reading};
use crate::renderer::format;
use crate::renderer::surface::{Slot, Surface, SurfaceHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Unattached,
    Attached,
}

/// One remote sensor or peripheral polled by the dashboard.
pub struct Device {
    name: String,
    kind: DeviceKind,
    base_url: String,
    refresh: Duration,
    byte_count: Option<usize>,
    surface: Arc<OnceLock<SurfaceHandle>>,
}

impl Device {
    /// Builds a device from its type string. Unknown types give `None`.
    pub fn new(type_tag: &str, name: &str) -> Option<Self> {
        DeviceKind::from_type_tag(type_tag).map(|kind| Self::with_kind(kind, name))
    }

    pub fn with_kind(kind: DeviceKind, name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            base_url: format!("/devices/{}/{}", name, kind.category()),
            refresh: kind.default_refresh(),
            byte_count: None,
            surface: Arc::new(OnceLock::new()),
        }
    }

    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh
    }

    pub fn byte_count(&self) -> Option<usize> {
        self.byte_count
    }

    pub fn url(&self, metric_path: &str) -> String {
        format!("{}/{}", self.base_url, metric_path)
    }

    pub fn is_ready(&self) -> bool {
        self.kind != DeviceKind::Memory || self.byte_count.is_some()
    }

    pub fn state(&self) -> DeviceState {
        match self.surface.get() {
            Some(_) => DeviceState::Attached,
            None => DeviceState::Unattached,
        }
    }

    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.get()
    }

    pub(crate) fn attach_slot(&self) -> Arc<OnceLock<SurfaceHandle>> {
        Arc::clone(&self.surface)
    }

    /// Gives the device its display surface. Only the first call succeeds.
    pub fn attach(&self, surface: SurfaceHandle) -> Result<()> {
        attach(&self.surface, &self.name, surface)
    }

    /// Which acceleration quantity to fetch, read from the gravity checkbox.
    pub fn frame(&self) -> Frame {
        let checked = self
            .surface()
            .and_then(|surface| surface.lock().gravity().map(|c| c.is_checked()))
            .unwrap_or(false);

        if checked && self.kind == DeviceKind::LinearAcceleration {
            Frame::Gravity
        } else {
            Frame::Linear
        }
    }

    /// Asks a Memory device for its size. Only a positive count is kept.
    pub async fn probe(&mut self, transport: &dyn Transport) {
        if self.kind != DeviceKind::Memory || self.byte_count.is_some() {
            return;
        }

        let path = self.url(MEMORY_COUNT_PATH);
        match transport.get(&path).await.and_then(|body| parse_count(&path, &body)) {
            Ok(count) if count > 0 => self.byte_count = Some(count),
            Ok(_) => debug!("{}: memory reports no bytes yet", self.name),
            Err(e) => debug!("{}: byte count probe failed: {}", self.name, e),
        }
    }

    /// Builds the static markup once; Memory adds its table when ready.
    pub fn build_skeleton(&self, surface: &mut Surface) {
        if !surface.has_header() {
            surface.build_header(&self.to_string());
            match self.kind {
                DeviceKind::LinearAcceleration => {
                    surface.build_checkbox("Show gravity");
                    surface.build_axis_list();
                }
                kind if kind.is_three_axis() => surface.build_axis_list(),
                DeviceKind::Color => surface.build_swatch(),
                _ => {}
            }
        }

        if let (DeviceKind::Memory, Some(count)) = (self.kind, self.byte_count) {
            if !surface.has_table() {
                surface.write(Slot::Header, &self.to_string());
                surface.build_table(count);
            }
        }
    }

    /// One refresh cycle. `Ok` means the primary response was processed
    /// and the next cycle may be armed.
    pub async fn refresh(&mut self, transport: &Arc<dyn Transport>) -> Result<()> {
        self.probe(transport.as_ref()).await;

        let surface = self.surface().cloned();
        if let Some(surface) = &surface {
            self.build_skeleton(&mut surface.lock());
        }

        let label = self.to_string();
        let mut metrics = self.kind.metrics(self.frame()).into_iter();
        let Some(primary) = metrics.next() else {
            return Ok(());
        };

        // Secondary metrics are not tied to the reschedule.
        for metric in metrics {
            let transport = Arc::clone(transport);
            let surface = surface.clone();
            let path = self.url(&metric.path);
            let kind = self.kind;
            let label = label.clone();
            let name = self.name.clone();
            tokio::spawn(async move {
                let result = match transport.get(&path).await {
                    Ok(body) => apply(kind, &label, &metric, &path, &body, surface.as_ref()),
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    debug!("{}: skipped {}: {}", name, metric.path, e);
                }
            });
        }

        let path = self.url(&primary.path);
        let body = transport.get(&path).await?;
        apply(self.kind, &label, &primary, &path, &body, surface.as_ref())
    }
}

pub(crate) fn attach(
    slot: &OnceLock<SurfaceHandle>,
    name: &str,
    surface: SurfaceHandle,
) -> Result<()> {
    slot.set(surface)
        .map_err(|_| PollError::AlreadyAttached(name.to_string()))
}

/// Formats one response and writes it into its slot, if there is a surface.
fn apply(
    kind: DeviceKind,
    label: &str,
    metric: &Metric,
    path: &str,
    body: &str,
    surface: Option<&SurfaceHandle>,
) -> Result<()> {
    let reading = match kind {
        DeviceKind::Memory => Reading::bytes(path, body)?,
        _ => Reading::scalar(body),
    };

    let Some(surface) = surface else {
        return Ok(());
    };
    let mut surface = surface.lock();

    match reading {
        Reading::Bytes(bytes) => {
            for (offset, value) in bytes {
                surface.write(Slot::Byte(offset), &format::hex_byte(value));
            }
        }
        Reading::Scalar(value) => match (kind, metric.axis, metric.unit) {
            (DeviceKind::Color, _, _) => {
                surface.write(Slot::ColorValue, &value);
                surface.set_style(&format::colour_style(&value));
            }
            (_, Some(axis), unit) => {
                let line = format::axis_line(kind, axis, &value, unit.unwrap_or(""));
                surface.write(Slot::Axis(axis), &line);
            }
            (_, None, Some(unit)) => {
                surface.write(Slot::Header, &format::with_unit(label, &value, unit));
            }
            (_, None, None) => {
                surface.write(Slot::Header, &format::with_label(label, &value));
            }
        },
    }

    Ok(())
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeviceKind::Memory => write!(
                f,
                "{}: Memory ({} bytes):",
                self.name,
                self.byte_count.unwrap_or(0)
            ),
            kind => write!(f, "{}: {}", self.name, kind.family()),
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("refresh", &self.refresh)
            .field("byte_count", &self.byte_count)
            .field("state", &self.state())
            .finish()
    }
}
