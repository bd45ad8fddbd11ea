use std::fmt;
use std::time::Duration;

/// Every widget kind the dashboard knows how to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Clock,
    Memory,
    LinearAcceleration,
    AngularAcceleration,
    Color,
    Current,
    Power,
    LinearVelocity,
    AngularVelocity,
    Voltage,
}

pub const ALL_KINDS: [DeviceKind; 10] = [
    DeviceKind::Clock,
    DeviceKind::Memory,
    DeviceKind::LinearAcceleration,
    DeviceKind::AngularAcceleration,
    DeviceKind::Color,
    DeviceKind::Current,
    DeviceKind::Power,
    DeviceKind::LinearVelocity,
    DeviceKind::AngularVelocity,
    DeviceKind::Voltage,
];

impl DeviceKind {
    /// Maps a device type string to its kind. Unknown tags are `None`.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.family().eq_ignore_ascii_case(tag.trim()))
    }

    pub fn family(&self) -> &'static str {
        match self {
            DeviceKind::Clock => "Clock",
            DeviceKind::Memory => "Memory",
            DeviceKind::LinearAcceleration => "LinearAcceleration",
            DeviceKind::AngularAcceleration => "AngularAcceleration",
            DeviceKind::Color => "Color",
            DeviceKind::Current => "Current",
            DeviceKind::Power => "Power",
            DeviceKind::LinearVelocity => "LinearVelocity",
            DeviceKind::AngularVelocity => "AngularVelocity",
            DeviceKind::Voltage => "Voltage",
        }
    }

    /// Path segment between the device name and the metric path.
    pub fn category(&self) -> &'static str {
        match self {
            DeviceKind::Clock => "clock",
            DeviceKind::Memory => "memory",
            _ => "sensor",
        }
    }

    pub fn default_refresh(&self) -> Duration {
        match self {
            DeviceKind::Memory => Duration::from_millis(2000),
            _ => Duration::from_millis(1000),
        }
    }

    pub fn is_three_axis(&self) -> bool {
        matches!(
            self,
            DeviceKind::LinearAcceleration
                | DeviceKind::AngularAcceleration
                | DeviceKind::LinearVelocity
                | DeviceKind::AngularVelocity
        )
    }

    pub fn is_angular(&self) -> bool {
        matches!(
            self,
            DeviceKind::AngularAcceleration | DeviceKind::AngularVelocity
        )
    }

    /// Metrics fetched on every cycle. The first entry is the primary one:
    /// its response arms the next cycle.
    pub fn metrics(&self, frame: Frame) -> Vec<Metric> {
        match self {
            DeviceKind::Clock => vec![Metric::scalar("datetime", None)],
            DeviceKind::Memory => vec![Metric::scalar("byte/*", None)],
            DeviceKind::Color => vec![Metric::scalar("color/rgb/hex", None)],
            DeviceKind::Current => vec![Metric::scalar("current/mA", Some("mA"))],
            DeviceKind::Power => vec![Metric::scalar("power/W", Some("W"))],
            DeviceKind::Voltage => vec![Metric::scalar("voltage/V", Some("V"))],
            DeviceKind::LinearAcceleration => match frame {
                Frame::Linear => Metric::axes("acceleration/linear", "m_s2", "m/s^2"),
                Frame::Gravity => Metric::axes("acceleration/gravity", "g", "g"),
            },
            DeviceKind::AngularAcceleration => {
                Metric::axes("acceleration/angular", "rad_s2", "rad/s^2")
            }
            DeviceKind::LinearVelocity => Metric::axes("velocity/linear", "m_s", "m/s"),
            DeviceKind::AngularVelocity => Metric::axes("velocity/angular", "rad_s", "rad/s"),
        }
    }

    /// Direction shown next to an axis reading.
    pub fn direction(&self, axis: Axis) -> &'static str {
        match (self.is_angular(), axis) {
            (false, Axis::X) => "forth/back",
            (false, Axis::Y) => "left/right",
            (false, Axis::Z) => "up/down",
            (true, Axis::X) => "roll",
            (true, Axis::Y) => "pitch",
            (true, Axis::Z) => "yaw",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    fn segment(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Which acceleration quantity the LinearAcceleration widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    #[default]
    Linear,
    Gravity,
}

/// A leaf path under the device base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub path: String,
    pub unit: Option<&'static str>,
    pub axis: Option<Axis>,
}

impl Metric {
    fn scalar(path: &str, unit: Option<&'static str>) -> Self {
        Self {
            path: path.to_string(),
            unit,
            axis: None,
        }
    }

    fn axes(prefix: &str, leaf: &str, unit: &'static str) -> Vec<Self> {
        Axis::ALL
            .iter()
            .map(|axis| Self {
                path: format!("{}/{}/{}", prefix, axis.segment(), leaf),
                unit: Some(unit),
                axis: Some(*axis),
            })
            .collect()
    }
}

pub const MEMORY_COUNT_PATH: &str = "byte/count";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(DeviceKind::from_type_tag("Clock"), Some(DeviceKind::Clock));
        assert_eq!(
            DeviceKind::from_type_tag("linearvelocity"),
            Some(DeviceKind::LinearVelocity)
        );
        assert_eq!(DeviceKind::from_type_tag("Temperature"), None);
        assert_eq!(DeviceKind::from_type_tag(""), None);
    }

    #[test]
    fn test_refresh_defaults() {
        for kind in ALL_KINDS {
            let expected = if kind == DeviceKind::Memory { 2000 } else { 1000 };
            assert_eq!(kind.default_refresh(), Duration::from_millis(expected));
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(DeviceKind::Clock.category(), "clock");
        assert_eq!(DeviceKind::Memory.category(), "memory");
        assert_eq!(DeviceKind::Voltage.category(), "sensor");
        assert_eq!(DeviceKind::AngularVelocity.category(), "sensor");
    }

    #[test]
    fn test_acceleration_frames() {
        let linear = DeviceKind::LinearAcceleration.metrics(Frame::Linear);
        let gravity = DeviceKind::LinearAcceleration.metrics(Frame::Gravity);

        assert_eq!(linear[0].path, "acceleration/linear/x/m_s2");
        assert_eq!(linear[2].path, "acceleration/linear/z/m_s2");
        assert_eq!(linear[0].unit, Some("m/s^2"));
        assert_eq!(gravity[1].path, "acceleration/gravity/y/g");
        assert_eq!(gravity[1].unit, Some("g"));
    }

    #[test]
    fn test_primary_metric_is_x_axis() {
        for kind in ALL_KINDS.iter().filter(|k| k.is_three_axis()) {
            let metrics = kind.metrics(Frame::Linear);
            assert_eq!(metrics.len(), 3);
            assert_eq!(metrics[0].axis, Some(Axis::X));
        }
    }

    #[test]
    fn test_scalar_paths() {
        assert_eq!(DeviceKind::Clock.metrics(Frame::Linear)[0].path, "datetime");
        assert_eq!(DeviceKind::Memory.metrics(Frame::Linear)[0].path, "byte/*");
        assert_eq!(DeviceKind::Color.metrics(Frame::Linear)[0].path, "color/rgb/hex");
        assert_eq!(DeviceKind::Power.metrics(Frame::Linear)[0].unit, Some("W"));
        assert_eq!(
            DeviceKind::AngularVelocity.metrics(Frame::Gravity)[1].path,
            "velocity/angular/y/rad_s"
        );
    }

    #[test]
    fn test_directions() {
        assert_eq!(DeviceKind::LinearVelocity.direction(Axis::Y), "left/right");
        assert_eq!(DeviceKind::AngularAcceleration.direction(Axis::Z), "yaw");
    }
}
