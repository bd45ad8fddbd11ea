use crate::models::{Axis, DeviceKind};

/// Columns per memory table row.
pub const MEMORY_COLUMNS: usize = 16;

/// Two-digit uppercase hex. Only the two lowest digits survive.
pub fn hex_byte(value: u32) -> String {
    format!("{:02X}", value & 0xFF)
}

pub fn column_label(column: usize) -> String {
    format!("{:X}", column)
}

pub fn offset_label(row: usize) -> String {
    format!("0x{:04X}:", (row * MEMORY_COLUMNS) & 0xFFFF)
}

pub fn with_label(label: &str, value: &str) -> String {
    format!("{}: {}", label, value)
}

pub fn with_unit(label: &str, value: &str, unit: &str) -> String {
    format!("{}: {} {}", label, value, unit)
}

pub fn colour_style(hex: &str) -> String {
    format!("background-color:{}; color:{}", hex, hex)
}

/// One line of the X/Y/Z list.
pub fn axis_line(kind: DeviceKind, axis: Axis, value: &str, unit: &str) -> String {
    let arrow = match (kind.is_angular(), axis) {
        (false, Axis::X) => "-->",
        (false, _) => "---->",
        (true, Axis::X) => "---->",
        (true, Axis::Y) => "-->",
        (true, Axis::Z) => "--->",
    };
    format!(
        "{}-axis -- ({}) {} {} {}",
        axis.letter(),
        kind.direction(axis),
        arrow,
        value,
        unit
    )
}
