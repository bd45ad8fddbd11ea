use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::Axis;
use crate::renderer::format::{self, MEMORY_COLUMNS};

pub type SurfaceHandle = Arc<Mutex<Surface>>;

/// Addressable places a device writes readings into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Header,
    Axis(Axis),
    ColorValue,
    ColorSwatch,
    Byte(usize),
}

/// Toggle owned by the surface and flipped by whoever hosts it.
#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    pub label: String,
    checked: Arc<AtomicBool>,
}

impl Checkbox {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            checked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::Relaxed)
    }

    pub fn set_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Swatch {
    pub value: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub label: String,
    pub cells: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<MemoryRow>,
}

impl MemoryTable {
    /// Header holds at most 16 columns; one row per started block of 16 bytes.
    pub fn new(byte_count: usize) -> Self {
        let columns = (0..byte_count.min(MEMORY_COLUMNS))
            .map(format::column_label)
            .collect();

        let rows = (0..byte_count.div_ceil(MEMORY_COLUMNS))
            .map(|row| MemoryRow {
                label: format::offset_label(row),
                cells: (0..MEMORY_COLUMNS)
                    .map(|column| (row * MEMORY_COLUMNS + column, String::new()))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    fn cell_mut(&mut self, offset: usize) -> Option<&mut String> {
        self.rows
            .get_mut(offset / MEMORY_COLUMNS)
            .and_then(|row| row.cells.get_mut(&offset))
    }

    pub fn cell(&self, offset: usize) -> Option<&str> {
        self.rows
            .get(offset / MEMORY_COLUMNS)
            .and_then(|row| row.cells.get(&offset))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub header_builds: usize,
    pub table_builds: usize,
    pub mutations: usize,
}

/// Markup owned by one device: built once, then written into on every cycle.
#[derive(Debug, Default)]
pub struct Surface {
    header: Option<String>,
    gravity: Option<Checkbox>,
    axes: Option<[String; 3]>,
    swatch: Option<Swatch>,
    table: Option<MemoryTable>,
    stats: SurfaceStats,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle() -> SurfaceHandle {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn build_header(&mut self, text: &str) {
        self.header = Some(text.to_string());
        self.stats.header_builds += 1;
        self.stats.mutations += 1;
    }

    pub fn build_checkbox(&mut self, label: &str) -> Checkbox {
        let checkbox = Checkbox::new(label);
        self.gravity = Some(checkbox.clone());
        self.stats.mutations += 1;
        checkbox
    }

    pub fn build_axis_list(&mut self) {
        self.axes = Some(Default::default());
        self.stats.mutations += 1;
    }

    pub fn build_swatch(&mut self) {
        self.swatch = Some(Swatch::default());
        self.stats.mutations += 1;
    }

    pub fn build_table(&mut self, byte_count: usize) {
        self.table = Some(MemoryTable::new(byte_count));
        self.stats.table_builds += 1;
        self.stats.mutations += 1;
    }

    /// Writes into an existing slot. Missing slots are a no-op.
    pub fn write(&mut self, slot: Slot, text: &str) -> bool {
        let target = match slot {
            Slot::Header => self.header.as_mut(),
            Slot::Axis(axis) => self.axes.as_mut().map(|axes| &mut axes[axis.index()]),
            Slot::ColorValue => self.swatch.as_mut().map(|swatch| &mut swatch.value),
            Slot::ColorSwatch => self.swatch.as_mut().map(|swatch| &mut swatch.style),
            Slot::Byte(offset) => self.table.as_mut().and_then(|table| table.cell_mut(offset)),
        };

        match target {
            Some(target) => {
                target.clear();
                target.push_str(text);
                self.stats.mutations += 1;
                true
            }
            None => false,
        }
    }

    pub fn set_style(&mut self, style: &str) -> bool {
        self.write(Slot::ColorSwatch, style)
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn gravity(&self) -> Option<&Checkbox> {
        self.gravity.as_ref()
    }

    pub fn axis(&self, axis: Axis) -> Option<&str> {
        self.axes.as_ref().map(|axes| axes[axis.index()].as_str())
    }

    pub fn swatch(&self) -> Option<&Swatch> {
        self.swatch.as_ref()
    }

    pub fn table(&self) -> Option<&MemoryTable> {
        self.table.as_ref()
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Plain-text rendering of the current markup, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(header) = &self.header {
            lines.push(header.clone());
        }

        if let Some(checkbox) = &self.gravity {
            let mark = if checkbox.is_checked() { "x" } else { " " };
            lines.push(format!("[{}] {}", mark, checkbox.label));
        }

        if let Some(axes) = &self.axes {
            lines.extend(axes.iter().map(|line| format!("  {}", line)));
        }

        if let Some(swatch) = &self.swatch {
            lines.push(swatch.value.clone());
        }

        if let Some(table) = &self.table {
            lines.push(format!("         {}", table.columns.join("  ")));
            for row in &table.rows {
                let cells: Vec<&str> = row
                    .cells
                    .values()
                    .map(|cell| if cell.is_empty() { "--" } else { cell.as_str() })
                    .collect();
                lines.push(format!("{} {}", row.label, cells.join(" ")));
            }
        }

        lines
    }
}
