use image::RgbaImage;

use crate::models::Axis;
use crate::renderer::colours::{parse_hex_colour, Colours};
use crate::renderer::drawing;
use crate::renderer::fonts::Fonts;
use crate::renderer::surface::Surface;

const TITLE_LINE: u32 = 24;
const LINE: u32 = 20;
const TABLE_LINE: u32 = 16;
const PANEL_GAP: u32 = 8;
const SWATCH_WIDTH: u32 = 120;

pub struct RenderContext<'a> {
    pub fonts: &'a Fonts,
    pub image: &'a mut RgbaImage,
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

/// Vertical space a device panel takes, gap included. Surfaces without a
/// skeleton take none.
pub fn panel_height(surface: &Surface) -> u32 {
    if !surface.has_header() {
        return 0;
    }

    let mut height = TITLE_LINE;
    if surface.gravity().is_some() {
        height += LINE;
    }
    if surface.axis(Axis::X).is_some() {
        height += 3 * LINE;
    }
    if surface.swatch().is_some() {
        height += LINE;
    }
    if let Some(table) = surface.table() {
        height += (table.rows.len() as u32 + 1) * TABLE_LINE;
    }
    height + PANEL_GAP
}

/// Draws one device panel at the context position.
pub fn render_panel(ctx: &mut RenderContext, surface: &Surface) {
    let Some(header) = surface.header() else {
        return;
    };

    let colours = Colours::default();
    let fc_title = ctx.fonts.title();
    let fc_regular = ctx.fonts.regular();
    let fc_small = ctx.fonts.small();

    let x = (ctx.x + 5) as i32;
    let mut y_pos = ctx.y;

    drawing::text(ctx.image, colours.title, x, y_pos as i32, &fc_title, header);
    y_pos += TITLE_LINE;

    if let Some(checkbox) = surface.gravity() {
        let mark = if checkbox.is_checked() { "[x]" } else { "[ ]" };
        let line = format!("{} {}", mark, checkbox.label);
        drawing::text(ctx.image, colours.checkbox, x, y_pos as i32, &fc_regular, &line);
        y_pos += LINE;
    }

    if surface.axis(Axis::X).is_some() {
        for axis in Axis::ALL {
            let line = surface.axis(axis).unwrap_or_default();
            drawing::text(ctx.image, colours.axis, x + 10, y_pos as i32, &fc_regular, line);
            y_pos += LINE;
        }
    }

    if let Some(swatch) = surface.swatch() {
        drawing::text(ctx.image, colours.text, x, y_pos as i32, &fc_regular, &swatch.value);
        if let Some(colour) = parse_hex_colour(&swatch.value) {
            let swatch_x = ctx.x + 100;
            let width = SWATCH_WIDTH.min(ctx.width.saturating_sub(110));
            drawing::swatch(ctx.image, swatch_x as i32, y_pos as i32 + 2, width, LINE - 4, colour);
        }
        y_pos += LINE;
    }

    if let Some(table) = surface.table() {
        let columns = format!("        {}", table.columns.join("  "));
        drawing::text(ctx.image, colours.table, x, y_pos as i32, &fc_small, &columns);
        y_pos += TABLE_LINE;

        for row in &table.rows {
            let cells: Vec<&str> = row
                .cells
                .values()
                .map(|cell| if cell.is_empty() { "--" } else { cell.as_str() })
                .collect();
            let line = format!("{} {}", row.label, cells.join(" "));
            drawing::text(ctx.image, colours.table, x, y_pos as i32, &fc_small, &line);
            y_pos += TABLE_LINE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_surface_has_no_panel() {
        assert_eq!(panel_height(&Surface::new()), 0);
    }

    #[test]
    fn test_panel_heights() {
        let mut scalar = Surface::new();
        scalar.build_header("v1: Voltage");
        assert_eq!(panel_height(&scalar), TITLE_LINE + PANEL_GAP);

        let mut acceleration = Surface::new();
        acceleration.build_header("acc: LinearAcceleration");
        acceleration.build_checkbox("Show gravity");
        acceleration.build_axis_list();
        assert_eq!(
            panel_height(&acceleration),
            TITLE_LINE + LINE + 3 * LINE + PANEL_GAP
        );

        let mut memory = Surface::new();
        memory.build_header("mem0: Memory (20 bytes):");
        memory.build_table(20);
        assert_eq!(panel_height(&memory), TITLE_LINE + 3 * TABLE_LINE + PANEL_GAP);
    }
}
