use anyhow::{Context, Result};
use chrono::Local;
use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::config::DashboardConfig;
use crate::renderer::colours::Colours;
use crate::renderer::fonts::Fonts;
use crate::renderer::surface::SurfaceHandle;
use crate::renderer::{drawing, widgets};

const HEADER_HEIGHT: u32 = 30;
const COLUMNS: u32 = 2;

/// Places panels top to bottom, spilling into the next column. Panels that
/// fit nowhere get `None`.
pub fn layout(heights: &[u32], width: u32, height: u32) -> Vec<Option<(u32, u32)>> {
    let column_width = width / COLUMNS;
    let mut column = 0;
    let mut y = HEADER_HEIGHT + 6;

    heights
        .iter()
        .map(|&panel| {
            if panel == 0 {
                return None;
            }
            if y + panel > height && column + 1 < COLUMNS {
                column += 1;
                y = HEADER_HEIGHT + 6;
            }
            if y + panel > height || column >= COLUMNS {
                return None;
            }
            let position = (column * column_width, y);
            y += panel;
            Some(position)
        })
        .collect()
}

/// Renders every attached surface into one dashboard image.
pub fn create_image(config: &DashboardConfig, fonts: &Fonts, surfaces: &[SurfaceHandle]) -> DynamicImage {
    let width = config.width;
    let height = config.height;
    let colours = Colours::default();

    let mut image = RgbaImage::from_pixel(width, height, colours.background);

    let header_text = format!("devmon | {} devices", surfaces.len());
    let current_time = Local::now().format("%H:%M:%S").to_string();
    let fc_regular = fonts.regular();
    drawing::text(&mut image, colours.header, 5, 6, &fc_regular, &header_text);
    drawing::text(
        &mut image,
        colours.header,
        width as i32 - 90,
        6,
        &fc_regular,
        &current_time,
    );
    drawing::horizonal_line(&mut image, 0, HEADER_HEIGHT, width);
    drawing::vertical_line(&mut image, width / COLUMNS, HEADER_HEIGHT, height);

    let heights: Vec<u32> = surfaces
        .iter()
        .map(|surface| widgets::panel_height(&surface.lock()))
        .collect();

    let column_width = width / COLUMNS;
    for (surface, position) in surfaces.iter().zip(layout(&heights, width, height)) {
        let Some((x, y)) = position else {
            continue;
        };
        let surface = surface.lock();
        let mut ctx = widgets::RenderContext {
            fonts,
            image: &mut image,
            x,
            y,
            width: column_width,
        };
        widgets::render_panel(&mut ctx, &surface);
    }

    DynamicImage::ImageRgba8(image)
}

pub fn save_image(config: &DashboardConfig, image: &DynamicImage) -> Result<()> {
    let target_file = &config.file;

    image
        .save(target_file)
        .context(format!("Failed to save dashboard to {}", target_file))?;
    debug!("Dashboard saved to {}", target_file);
    Ok(())
}

/// Logs the text of every surface, for runs without a snapshot file.
pub fn log_surfaces(surfaces: &[SurfaceHandle]) {
    for surface in surfaces {
        for line in surface.lock().lines() {
            debug!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_single_column() {
        let positions = layout(&[50, 0, 80], 480, 320);
        assert_eq!(positions, vec![Some((0, 36)), None, Some((0, 86))]);
    }

    #[test]
    fn test_layout_spills_to_second_column() {
        let positions = layout(&[200, 200, 80], 480, 320);
        assert_eq!(positions[0], Some((0, 36)));
        assert_eq!(positions[1], Some((240, 36)));
        assert_eq!(positions[2], Some((240, 236)));
    }

    #[test]
    fn test_layout_drops_what_does_not_fit() {
        let positions = layout(&[250, 250, 100, 400], 480, 320);
        assert_eq!(positions[1], Some((240, 36)));
        assert_eq!(positions[2], None);
        assert_eq!(positions[3], None);
    }

    #[test]
    fn test_save_image() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            file: dir.path().join("out.png").to_string_lossy().to_string(),
            ..DashboardConfig::default()
        };
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        save_image(&config, &image).unwrap();
        assert!(dir.path().join("out.png").exists());
    }
}
