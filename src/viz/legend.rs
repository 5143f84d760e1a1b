//! Legend band above the plot: one entry for the single dataset, centered.

use crate::chart::Dataset;
use crate::error::{ChartError, render_err};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const BOX_W: i32 = 40;
const BOX_H: i32 = 12;
const BOX_TO_TEXT: i32 = 10;

/// Draw the entry: a box filled like the area (bordered in the line color)
/// followed by the dataset label.
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    label_style: &TextStyle,
) -> Result<(), ChartError> {
    let (w, h) = area.dim_in_pixel();
    let label_style = label_style.pos(Pos::new(HPos::Left, VPos::Center));
    let (text_w, _) = area
        .estimate_text_size(&dataset.label, &label_style)
        .map_err(render_err)?;

    let entry_w = BOX_W + BOX_TO_TEXT + text_w as i32;
    let x0 = ((w as i32 - entry_w) / 2).max(0);
    let cy = h as i32 / 2;
    let (top, bottom) = (cy - BOX_H / 2, cy + BOX_H / 2);

    // sample the gradient at the box's absolute row
    let (_, rows) = area.get_pixel_range();
    let swatch = dataset
        .background
        .color_at((rows.start + cy) as f64)
        .to_plotters();
    let border = dataset.border_color.to_plotters();

    area.draw(&Rectangle::new([(x0, top), (x0 + BOX_W, bottom)], swatch.filled()))
        .map_err(render_err)?;
    area.draw(&Rectangle::new(
        [(x0, top), (x0 + BOX_W, bottom)],
        border.stroke_width(dataset.border_width),
    ))
    .map_err(render_err)?;
    area.draw(&Text::new(
        dataset.label.as_str(),
        (x0 + BOX_W + BOX_TO_TEXT, cy),
        label_style,
    ))
    .map_err(render_err)?;
    Ok(())
}
