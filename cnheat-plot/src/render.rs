use fxhash::FxHashMap as HashMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use cnheat_core::models::Bin;
use cnheat_core::models::bin_index::chromosome_boundaries;
use cnheat_core::{HeatmapConfig, HeatmapError, Result};
use cnheat_io::MetricsTable;
use cnheat_matrix::CopyNumberMatrix;

use crate::colormap::{CategoryPalette, ColorMap, UNKNOWN_CATEGORY};
use crate::document::{HeatmapDocument, RenderedPage};
use crate::paging::Page;

pub const PAGE_WIDTH: u32 = 1800;
const LEGEND_WIDTH: u32 = 260;
const ROW_HEIGHT: usize = 18;
const MIN_PAGE_HEIGHT: usize = 600;
const MAX_PAGE_HEIGHT: usize = 3000;
/// sample ids are written next to the rows only up to this many rows
const MAX_LABELLED_ROWS: usize = 100;

fn plot_error<E: std::fmt::Display>(e: E) -> HeatmapError {
    HeatmapError::Plot(e.to_string())
}

/// Columns covered by one chromosome, `end` exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeSpan {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

pub fn chromosome_spans(bins: &[Bin]) -> Vec<ChromosomeSpan> {
    if bins.is_empty() {
        return vec![];
    }

    let boundaries = chromosome_boundaries(bins);
    boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| ChromosomeSpan {
            name: bins[start].chr.clone(),
            start,
            end: boundaries.get(i + 1).copied().unwrap_or(bins.len()),
        })
        .collect()
}

///
/// Consecutive cells of one row sharing a color, as `(first, last + 1, color)`.
/// Missing values break runs and produce no cell.
///
pub fn color_runs<'v, I>(values: I, colormap: &ColorMap) -> Vec<(usize, usize, RGBColor)>
where
    I: IntoIterator<Item = &'v f64>,
{
    let mut runs = Vec::new();
    let mut current: Option<(usize, RGBColor)> = None;
    let mut len = 0;

    for (col, &value) in values.into_iter().enumerate() {
        let color = colormap.color(value);
        match (current, color) {
            (Some((_, run)), Some(c)) if run == c => {}
            _ => {
                if let Some((start, run)) = current {
                    runs.push((start, col, run));
                }
                current = color.map(|c| (col, c));
            }
        }
        len = col + 1;
    }

    if let Some((start, run)) = current {
        runs.push((start, len, run));
    }

    runs
}

/// Pixel size of a page with `rows` heatmap rows.
pub fn page_size(rows: usize) -> (u32, u32) {
    let height = (260 + ROW_HEIGHT * rows).clamp(MIN_PAGE_HEIGHT, MAX_PAGE_HEIGHT);
    (PAGE_WIDTH, height as u32)
}

///
/// Draws heatmap pages for one filtered matrix. The color scale and the category palette
/// are fixed when the renderer is created, so every page uses the same colors.
///
pub struct HeatmapRenderer<'a> {
    matrix: &'a CopyNumberMatrix,
    spans: Vec<ChromosomeSpan>,
    colormap: ColorMap,
    categories: HashMap<String, String>,
    palette: CategoryPalette,
    config: &'a HeatmapConfig,
}

impl<'a> HeatmapRenderer<'a> {
    pub fn new(matrix: &'a CopyNumberMatrix, metrics: &MetricsTable, config: &'a HeatmapConfig) -> Self {
        let range = matrix.value_range().unwrap_or((0.0, 0.0));
        let colormap = ColorMap::for_values(config.is_integer_copy_number(), range);

        let categories: HashMap<String, String> = matrix
            .samples()
            .iter()
            .filter_map(|s| metrics.category(s).map(|c| (s.clone(), c.to_string())))
            .collect();
        let palette = CategoryPalette::for_categories(
            categories.values().map(String::as_str),
            config.category_allow_list(),
        );

        HeatmapRenderer {
            matrix,
            spans: chromosome_spans(matrix.bins()),
            colormap,
            categories,
            palette,
            config,
        }
    }

    pub fn colormap(&self) -> &ColorMap {
        &self.colormap
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    fn sample_color(&self, sample: &str) -> RGBColor {
        self.categories
            .get(sample)
            .map(|c| self.palette.color(c))
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    ///
    /// Render one page to SVG: category strip on the left, one row per sample, chromosome
    /// separators and labels along the bins, legend on the right.
    ///
    pub fn render_page(&self, page: &Page) -> Result<RenderedPage> {
        let title = page.title(&self.config.plot_title);
        let rows: Vec<usize> = page
            .samples
            .iter()
            .filter_map(|s| self.matrix.sample_index(s))
            .collect();

        let n_rows = rows.len();
        let n_bins = self.matrix.ncols();
        let size = page_size(n_rows);

        // category strip width and its gap to the heatmap, in bins
        let strip = (n_bins as f64 * 0.015).ceil().max(1.0);
        let gap = strip * 0.3;
        let x_min = -(strip + gap);
        let label_rows = n_rows <= MAX_LABELLED_ROWS;

        // first row on top
        let top = |r: usize| (n_rows - r) as f64;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;

            let titled = root.titled(&title, ("sans-serif", 28)).map_err(plot_error)?;
            let (main, legend) = titled.split_horizontally(size.0 - LEGEND_WIDTH);

            let mut chart = ChartBuilder::on(&main)
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(if label_rows { 160 } else { 20 })
                .build_cartesian_2d(x_min..n_bins as f64, 0.0..n_rows.max(1) as f64)
                .map_err(plot_error)?;

            let mut cells = Vec::new();
            for (r, &row) in rows.iter().enumerate() {
                for (start, end, color) in color_runs(self.matrix.values().row(row).iter(), &self.colormap) {
                    cells.push(Rectangle::new(
                        [(start as f64, top(r) - 1.0), (end as f64, top(r))],
                        color.filled(),
                    ));
                }
            }
            chart.draw_series(cells).map_err(plot_error)?;

            chart
                .draw_series(rows.iter().enumerate().map(|(r, &row)| {
                    let color = self.sample_color(&self.matrix.samples()[row]);
                    Rectangle::new([(x_min, top(r) - 1.0), (-gap, top(r))], color.filled())
                }))
                .map_err(plot_error)?;

            for span in self.spans.iter().skip(1) {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![(span.start as f64, 0.0), (span.start as f64, n_rows as f64)],
                        BLACK.stroke_width(1),
                    )))
                    .map_err(plot_error)?;
            }

            for span in &self.spans {
                let mid = (span.start + span.end) as f64 / 2.0;
                let (x, y) = chart.backend_coord(&(mid, 0.0));
                root.draw(&Text::new(
                    span.name.clone(),
                    (x, y + 8),
                    ("sans-serif", 14)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Top)),
                ))
                .map_err(plot_error)?;
            }

            if label_rows {
                for (r, &row) in rows.iter().enumerate() {
                    let (x, y) = chart.backend_coord(&(x_min, top(r) - 0.5));
                    root.draw(&Text::new(
                        self.matrix.samples()[row].clone(),
                        (x - 6, y),
                        ("sans-serif", 12)
                            .into_font()
                            .color(&BLACK)
                            .pos(Pos::new(HPos::Right, VPos::Center)),
                    ))
                    .map_err(plot_error)?;
                }
            }

            self.draw_legend(&legend)?;

            root.present().map_err(plot_error)?;
        }

        Ok(RenderedPage { title, svg })
    }

    fn draw_legend<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let heading = ("sans-serif", 16).into_font().color(&BLACK);
        let label = ("sans-serif", 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        let mut y = 40;
        area.draw(&Text::new(self.config.column_name.clone(), (10, y), heading.clone()))
            .map_err(plot_error)?;
        y += 24;

        // high values on top
        for (text, color) in self.colormap.legend().into_iter().rev() {
            area.draw(&Rectangle::new([(10, y), (34, y + 16)], color.filled()))
                .map_err(plot_error)?;
            area.draw(&Text::new(text, (42, y + 8), label.clone()))
                .map_err(plot_error)?;
            y += 20;
        }

        y += 24;
        area.draw(&Text::new(self.config.color_by_col.clone(), (10, y), heading))
            .map_err(plot_error)?;
        y += 24;

        // every category of the run, so pages share one legend
        for (category, color) in self.palette.entries() {
            area.draw(&Rectangle::new([(10, y), (34, y + 16)], color.filled()))
                .map_err(plot_error)?;
            area.draw(&Text::new(category.clone(), (42, y + 8), label.clone()))
                .map_err(plot_error)?;
            y += 20;
        }

        Ok(())
    }

    ///
    /// Render every page into one document, reporting progress on the terminal.
    ///
    pub fn render_document(&self, pages: &[Page]) -> Result<HeatmapDocument> {
        let mut document = HeatmapDocument::new(self.config.clone());

        let bar = ProgressBar::new(pages.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}") {
            bar.set_style(style.progress_chars("##-"));
        }

        for page in pages {
            bar.set_message(format!("{} ({} samples)", page.group, page.len()));
            document.push(self.render_page(page)?);
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!("Rendered {} heatmap page(s)", document.len());

        Ok(document)
    }
}
