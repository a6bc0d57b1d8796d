use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use cnheat_core::{HeatmapConfig, Result};

/// One rendered heatmap page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub title: String,
    /// standalone `<svg>` element
    pub svg: String,
}

///
/// Multi-page heatmap output: a single self-contained HTML file with one page per heatmap
/// and the run configuration embedded as JSON.
///
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDocument {
    pub config: HeatmapConfig,
    pub pages: Vec<RenderedPage>,
}

impl HeatmapDocument {
    pub fn new(config: HeatmapConfig) -> Self {
        HeatmapDocument {
            config,
            pages: Vec::new(),
        }
    }

    pub fn push(&mut self, page: RenderedPage) {
        self.pages.push(page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn to_html(&self) -> Result<String> {
        let config = serde_json::to_string_pretty(&self.config)?.replace("</", "<\\/");
        let heading = match self.config.plot_title.is_empty() {
            true => format!("{} heatmap", self.config.column_name),
            false => self.config.plot_title.clone(),
        };

        let mut html = String::with_capacity(self.pages.iter().map(|p| p.svg.len()).sum::<usize>() + 4096);

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\"/>")?;
        writeln!(html, "<title>{}</title>", escape_html(&heading))?;
        writeln!(html, "<style>")?;
        writeln!(html, "body{{font-family:Arial,Helvetica,sans-serif;margin:0;background:#fff;}}")?;
        writeln!(html, ".page{{padding:16px;page-break-after:always;break-after:page;}}")?;
        writeln!(html, ".page:last-child{{page-break-after:auto;break-after:auto;}}")?;
        writeln!(html, ".page h2{{font-size:16px;color:#444;margin:0 0 8px 0;}}")?;
        writeln!(html, "svg{{max-width:100%;height:auto;}}")?;
        writeln!(html, "</style>")?;
        writeln!(html, "<script type=\"application/json\" id=\"cnheat-config\">{}</script>", config)?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;

        if self.pages.is_empty() {
            writeln!(html, "<p>No group had enough samples to plot.</p>")?;
        }

        for (i, page) in self.pages.iter().enumerate() {
            writeln!(html, "<section class=\"page\" id=\"page-{}\">", i + 1)?;
            writeln!(html, "<h2>{}</h2>", escape_html(&page.title))?;
            writeln!(html, "{}", page.svg)?;
            writeln!(html, "</section>")?;
        }

        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;

        Ok(html)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;

        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(html.as_bytes())?;
        out.flush()?;

        info!("Wrote {} heatmap page(s) to {}", self.pages.len(), path.display());

        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
