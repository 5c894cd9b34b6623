use anyhow::{anyhow, Result};
use base64::Engine;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use super::layout::{
    Align, FontStyle, Page, ReportDocument, ScatterPlot, TextLine, PAGE_HEIGHT_IN, PAGE_WIDTH_IN,
};

const MM_PER_INCH: f32 = 25.4;
const MM_PER_POINT: f32 = 0.3528;
/// Rough average glyph width of Times as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

fn page_size() -> (Mm, Mm) {
    (
        Mm(PAGE_WIDTH_IN * MM_PER_INCH),
        Mm(PAGE_HEIGHT_IN * MM_PER_INCH),
    )
}

/// Render the layout to PDF bytes.
pub fn render_pdf(doc: &ReportDocument) -> Result<Vec<u8>> {
    let (width, height) = page_size();
    let (pdf, first_page, first_layer) =
        PdfDocument::new(sanitize(&doc.title), width, height, "Layer 1");
    let fonts = Fonts {
        regular: pdf
            .add_builtin_font(BuiltinFont::TimesRoman)
            .map_err(|e| anyhow!("failed to load font: {e}"))?,
        bold: pdf
            .add_builtin_font(BuiltinFont::TimesBold)
            .map_err(|e| anyhow!("failed to load font: {e}"))?,
    };

    for (i, page) in doc.pages.iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            new_layer(&pdf, width, height)
        };
        match page {
            Page::Text(lines) => {
                for line in lines {
                    draw_text(&layer, &fonts, line);
                }
            }
            Page::Scatter(plot) => draw_scatter(&layer, &fonts, plot),
        }
    }
    pdf.save_to_bytes()
        .map_err(|e| anyhow!("failed to serialize PDF: {e}"))
}

fn new_layer(pdf: &PdfDocumentReference, width: Mm, height: Mm) -> PdfLayerReference {
    let (page, layer) = pdf.add_page(width, height, "Layer 1");
    pdf.get_page(page).get_layer(layer)
}

fn draw_text(layer: &PdfLayerReference, fonts: &Fonts, line: &TextLine) {
    let (width, height) = page_size();
    let text = sanitize(&line.text);
    let mut x = line.x * width.0;
    if line.align == Align::Center {
        x -= text_width_mm(&text, line.size) / 2.0;
    }
    layer.use_text(
        text,
        line.size,
        Mm(x.max(0.0)),
        Mm(line.y * height.0),
        fonts.pick(line.style),
    );
}

fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH * MM_PER_POINT
}

/// Built-in fonts get printable ASCII only; anything else becomes '?'.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Plot frame in mm: left, bottom, right, top.
const FRAME: (f32, f32, f32, f32) = (30.0, 70.0, 185.0, 240.0);

struct Scale {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Scale {
    fn fit(points: &[(f64, f64)]) -> Self {
        let bounds = |values: Vec<f64>| {
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if !lo.is_finite() || !hi.is_finite() {
                (0.0, 1.0)
            } else if lo == hi {
                (lo - 1.0, hi + 1.0)
            } else {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
        };
        let (x_min, x_max) = bounds(points.iter().map(|p| p.0).collect());
        let (y_min, y_max) = bounds(points.iter().map(|p| p.1).collect());
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Data coordinates to page millimetres inside the frame.
    fn to_page(&self, x: f64, y: f64) -> (f32, f32) {
        let (left, bottom, right, top) = FRAME;
        let fx = ((x - self.x_min) / (self.x_max - self.x_min)) as f32;
        let fy = ((y - self.y_min) / (self.y_max - self.y_min)) as f32;
        (left + fx * (right - left), bottom + fy * (top - bottom))
    }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

fn draw_scatter(layer: &PdfLayerReference, fonts: &Fonts, plot: &ScatterPlot) {
    let (left, bottom, right, top) = FRAME;
    let (width, _) = page_size();

    let title = sanitize(&plot.title);
    let title_x = width.0 / 2.0 - text_width_mm(&title, 14.0) / 2.0;
    layer.use_text(title, 14.0, Mm(title_x.max(0.0)), Mm(top + 15.0), &fonts.bold);

    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.8);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(left), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(top)), false),
            (Point::new(Mm(left), Mm(top)), false),
        ],
        is_closed: true,
    });

    let scale = Scale::fit(&plot.points);
    let tick = |value: f64| format!("{value:.1}");
    layer.use_text(tick(scale.x_min), 8.0, Mm(left), Mm(bottom - 6.0), &fonts.regular);
    layer.use_text(tick(scale.x_max), 8.0, Mm(right - 8.0), Mm(bottom - 6.0), &fonts.regular);
    layer.use_text(tick(scale.y_min), 8.0, Mm(left - 12.0), Mm(bottom), &fonts.regular);
    layer.use_text(tick(scale.y_max), 8.0, Mm(left - 12.0), Mm(top - 3.0), &fonts.regular);
    layer.use_text(
        sanitize(&plot.x_label),
        10.0,
        Mm((left + right) / 2.0 - 8.0),
        Mm(bottom - 14.0),
        &fonts.regular,
    );
    layer.use_text(
        sanitize(&plot.y_label),
        10.0,
        Mm(left),
        Mm(top + 4.0),
        &fonts.regular,
    );

    // points as small crosses
    layer.set_outline_color(Color::Rgb(Rgb::new(0.12, 0.47, 0.71, None)));
    layer.set_outline_thickness(0.6);
    for &(x, y) in &plot.points {
        let (cx, cy) = scale.to_page(x, y);
        let arm = 1.0;
        layer.add_line(segment((cx - arm, cy), (cx + arm, cy)));
        layer.add_line(segment((cx, cy - arm), (cx, cy + arm)));
    }

    if let Some(reg) = plot.regression {
        layer.set_outline_color(Color::Rgb(Rgb::new(0.84, 0.15, 0.16, None)));
        layer.set_outline_thickness(1.0);
        layer.add_line(segment(
            scale.to_page(scale.x_min, reg.predict(scale.x_min)),
            scale.to_page(scale.x_max, reg.predict(scale.x_max)),
        ));
    }
}

/// `data:` URI carrying the PDF, for displaying without a file.
pub fn encode_inline(pdf: &[u8]) -> String {
    format!(
        "data:application/pdf;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(pdf)
    )
}
