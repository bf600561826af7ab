/// Visualization module: the chart renderer.
///
/// Produces a self-contained HTML string with one inline SVG figure per
/// chart intent, in report order. Nothing is computed from the catalog here;
/// the renderer only lays out the prepared series:
/// - pie slices with percentage labels
/// - horizontal and vertical bars, grouped bars for multi-series intents
/// - a 30-bucket histogram with a scaled density curve
/// - lines with point markers
///
/// Colours, figure size and font come from [`ChartStyle`].
use std::fmt::Write as FmtWrite;

use crate::config::ChartStyle;
use crate::error::Result;
use crate::histogram;
use crate::report::{ChartData, ChartId, ChartIntent, ChartKind, LabeledSeries, Report};

const KDE_POINTS: usize = 200;
const PIE_START_DEG: f64 = 140.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 90.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_LEFT_LABELS: f64 = 240.0;

// ── Palettes ────────────────────────────────────────────────────────────────

enum Palette {
    Solid(String),
    /// Colours used in turn
    Cycle(Vec<String>),
    /// Linear blend from the first colour (first bar) to the second (last bar)
    Ramp(String, String),
}

impl Palette {
    fn color(&self, i: usize, n: usize) -> String {
        match self {
            Palette::Solid(c) => c.clone(),
            Palette::Cycle(colors) => colors
                .get(i % colors.len().max(1))
                .cloned()
                .unwrap_or_default(),
            Palette::Ramp(from, to) => {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                mix(from, to, t)
            }
        }
    }
}

fn palette_for(id: ChartId, style: &ChartStyle) -> Palette {
    let light_accent = mix(&style.accent, "#ffffff", 0.7);
    let light_dark = mix(&style.dark, "#ffffff", 0.7);
    match id {
        ChartId::ContentTypes | ChartId::AddedPerYearByType => {
            Palette::Cycle(vec![style.accent.clone(), style.dark.clone()])
        }
        ChartId::TopGenres => Palette::Ramp(style.accent.clone(), light_accent),
        ChartId::MovieDurations => Palette::Solid(style.neutral.clone()),
        ChartId::TvSeasons | ChartId::AddedPerYear => Palette::Solid(style.accent.clone()),
        ChartId::TopCountries => Palette::Ramp(style.dark.clone(), light_dark),
        ChartId::AddedPerMonth | ChartId::RatingDistribution => {
            Palette::Ramp(light_accent, style.accent.clone())
        }
        ChartId::AverageLag => Palette::Solid(style.ink.clone()),
        ChartId::TopDirectors => Palette::Ramp(style.dark.clone(), style.accent.clone()),
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

/// Maps data values onto a pixel interval.
#[derive(Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    px_lo: f64,
    px_hi: f64,
}

impl Scale {
    fn map(&self, v: f64) -> f64 {
        if self.hi == self.lo {
            return self.px_lo;
        }
        self.px_lo + (v - self.lo) / (self.hi - self.lo) * (self.px_hi - self.px_lo)
    }
}

/// Plot area inside the figure margins.
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Frame {
    fn new(style: &ChartStyle, left: f64) -> Self {
        Self {
            left,
            top: MARGIN_TOP,
            right: f64::from(style.width_px) - MARGIN_RIGHT,
            bottom: f64::from(style.height_px) - MARGIN_BOTTOM,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Round tick positions covering `[lo, hi]`.
fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if hi <= lo || target == 0 {
        return vec![lo, lo + 1.0];
    }
    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;

    let start = (lo / step).floor() * step;
    let end = (hi / step).ceil() * step;
    let count = ((end - start) / step).round() as usize;
    (0..=count).map(|i| start + step * i as f64).collect()
}

fn format_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: renders the whole report as one HTML document.
pub fn generate_report_html(report: &Report, style: &ChartStyle) -> Result<String> {
    let mut html = String::new();
    write!(
        html,
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Catalog Insight</title>
<style>
  body {{ font-family: sans-serif; font-size: {font}px; color: #212529; background: #fff; margin: 24px; }}
  figure {{ margin: 0 0 32px 0; border: 1px solid #dee2e6; border-radius: 4px; }}
  svg text {{ font-family: sans-serif; }}
</style>
</head>
<body>
<h1>Catalog Insight</h1>
<p>{summary}</p>
"##,
        font = style.font_size,
        summary = escape_xml(&summary_line(report)),
    )?;

    for chart in &report.charts {
        writeln!(html, r#"<figure id="{}">"#, chart.id.as_str())?;
        html.push_str(&render_chart_svg(chart, style)?);
        writeln!(html, "</figure>")?;
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn summary_line(report: &Report) -> String {
    let mut line = format!("{} titles", report.total_titles);
    if let Some(source) = &report.source {
        line = format!("{line} from {source}");
    }
    if report.unparsed_dates > 0 {
        line.push_str(&format!(", {} unparsed dates", report.unparsed_dates));
    }
    if report.dropped_durations > 0 {
        line.push_str(&format!(", {} dropped durations", report.dropped_durations));
    }
    line
}

/// Render one chart intent as a standalone SVG element.
pub fn render_chart_svg(chart: &ChartIntent, style: &ChartStyle) -> Result<String> {
    let mut svg = String::new();
    let (w, h) = (style.width_px, style.height_px);
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-size="{}">"#,
        style.font_size
    )?;
    writeln!(
        svg,
        r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##
    )?;
    writeln!(
        svg,
        r#"<text class="chart-title" x="{}" y="32" text-anchor="middle" font-size="{}" font-weight="600">{}</text>"#,
        f64::from(w) / 2.0,
        style.font_size + 4,
        escape_xml(&chart.title)
    )?;

    let palette = palette_for(chart.id, style);
    match (&chart.kind, &chart.data) {
        (ChartKind::HistogramDensity, ChartData::Samples { values, bins }) => {
            render_histogram(&mut svg, chart, values, *bins, &palette, style)?
        }
        (ChartKind::Pie, ChartData::Series { series }) => {
            render_pie(&mut svg, series.first(), &palette, style)?
        }
        (ChartKind::HorizontalBar, ChartData::Series { series }) => {
            render_horizontal_bars(&mut svg, chart, series.first(), &palette, style)?
        }
        (ChartKind::Line, ChartData::Series { series }) => {
            render_line(&mut svg, chart, series.first(), &palette, style)?
        }
        (ChartKind::VerticalBar | ChartKind::GroupedCountBar, ChartData::Series { series }) => {
            render_vertical_bars(&mut svg, chart, series, &palette, style)?
        }
        _ => empty_note(&mut svg, style)?,
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn empty_note(svg: &mut String, style: &ChartStyle) -> std::fmt::Result {
    writeln!(
        svg,
        r##"<text x="{}" y="{}" text-anchor="middle" fill="#868e96">No data to display.</text>"##,
        f64::from(style.width_px) / 2.0,
        f64::from(style.height_px) / 2.0
    )
}

// ── Chart kinds ─────────────────────────────────────────────────────────────

fn render_pie(
    svg: &mut String,
    series: Option<&LabeledSeries>,
    palette: &Palette,
    style: &ChartStyle,
) -> std::fmt::Result {
    let Some(series) = series else {
        return empty_note(svg, style);
    };
    let total: f64 = series.points.iter().map(|p| p.value).sum();
    if total <= 0.0 {
        return empty_note(svg, style);
    }

    let cx = f64::from(style.width_px) / 2.0;
    let cy = f64::from(style.height_px) / 2.0 + 20.0;
    let radius = (f64::from(style.height_px) - MARGIN_TOP - 120.0).max(40.0) / 2.0;
    let n = series.points.len();

    // counter-clockwise from the start angle, like matplotlib
    let mut angle = PIE_START_DEG.to_radians();
    for (i, p) in series.points.iter().enumerate() {
        let share = p.value / total;
        let sweep = share * std::f64::consts::TAU;
        let color = palette.color(i, n);

        if n == 1 || share >= 1.0 {
            writeln!(
                svg,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{color}"/>"#
            )?;
        } else {
            let (x0, y0) = polar(cx, cy, radius, angle);
            let (x1, y1) = polar(cx, cy, radius, angle + sweep);
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            writeln!(
                svg,
                r##"<path d="M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {radius:.2} {radius:.2} 0 {large} 0 {x1:.2} {y1:.2} Z" fill="{color}" stroke="#ffffff"/>"##
            )?;
        }

        let mid = angle + sweep / 2.0;
        let (lx, ly) = polar(cx, cy, radius * 1.12, mid);
        let anchor = if lx < cx { "end" } else { "start" };
        writeln!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}">{}</text>"#,
            escape_xml(&p.label)
        )?;
        let (px, py) = polar(cx, cy, radius * 0.6, mid);
        writeln!(
            svg,
            r##"<text x="{px:.2}" y="{py:.2}" text-anchor="middle" fill="#ffffff">{:.1}%</text>"##,
            share * 100.0
        )?;

        angle += sweep;
    }
    Ok(())
}

/// SVG y grows downwards; angles are measured counter-clockwise from +x.
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy - r * angle.sin())
}

fn render_horizontal_bars(
    svg: &mut String,
    chart: &ChartIntent,
    series: Option<&LabeledSeries>,
    palette: &Palette,
    style: &ChartStyle,
) -> std::fmt::Result {
    let Some(series) = series.filter(|s| !s.points.is_empty()) else {
        return empty_note(svg, style);
    };
    let frame = Frame::new(style, MARGIN_LEFT_LABELS);
    let max = series.points.iter().map(|p| p.value).fold(0.0, f64::max);
    let ticks = nice_ticks(0.0, max, 6);
    let x = Scale {
        lo: 0.0,
        hi: ticks.last().copied().unwrap_or(max),
        px_lo: frame.left,
        px_hi: frame.right,
    };

    for &t in &ticks {
        let px = x.map(t);
        if style.grid {
            grid_line(svg, px, frame.top, px, frame.bottom)?;
        }
        writeln!(
            svg,
            r#"<text x="{px:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            frame.bottom + 18.0,
            format_number(t)
        )?;
    }

    let n = series.points.len();
    let band = frame.height() / n as f64;
    for (i, p) in series.points.iter().enumerate() {
        let y = frame.top + band * i as f64;
        writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            frame.left,
            y + band * 0.1,
            x.map(p.value) - frame.left,
            band * 0.8,
            palette.color(i, n)
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            frame.left - 8.0,
            y + band / 2.0,
            escape_xml(&p.label)
        )?;
    }

    axes(svg, &frame)?;
    axis_labels(svg, chart, &frame, style)
}

fn render_vertical_bars(
    svg: &mut String,
    chart: &ChartIntent,
    series: &[LabeledSeries],
    palette: &Palette,
    style: &ChartStyle,
) -> std::fmt::Result {
    let categories = visible_categories(chart, series);
    if categories.is_empty() {
        return empty_note(svg, style);
    }

    let frame = Frame::new(style, MARGIN_LEFT);
    let max = series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| p.value)
        .fold(0.0, f64::max);
    let ticks = nice_ticks(0.0, max, 6);
    let y = Scale {
        lo: 0.0,
        hi: ticks.last().copied().unwrap_or(max),
        px_lo: frame.bottom,
        px_hi: frame.top,
    };
    value_ticks(svg, &ticks, &y, &frame, style)?;

    let rotate = categories.len() > 8;
    let band = frame.width() / categories.len() as f64;
    let groups = series.len().max(1);
    let bar = band * 0.8 / groups as f64;

    for (ci, label) in categories.iter().enumerate() {
        let x0 = frame.left + band * ci as f64 + band * 0.1;
        for (si, s) in series.iter().enumerate() {
            let Some(p) = s.points.iter().find(|p| &p.label == label) else {
                continue;
            };
            let color = if groups > 1 {
                palette.color(si, groups)
            } else {
                palette.color(ci, categories.len())
            };
            let top = y.map(p.value);
            writeln!(
                svg,
                r#"<rect x="{:.2}" y="{top:.2}" width="{bar:.2}" height="{:.2}" fill="{color}"/>"#,
                x0 + bar * si as f64,
                frame.bottom - top
            )?;
        }

        let cx = frame.left + band * (ci as f64 + 0.5);
        let ty = frame.bottom + 18.0;
        if rotate {
            writeln!(
                svg,
                r#"<text x="{cx:.2}" y="{ty:.2}" text-anchor="end" transform="rotate(-45 {cx:.2} {ty:.2})">{}</text>"#,
                escape_xml(label)
            )?;
        } else {
            writeln!(
                svg,
                r#"<text x="{cx:.2}" y="{ty:.2}" text-anchor="middle">{}</text>"#,
                escape_xml(label)
            )?;
        }
    }

    if series.len() > 1 {
        legend(svg, series, palette, &frame)?;
    }
    axes(svg, &frame)?;
    axis_labels(svg, chart, &frame, style)
}

/// Category labels in first-series order, restricted to the display range
/// when the labels are numeric.
fn visible_categories(chart: &ChartIntent, series: &[LabeledSeries]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for p in series.iter().flat_map(|s| s.points.iter()) {
        if !labels.contains(&p.label) {
            labels.push(p.label.clone());
        }
    }

    match chart.display_range {
        Some((lo, hi)) => labels
            .into_iter()
            .filter(|l| l.parse::<f64>().map_or(true, |v| v >= lo && v <= hi))
            .collect(),
        None => labels,
    }
}

fn render_line(
    svg: &mut String,
    chart: &ChartIntent,
    series: Option<&LabeledSeries>,
    palette: &Palette,
    style: &ChartStyle,
) -> std::fmt::Result {
    let Some(series) = series.filter(|s| !s.points.is_empty()) else {
        return empty_note(svg, style);
    };
    let frame = Frame::new(style, MARGIN_LEFT);
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let lo = values.iter().copied().fold(0.0, f64::min);
    let hi = values.iter().copied().fold(0.0, f64::max);
    let ticks = nice_ticks(lo, hi, 6);
    let y = Scale {
        lo: ticks.first().copied().unwrap_or(lo),
        hi: ticks.last().copied().unwrap_or(hi),
        px_lo: frame.bottom,
        px_hi: frame.top,
    };
    value_ticks(svg, &ticks, &y, &frame, style)?;

    let n = series.points.len();
    let step = frame.width() / n as f64;
    let color = palette.color(0, 1);
    let coords: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (frame.left + step * (i as f64 + 0.5), y.map(p.value)))
        .collect();

    let path: Vec<String> = coords
        .iter()
        .map(|(px, py)| format!("{px:.2},{py:.2}"))
        .collect();
    writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
        path.join(" ")
    )?;

    for ((px, py), p) in coords.iter().zip(&series.points) {
        writeln!(
            svg,
            r#"<circle cx="{px:.2}" cy="{py:.2}" r="4" fill="{color}"><title>{}: {}</title></circle>"#,
            escape_xml(&p.label),
            format_number(p.value)
        )?;
        writeln!(
            svg,
            r#"<text x="{px:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            frame.bottom + 18.0,
            escape_xml(&p.label)
        )?;
    }

    axes(svg, &frame)?;
    axis_labels(svg, chart, &frame, style)
}

fn render_histogram(
    svg: &mut String,
    chart: &ChartIntent,
    values: &[f64],
    bins: usize,
    palette: &Palette,
    style: &ChartStyle,
) -> std::fmt::Result {
    let buckets = histogram::equal_width(values, bins);
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return empty_note(svg, style);
    };

    let frame = Frame::new(style, MARGIN_LEFT);
    let bin_width = first.end - first.start;
    // density scaled to counts so it overlays the bars
    let scale = values.len() as f64 * bin_width;
    let curve: Vec<(f64, f64)> = histogram::gaussian_kde(values, KDE_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    let max_count = buckets.iter().map(|b| b.count as f64).fold(0.0, f64::max);
    let max = curve.iter().map(|(_, d)| *d).fold(max_count, f64::max);
    let ticks = nice_ticks(0.0, max, 6);
    let y = Scale {
        lo: 0.0,
        hi: ticks.last().copied().unwrap_or(max),
        px_lo: frame.bottom,
        px_hi: frame.top,
    };
    let x = Scale {
        lo: first.start,
        hi: last.end,
        px_lo: frame.left,
        px_hi: frame.right,
    };
    value_ticks(svg, &ticks, &y, &frame, style)?;

    let color = palette.color(0, 1);
    for b in &buckets {
        let top = y.map(b.count as f64);
        writeln!(
            svg,
            r##"<rect x="{:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" fill="{color}" fill-opacity="0.6" stroke="#ffffff"/>"##,
            x.map(b.start),
            x.map(b.end) - x.map(b.start),
            frame.bottom - top
        )?;
    }

    if !curve.is_empty() {
        let path: Vec<String> = curve
            .iter()
            .map(|(cx, d)| format!("{:.2},{:.2}", x.map(*cx), y.map(*d)))
            .collect();
        writeln!(
            svg,
            r#"<polyline class="density" points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
            path.join(" ")
        )?;
    }

    for t in nice_ticks(first.start, last.end, 8) {
        if t < first.start || t > last.end {
            continue;
        }
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            x.map(t),
            frame.bottom + 18.0,
            format_number(t)
        )?;
    }

    axes(svg, &frame)?;
    axis_labels(svg, chart, &frame, style)
}

// ── Shared pieces ───────────────────────────────────────────────────────────

fn value_ticks(
    svg: &mut String,
    ticks: &[f64],
    y: &Scale,
    frame: &Frame,
    style: &ChartStyle,
) -> std::fmt::Result {
    for &t in ticks {
        let py = y.map(t);
        if style.grid {
            grid_line(svg, frame.left, py, frame.right, py)?;
        }
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{py:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            frame.left - 8.0,
            format_number(t)
        )?;
    }
    Ok(())
}

fn grid_line(svg: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) -> std::fmt::Result {
    writeln!(
        svg,
        r##"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="#e9ecef"/>"##
    )
}

fn axes(svg: &mut String, frame: &Frame) -> std::fmt::Result {
    writeln!(
        svg,
        r##"<path d="M {l:.2} {t:.2} L {l:.2} {b:.2} L {r:.2} {b:.2}" fill="none" stroke="#495057"/>"##,
        l = frame.left,
        t = frame.top,
        b = frame.bottom,
        r = frame.right
    )
}

fn axis_labels(
    svg: &mut String,
    chart: &ChartIntent,
    frame: &Frame,
    style: &ChartStyle,
) -> std::fmt::Result {
    if !chart.x_label.is_empty() {
        writeln!(
            svg,
            r#"<text class="x-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            frame.left + frame.width() / 2.0,
            f64::from(style.height_px) - 16.0,
            escape_xml(&chart.x_label)
        )?;
    }
    if !chart.y_label.is_empty() {
        let (x, y) = (18.0, frame.top + frame.height() / 2.0);
        writeln!(
            svg,
            r#"<text class="y-label" x="{x:.2}" y="{y:.2}" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})">{}</text>"#,
            escape_xml(&chart.y_label)
        )?;
    }
    Ok(())
}

fn legend(
    svg: &mut String,
    series: &[LabeledSeries],
    palette: &Palette,
    frame: &Frame,
) -> std::fmt::Result {
    for (i, s) in series.iter().enumerate() {
        let y = frame.top + 8.0 + 20.0 * i as f64;
        writeln!(
            svg,
            r#"<rect x="{:.2}" y="{y:.2}" width="12" height="12" fill="{}"/>"#,
            frame.right - 140.0,
            palette.color(i, series.len())
        )?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            frame.right - 122.0,
            y + 10.0,
            escape_xml(&s.name)
        )?;
    }
    Ok(())
}

// ── Colour and escaping helpers ─────────────────────────────────────────────

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Blend two `#rrggbb` colours; `t = 0` gives `from`. Unparsable input
/// returns `from` unchanged.
fn mix(from: &str, to: &str, t: f64) -> String {
    let (Some(a), Some(b)) = (parse_hex(from), parse_hex(to)) else {
        return from.to_string();
    };
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    format!("#{:02x}{:02x}{:02x}", lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
