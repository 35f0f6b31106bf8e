//! Turns a [`SubmissionResult`] into something a terminal can show.
//!
//! The weather record is untyped JSON, and any part of it may be missing.
//! Every field is read through [`Value::pointer`], so a missing link anywhere
//! along a path reads as blank instead of failing.

use std::fmt::{self, Write};

use serde_json::Value;

use crate::model::SubmissionResult;

const TILE_WIDTH: usize = 26;
const AIR_UNIT: &str = "µg/m³";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

/// Color class of a tile heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Gray,
    Purple,
    Emerald,
    Yellow,
}

/// Styling hooks used while formatting a [`ResultView`].
pub trait Palette {
    fn tone(&self, tone: Tone, text: &str) -> String;
    fn accent(&self, accent: Accent, text: &str) -> String;
    fn strong(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
}

/// No styling at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn tone(&self, _tone: Tone, text: &str) -> String {
        text.to_string()
    }

    fn accent(&self, _accent: Accent, text: &str) -> String {
        text.to_string()
    }

    fn strong(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

/// How many metric tiles go on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: usize,
}

impl GridLayout {
    pub const NARROW: GridLayout = GridLayout { columns: 2 };
    pub const WIDE: GridLayout = GridLayout { columns: 4 };

    /// Four tiles per row once the terminal has room for them.
    pub fn for_width(width: u16) -> Self {
        if usize::from(width) >= Self::WIDE.columns * (TILE_WIDTH + 2) {
            Self::WIDE
        } else {
            Self::NARROW
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::NARROW
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: Tone,
    pub message: String,
}

/// One titled value with an icon glyph and a heading color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTile {
    pub title: &'static str,
    pub value: String,
    pub icon: &'static str,
    pub accent: Accent,
}

pub fn metric_tile(title: &'static str, value: String, icon: &'static str, accent: Accent) -> MetricTile {
    MetricTile {
        title,
        value,
        icon,
        accent,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHeader {
    pub name: String,
    pub region_country: String,
    pub localtime: String,
    pub observation_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionsTile {
    pub description: String,
    pub icon_url: String,
    /// Same text as the description.
    pub icon_alt: String,
    pub temperature: String,
    pub feels_like: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirQuality {
    pub co: String,
    pub no2: String,
    pub o3: String,
    pub pm2_5: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSummary {
    pub header: LocationHeader,
    pub conditions: ConditionsTile,
    pub metrics: [MetricTile; 4],
    pub air_quality: Option<AirQuality>,
    pub astro: [MetricTile; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub banner: Banner,
    pub summary: Option<WeatherSummary>,
}

/// Build the view for the current result; `None` means there is nothing to
/// show beyond the form.
pub fn render(result: Option<&SubmissionResult>) -> Option<ResultView> {
    let view = match result? {
        SubmissionResult::Failure { message } => ResultView {
            banner: Banner {
                tone: Tone::Failure,
                message: message.clone(),
            },
            summary: None,
        },
        SubmissionResult::Success {
            message,
            weather_data,
        } => ResultView {
            banner: Banner {
                tone: Tone::Success,
                message: message.clone(),
            },
            summary: (!weather_data.is_null()).then(|| summarize(weather_data)),
        },
    };

    Some(view)
}

pub fn summarize(data: &Value) -> WeatherSummary {
    let field = |pointer: &str| text(data, pointer);

    let header = LocationHeader {
        name: field("/location/name"),
        region_country: join_present(&[field("/location/region"), field("/location/country")]),
        localtime: field("/location/localtime"),
        observation_time: field("/current/observation_time"),
    };

    let description = field("/current/weather_descriptions/0");
    let conditions = ConditionsTile {
        icon_url: field("/current/weather_icons/0"),
        icon_alt: description.clone(),
        description,
        temperature: with_unit(field("/current/temperature"), "°C"),
        feels_like: with_unit(field("/current/feelslike"), "°C"),
    };

    let metrics = [
        metric_tile(
            "Humidity",
            with_unit(field("/current/humidity"), "%"),
            "💧",
            Accent::Blue,
        ),
        metric_tile(
            "Wind",
            join_words(&[
                with_unit(field("/current/wind_speed"), " km/h"),
                field("/current/wind_dir"),
            ]),
            "🌬️",
            Accent::Gray,
        ),
        metric_tile(
            "Pressure",
            with_unit(field("/current/pressure"), " hPa"),
            "📊",
            Accent::Purple,
        ),
        metric_tile(
            "Visibility",
            with_unit(field("/current/visibility"), " km"),
            "👁️",
            Accent::Emerald,
        ),
    ];

    let air_quality = data
        .pointer("/current/air_quality")
        .filter(|air| !air.is_null())
        .map(|air| AirQuality {
            co: text(air, "/co"),
            no2: text(air, "/no2"),
            o3: text(air, "/o3"),
            pm2_5: text(air, "/pm2_5"),
        });

    let astro = [
        metric_tile("Sunrise", field("/current/astro/sunrise"), "🌅", Accent::Yellow),
        metric_tile("Sunset", field("/current/astro/sunset"), "🌇", Accent::Blue),
    ];

    WeatherSummary {
        header,
        conditions,
        metrics,
        air_quality,
        astro,
    }
}

/// Display text of whatever sits at `pointer`; blank when any link is missing.
fn text(data: &Value, pointer: &str) -> String {
    data.pointer(pointer).map(display_value).unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn with_unit(value: String, unit: &str) -> String {
    if value.is_empty() {
        value
    } else {
        format!("{value}{unit}")
    }
}

fn join_present(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_words(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ResultView {
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        palette: &dyn Palette,
        layout: GridLayout,
    ) -> fmt::Result {
        writeln!(out, "{}", palette.tone(self.banner.tone, &self.banner.message))?;

        if let Some(summary) = &self.summary {
            writeln!(out)?;
            summary.write_to(out, palette, layout)?;
        }

        Ok(())
    }
}

impl WeatherSummary {
    fn write_to<W: Write>(&self, out: &mut W, palette: &dyn Palette, layout: GridLayout) -> fmt::Result {
        let header = &self.header;
        writeln!(out, "{}", palette.strong(&header.name))?;
        writeln!(out, "{}", palette.dim(&header.region_country))?;
        writeln!(out, "{}", palette.dim(&format!("Local time: {}", header.localtime)))?;
        writeln!(out, "{}", palette.dim(&format!("Observed:   {}", header.observation_time)))?;
        writeln!(out)?;

        let cond = &self.conditions;
        writeln!(
            out,
            "{}  {}",
            palette.strong(&cond.description),
            palette.strong(&cond.temperature)
        )?;
        if !cond.icon_url.is_empty() {
            writeln!(out, "{}", palette.dim(&format!("[{}] {}", cond.icon_alt, cond.icon_url)))?;
        }
        writeln!(out, "{}", palette.dim(&format!("Feels like {}", cond.feels_like)))?;
        writeln!(out)?;

        write_tiles(out, palette, &self.metrics, layout.columns())?;

        if let Some(air) = &self.air_quality {
            writeln!(out)?;
            writeln!(out, "{}", palette.strong("🌫️ Air Quality"))?;
            let cells = [
                format!("CO: {}", with_unit(air.co.clone(), &format!(" {AIR_UNIT}"))),
                format!("NO₂: {}", with_unit(air.no2.clone(), &format!(" {AIR_UNIT}"))),
                format!("O₃: {}", with_unit(air.o3.clone(), &format!(" {AIR_UNIT}"))),
                format!("PM2.5: {}", with_unit(air.pm2_5.clone(), &format!(" {AIR_UNIT}"))),
            ];
            for pair in cells.chunks(2) {
                let line: Vec<String> = pair.iter().map(|cell| pad(cell)).collect();
                writeln!(out, "  {}", line.join("  ").trim_end())?;
            }
        }

        writeln!(out)?;
        write_tiles(out, palette, &self.astro, 2)
    }
}

/// Lay tiles out in rows: a colored heading line, then a value line.
fn write_tiles<W: Write>(
    out: &mut W,
    palette: &dyn Palette,
    tiles: &[MetricTile],
    columns: usize,
) -> fmt::Result {
    for row in tiles.chunks(columns.max(1)) {
        let headings: Vec<String> = row
            .iter()
            .map(|tile| palette.accent(tile.accent, &pad(&format!("{} {}", tile.icon, tile.title))))
            .collect();
        let values: Vec<String> = row.iter().map(|tile| pad(&tile.value)).collect();

        writeln!(out, "{}", headings.join("  ").trim_end())?;
        writeln!(out, "{}", values.join("  ").trim_end())?;
    }
    Ok(())
}

fn pad(text: &str) -> String {
    format!("{text:<TILE_WIDTH$}")
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &PlainPalette, GridLayout::default())
    }
}
