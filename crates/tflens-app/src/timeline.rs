//! Timeline layout: lanes, bar extents and axis ticks for pre-aggregated bars
//!
//! Geometry is expressed in abstract layout units over `chart_width`; the
//! renderer scales units to whatever surface it draws on.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tflens_core::{LogFilters, PairingMode, TimelineBar};

use crate::config::TimelineSettings;

/// Bars wider than this show their entry count
const COUNT_LABEL_MIN_WIDTH: u32 = 30;

const ELLIPSIS: &str = "...";

/// Bar colour class, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Malformed,
    Error,
    Normal,
}

impl Severity {
    pub fn of(bar: &TimelineBar) -> Self {
        if bar.malformed_count > 0 {
            Severity::Malformed
        } else if bar.error_count > 0 {
            Severity::Error
        } else {
            Severity::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Malformed => "malformed",
            Severity::Error => "error",
            Severity::Normal => "ok",
        }
    }
}

/// Chart geometry knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineGeometry {
    pub chart_width: u32,
    pub min_bar_width: u32,
    pub tick_count: u32,
    pub label_max_chars: usize,
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self::from(&TimelineSettings::default())
    }
}

impl From<&TimelineSettings> for TimelineGeometry {
    fn from(settings: &TimelineSettings) -> Self {
        Self {
            chart_width: settings.chart_width.max(1),
            min_bar_width: settings.min_bar_width,
            tick_count: settings.tick_count.max(1),
            label_max_chars: settings.label_max_chars.max(ELLIPSIS.len() + 1),
        }
    }
}

/// One positioned bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarLayout {
    pub key: String,
    /// Lane label, shortened to `label_max_chars`
    pub label: String,
    pub lane: usize,
    pub x1: u32,
    pub x2: u32,
    /// Drawn width, never below `min_bar_width`
    pub width: u32,
    pub severity: Severity,
    pub count: u64,
    pub error_count: u64,
    pub malformed_count: u64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub show_count: bool,
}

/// One axis tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisTick {
    pub x: u32,
    pub time: DateTime<Utc>,
    /// `HH:MM:SS`
    pub label: String,
}

/// Complete chart geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineLayout {
    pub bars: Vec<BarLayout>,
    pub ticks: Vec<AxisTick>,
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
    pub duration_ms: i64,
    pub chart_width: u32,
    /// `N bars, duration Xs`
    pub header: String,
}

impl TimelineLayout {
    /// Lay out `bars`. Returns `None` for an empty list; no partial chart
    /// is ever produced.
    pub fn compute(bars: &[TimelineBar], geometry: &TimelineGeometry) -> Option<Self> {
        let min = bars.iter().map(|b| b.start).min()?;
        let max = bars.iter().map(|b| b.end).max()?;
        let duration_ms = (max - min).num_milliseconds().max(1);

        let mut ordered: Vec<&TimelineBar> = bars.iter().collect();
        // stable, so equal counts keep backend order
        ordered.sort_by(|a, b| b.count.cmp(&a.count));

        let project = |t: DateTime<Utc>| -> u32 {
            let offset = (t - min).num_milliseconds().clamp(0, duration_ms) as u128;
            (offset * u128::from(geometry.chart_width) / duration_ms as u128) as u32
        };

        let laid_out = ordered
            .into_iter()
            .enumerate()
            .map(|(lane, bar)| {
                let x1 = project(bar.start);
                let x2 = project(bar.end).max(x1);
                let width = (x2 - x1).max(geometry.min_bar_width);
                BarLayout {
                    key: bar.key.clone(),
                    label: shorten(&bar.key, geometry.label_max_chars),
                    lane,
                    x1,
                    x2,
                    width,
                    severity: Severity::of(bar),
                    count: bar.count,
                    error_count: bar.error_count,
                    malformed_count: bar.malformed_count,
                    start: bar.start,
                    end: bar.end,
                    show_count: width > COUNT_LABEL_MIN_WIDTH,
                }
            })
            .collect::<Vec<_>>();

        let steps = geometry.tick_count;
        let ticks = (0..=steps)
            .map(|i| {
                let offset = duration_ms * i64::from(i) / i64::from(steps);
                let time = min + Duration::milliseconds(offset);
                AxisTick {
                    x: (u64::from(geometry.chart_width) * u64::from(i) / u64::from(steps)) as u32,
                    time,
                    label: time.format("%H:%M:%S").to_string(),
                }
            })
            .collect();

        let seconds = (duration_ms as f64 / 1000.0).round() as i64;
        let header = format!("{} bars, duration {}s", laid_out.len(), seconds);

        Some(Self {
            bars: laid_out,
            ticks,
            min,
            max,
            duration_ms,
            chart_width: geometry.chart_width,
            header,
        })
    }

    /// Bar occupying `lane`
    pub fn bar(&self, lane: usize) -> Option<&BarLayout> {
        self.bars.get(lane)
    }
}

/// Keep labels within `max_chars`, marking the cut with `...`
fn shorten(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Timeline pane state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TimelineView {
    #[default]
    Idle,
    Loading,
    /// Fetch succeeded with no bars
    Empty,
    /// Fetch failed; the chart is not drawn
    Failed(String),
    Ready(TimelineLayout),
}

impl TimelineView {
    /// Inline text shown instead of a chart
    pub fn placeholder(&self) -> Option<String> {
        match self {
            TimelineView::Idle => Some("Select a run to see its timeline".to_string()),
            TimelineView::Loading => Some("Loading timeline...".to_string()),
            TimelineView::Empty => Some("No data to display".to_string()),
            TimelineView::Failed(message) => Some(format!("Timeline unavailable: {message}")),
            TimelineView::Ready(_) => None,
        }
    }

    pub fn layout(&self) -> Option<&TimelineLayout> {
        match self {
            TimelineView::Ready(layout) => Some(layout),
            _ => None,
        }
    }
}

/// Filter change requested by clicking a bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPatch {
    Correlation(String),
    ResourceType(String),
    Phase(String),
    /// Key carries nothing usable for the active mode
    Nothing,
}

impl FilterPatch {
    /// Patch for clicking `key` while the chart is grouped by `pairing`
    pub fn for_click(pairing: PairingMode, key: &str) -> Self {
        match pairing {
            PairingMode::Correlation => FilterPatch::Correlation(key.to_string()),
            PairingMode::Resource => {
                let parts: Vec<&str> = key.split(':').collect();
                match parts.as_slice() {
                    [resource_type, _name] => FilterPatch::ResourceType(resource_type.to_string()),
                    _ => FilterPatch::Nothing,
                }
            }
            PairingMode::Phase => FilterPatch::Phase(key.to_string()),
        }
    }

    /// Write the patch into `filters`; returns whether anything changed
    pub fn apply(self, filters: &mut LogFilters) -> bool {
        let (slot, value) = match self {
            FilterPatch::Correlation(v) => (&mut filters.correlation_id, v),
            FilterPatch::ResourceType(v) => (&mut filters.resource_type, v),
            FilterPatch::Phase(v) => (&mut filters.phase, v),
            FilterPatch::Nothing => return false,
        };
        if slot.as_deref() == Some(value.as_str()) {
            return false;
        }
        *slot = Some(value);
        true
    }
}
