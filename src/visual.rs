//! Slide visualizations.
//!
//! A slide's `visualContent` is `{ "type": "...", "content": { ... } }` where
//! the payload shape depends on the type. [`VisualContent::from_value`] maps
//! the type tag onto one variant per visualization and deserializes the
//! payload leniently. Unknown tags and payloads that don't deserialize keep
//! their raw JSON in [`VisualContent::Other`] so nothing is lost.
//!
//! Type tags are matched loosely: case, `_`, `-` and spaces are ignored, so
//! `keyStats`, `key_stats` and `Key Stats` are the same visualization.

use crate::types::{lenient_string, lenient_text, lenient_vec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum VisualContent {
    KeyStats(KeyStats),
    BarChart(Chart),
    PieChart(Chart),
    Process(Process),
    Network(Network),
    Map(MapView),
    Comparison(Comparison),
    /// Unrecognized type tag or unreadable payload.
    Other { kind: String, content: Value },
}

/// Title and subtitle carried by every payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Heading {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KeyStats {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, alias = "keyStats", alias = "key_stats", deserialize_with = "lenient_vec")]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stat {
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Bar and pie charts share one payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Chart {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataPoint {
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: f64,
}

impl DataPoint {
    /// Whole numbers without a fraction, everything else to two places.
    pub fn display_value(&self) -> String {
        format_number(self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Process {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Network {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub nodes: Vec<Node>,
    #[serde(default, alias = "connections", alias = "links", deserialize_with = "lenient_vec")]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Edge {
    #[serde(default, alias = "source", deserialize_with = "lenient_text")]
    pub from: String,
    #[serde(default, alias = "target", deserialize_with = "lenient_text")]
    pub to: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapView {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(
        default,
        alias = "crimeSpots",
        alias = "locations",
        alias = "spots",
        deserialize_with = "lenient_vec"
    )]
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapPoint {
    #[serde(default, alias = "label", alias = "location", deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, alias = "latitude", deserialize_with = "lenient_number")]
    pub lat: f64,
    #[serde(default, alias = "lon", alias = "longitude", deserialize_with = "lenient_number")]
    pub lng: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Comparison {
    #[serde(flatten)]
    pub heading: Heading,
    #[serde(default, alias = "leftTitle", deserialize_with = "lenient_string")]
    pub left_title: Option<String>,
    #[serde(default, alias = "rightTitle", deserialize_with = "lenient_string")]
    pub right_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(default, alias = "feature", alias = "label", deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub left: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub right: String,
}

impl VisualContent {
    /// Interpret a raw `visualContent` value.
    ///
    /// The payload is read from `content` when it is an object, otherwise
    /// from the value itself (older documents inline the payload).
    pub fn from_value(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let payload = payload_of(value);

        let parsed = match normalize_kind(&kind).as_str() {
            "keystats" | "stats" | "statistics" => payload_as(payload).map(Self::KeyStats),
            "barchart" | "bar" | "chart" => payload_as(payload).map(Self::BarChart),
            "piechart" | "pie" | "donut" => payload_as(payload).map(Self::PieChart),
            "process" | "steps" | "timeline" | "flow" => payload_as(payload).map(Self::Process),
            "network" | "networkdiagram" | "graph" => payload_as(payload).map(Self::Network),
            "map" | "crimemap" | "heatmap" => payload_as(payload).map(Self::Map),
            "comparison" | "compare" | "versus" => payload_as(payload).map(Self::Comparison),
            _ => None,
        };

        parsed.unwrap_or_else(|| Self::Other {
            kind,
            content: payload.clone(),
        })
    }

    /// Human name of the visualization, or the raw tag for unknown ones.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::KeyStats(_) => "key stats",
            Self::BarChart(_) => "bar chart",
            Self::PieChart(_) => "pie chart",
            Self::Process(_) => "process",
            Self::Network(_) => "network",
            Self::Map(_) => "map",
            Self::Comparison(_) => "comparison",
            Self::Other { kind, .. } => kind.as_str(),
        }
    }

    fn heading(&self) -> Option<&Heading> {
        match self {
            Self::KeyStats(v) => Some(&v.heading),
            Self::BarChart(v) | Self::PieChart(v) => Some(&v.heading),
            Self::Process(v) => Some(&v.heading),
            Self::Network(v) => Some(&v.heading),
            Self::Map(v) => Some(&v.heading),
            Self::Comparison(v) => Some(&v.heading),
            Self::Other { .. } => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Other { content, .. } => content.get("title").and_then(Value::as_str),
            _ => self.heading().and_then(|h| h.title.as_deref()),
        }
    }

    pub fn subtitle(&self) -> Option<&str> {
        match self {
            Self::Other { content, .. } => content.get("subtitle").and_then(Value::as_str),
            _ => self.heading().and_then(|h| h.subtitle.as_deref()),
        }
    }

    /// Number of plotted items (stats, data points, steps, nodes, points,
    /// features). For unknown visuals, the length of a `points` array.
    pub fn item_count(&self) -> usize {
        match self {
            Self::KeyStats(v) => v.stats.len(),
            Self::BarChart(v) | Self::PieChart(v) => v.data.len(),
            Self::Process(v) => v.steps.len(),
            Self::Network(v) => v.nodes.len(),
            Self::Map(v) => v.points.len(),
            Self::Comparison(v) => v.features.len(),
            Self::Other { content, .. } => content
                .get("points")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }
}

/// Length of the item array in a raw `visualContent`, counting every
/// element whatever its shape. Items the typed view drops (`data: [10, 20]`,
/// `keyStats: ["12k"]`) still count, which is what layout mixing sees.
pub fn raw_item_count(value: &Value) -> usize {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    let payload = payload_of(value);
    item_keys(&normalize_kind(kind))
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
        .map_or(0, Vec::len)
}

/// Payload keys holding the plotted items, aliases included.
fn item_keys(normalized_kind: &str) -> &'static [&'static str] {
    match normalized_kind {
        "keystats" | "stats" | "statistics" => &["stats", "keyStats", "key_stats"],
        "barchart" | "bar" | "chart" | "piechart" | "pie" | "donut" => &["data"],
        "process" | "steps" | "timeline" | "flow" => &["steps"],
        "network" | "networkdiagram" | "graph" => &["nodes"],
        "map" | "crimemap" | "heatmap" => &["points", "crimeSpots", "locations", "spots"],
        "comparison" | "compare" | "versus" => &["features"],
        _ => &["points"],
    }
}

fn payload_of(value: &Value) -> &Value {
    match value.get("content") {
        Some(content @ Value::Object(_)) => content,
        _ => value,
    }
}

fn normalize_kind(kind: &str) -> String {
    kind.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn payload_as<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    if !payload.is_object() {
        return None;
    }
    serde_json::from_value(payload.clone()).ok()
}

/// Numbers, numeric strings (`"42"`, `"12.5%"`), anything else is zero.
fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .replace(',', "")
            .parse()
            .unwrap_or_default(),
        _ => 0.0,
    })
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_stats_from_camel_case_payload() {
        let visual = VisualContent::from_value(&json!({
            "type": "keyStats",
            "content": {
                "title": "By the numbers",
                "keyStats": [
                    {"label": "Listeners", "value": 12000},
                    {"label": "Episodes", "value": "48", "description": "since launch"}
                ]
            }
        }));
        let VisualContent::KeyStats(stats) = &visual else {
            panic!("expected key stats, got {visual:?}");
        };
        assert_eq!(stats.stats.len(), 2);
        assert_eq!(stats.stats[0].value, "12000");
        assert_eq!(stats.stats[1].description.as_deref(), Some("since launch"));
        assert_eq!(visual.title(), Some("By the numbers"));
        assert_eq!(visual.item_count(), 2);
    }

    #[test]
    fn type_tags_match_loosely() {
        for tag in ["bar_chart", "Bar Chart", "bar-chart", "BarChart"] {
            let visual = VisualContent::from_value(&json!({"type": tag, "content": {"data": []}}));
            assert_eq!(visual.kind_name(), "bar chart", "tag {tag}");
        }
    }

    #[test]
    fn chart_values_accept_numeric_strings() {
        let visual = VisualContent::from_value(&json!({
            "type": "pie_chart",
            "content": {"data": [
                {"label": "A", "value": "40%"},
                {"name": "B", "value": 60},
                {"label": "C", "value": "n/a"}
            ]}
        }));
        let VisualContent::PieChart(chart) = visual else {
            panic!("expected pie chart");
        };
        let values: Vec<f64> = chart.data.iter().map(|d| d.value).collect();
        assert_eq!(values, vec![40.0, 60.0, 0.0]);
        assert_eq!(chart.data[1].label, "B");
    }

    #[test]
    fn map_accepts_crime_spots() {
        let visual = VisualContent::from_value(&json!({
            "type": "map",
            "content": {"crimeSpots": [
                {"location": "Docks", "lat": 51.5, "lng": -0.1},
                {"name": "Market", "latitude": "51.6", "longitude": "-0.2"}
            ]}
        }));
        let VisualContent::Map(map) = visual else {
            panic!("expected map");
        };
        assert_eq!(map.points[0].name, "Docks");
        assert_eq!(map.points[1].lat, 51.6);
        assert_eq!(map.points[1].lng, -0.2);
    }

    #[test]
    fn network_edges_accept_source_target() {
        let visual = VisualContent::from_value(&json!({
            "type": "network",
            "content": {
                "nodes": [{"id": "a", "label": "Alpha"}, {"id": "b", "name": "Beta"}],
                "connections": [{"source": "a", "target": "b"}]
            }
        }));
        let VisualContent::Network(net) = visual else {
            panic!("expected network");
        };
        assert_eq!(net.nodes[1].label, "Beta");
        assert_eq!(net.edges[0].from, "a");
        assert_eq!(net.edges[0].to, "b");
    }

    #[test]
    fn unknown_type_keeps_raw_payload() {
        let raw = json!({"type": "hologram", "content": {"title": "Spin", "points": [1, 2, 3]}});
        let visual = VisualContent::from_value(&raw);
        assert_eq!(visual.kind_name(), "hologram");
        assert_eq!(visual.title(), Some("Spin"));
        assert_eq!(visual.item_count(), 3);
        assert!(matches!(visual, VisualContent::Other { ref content, .. } if content["points"] == json!([1, 2, 3])));
    }

    #[test]
    fn missing_visual_content_is_other() {
        let visual = VisualContent::from_value(&Value::Null);
        assert_eq!(visual.kind_name(), "");
        assert_eq!(visual.item_count(), 0);
    }

    #[test]
    fn payload_inlined_without_content_key() {
        let visual = VisualContent::from_value(&json!({
            "type": "process",
            "steps": [{"title": "Plan"}, {"title": "Record"}]
        }));
        assert_eq!(visual.kind_name(), "process");
        assert_eq!(visual.item_count(), 2);
    }

    #[test]
    fn raw_count_includes_scalar_items() {
        let chart = json!({"type": "bar_chart", "content": {"data": [10, 20, 30]}});
        assert_eq!(VisualContent::from_value(&chart).item_count(), 0);
        assert_eq!(raw_item_count(&chart), 3);

        let stats = json!({"type": "key_stats", "content": {"keyStats": ["12k", "48"]}});
        assert_eq!(raw_item_count(&stats), 2);

        let map = json!({"type": "crime_map", "crimeSpots": [{}, "x", 3, null]});
        assert_eq!(raw_item_count(&map), 4);

        assert_eq!(raw_item_count(&json!({"type": "hologram", "content": {"points": [1]}})), 1);
        assert_eq!(raw_item_count(&json!({"type": "bar_chart", "content": {"data": "none"}})), 0);
        assert_eq!(raw_item_count(&Value::Null), 0);
    }

    #[test]
    fn format_number_trims_whole_values() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(3.14159), "3.14");
        assert_eq!(format_number(-7.0), "-7");
    }
}
