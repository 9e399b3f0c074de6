//! Summary charts over the stored incidents.
//!
//! Each renderer returns an HTML fragment: a `<div>` plus a script that loads
//! plotly.js and draws a figure built here as JSON. Empty inputs produce a
//! short `<p>` message instead of a chart.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::models::IncidentRecord;
use crate::store;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const COUNTS_TITLE: &str = "Incident Nature Counts";
const CLUSTER_TITLE: &str = "Clustering of Incident Natures by Frequency";
const MAX_CLUSTERS: usize = 4;
const KMEANS_MAX_ITER: usize = 100;

/// Which chart to draw, as named in `/visualize/{viz_type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizKind {
    Clustering,
    BarGraph,
    /// Line chart of nature counts.
    Custom,
}

impl std::str::FromStr for VizKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clustering" => Ok(VizKind::Clustering),
            "bargraph" => Ok(VizKind::BarGraph),
            "custom" => Ok(VizKind::Custom),
            other => Err(format!("Invalid visualization type: {}", other)),
        }
    }
}

pub fn render(kind: VizKind, records: &[IncidentRecord]) -> String {
    match kind {
        VizKind::Clustering => clustering(records),
        VizKind::BarGraph => bar_graph(records),
        VizKind::Custom => line_graph(records),
    }
}

/// `normanpd render`: draw a chart from the stored incidents to a file or stdout.
pub async fn run_render(config: &Config, kind: VizKind, out: Option<&Path>) -> Result<()> {
    let pool = db::connect(config).await?;
    store::init(&pool).await?;
    let records = store::fetch_all(&pool).await?;
    pool.close().await;

    let html = render(kind, &records);
    match out {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

/// Count incidents per nature, most frequent first, ties by name.
pub fn nature_counts(records: &[IncidentRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(n, _)| *n == record.nature) {
            Some((_, c)) => *c += 1,
            None => counts.push((record.nature.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

pub fn bar_graph(records: &[IncidentRecord]) -> String {
    let tallies = nature_counts(records);
    let (natures, counts) = split_counts(&tallies);
    let figure = json!({
        "data": [{
            "type": "bar",
            "x": natures,
            "y": counts,
        }],
        "layout": {
            "title": { "text": COUNTS_TITLE },
            "xaxis": { "title": { "text": "nature" } },
            "yaxis": { "title": { "text": "count" } },
        },
    });
    figure_html("bargraph", &figure)
}

pub fn line_graph(records: &[IncidentRecord]) -> String {
    if records.is_empty() {
        return "<p>No data available for line graph visualization.</p>".to_string();
    }
    let tallies = nature_counts(records);
    let (natures, counts) = split_counts(&tallies);
    let figure = json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "x": natures,
            "y": counts,
        }],
        "layout": {
            "title": { "text": COUNTS_TITLE },
            "plot_bgcolor": "#f9f9f9",
            "xaxis": { "title": { "text": "Nature" }, "tickangle": 45 },
            "yaxis": { "title": { "text": "Frequency" } },
        },
    });
    figure_html("custom", &figure)
}

pub fn clustering(records: &[IncidentRecord]) -> String {
    if records.is_empty() {
        return "<p>No valid data available for clustering.</p>".to_string();
    }
    let counts = nature_counts(records);
    if counts.len() < 2 {
        return "<p>Not enough data points for clustering visualization.</p>".to_string();
    }

    let frequencies: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
    let scaled = standardize(&frequencies);
    let labels = kmeans_1d(&scaled, MAX_CLUSTERS.min(scaled.len()));

    let natures: Vec<&str> = counts.iter().map(|(n, _)| n.as_str()).collect();
    let hover: Vec<String> = counts
        .iter()
        .zip(&labels)
        .map(|((n, c), k)| format!("Nature: {}<br>Cluster: {}<br>Frequency: {}", n, k, c))
        .collect();
    let figure = json!({
        "data": [{
            "type": "scatter",
            "mode": "markers+text",
            "x": scaled,
            "y": vec![0.0; scaled.len()],
            "text": natures,
            "hovertext": hover,
            "hoverinfo": "text",
            "marker": { "size": 10, "color": labels, "showscale": true },
        }],
        "layout": {
            "title": { "text": CLUSTER_TITLE },
            "xaxis": { "title": { "text": "PCA Component 1" } },
            "yaxis": { "title": { "text": "PCA Component 2" } },
        },
    });
    figure_html("clustering", &figure)
}

fn split_counts(counts: &[(String, usize)]) -> (Vec<&str>, Vec<usize>) {
    counts.iter().map(|(n, c)| (n.as_str(), *c)).unzip()
}

fn figure_html(id: &str, figure: &Value) -> String {
    let div_id = format!("normanpd-{}", id);
    format!(
        "<div>\
<script type=\"text/javascript\">window.PlotlyConfig = {{MathJaxConfig: 'local'}};</script>\
<script charset=\"utf-8\" src=\"{cdn}\"></script>\
<div id=\"{div}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\
<script type=\"text/javascript\">\
(function() {{ var fig = {fig}; Plotly.newPlot(\"{div}\", fig.data, fig.layout, {{responsive: true}}); }})();\
</script></div>",
        cdn = PLOTLY_CDN,
        div = div_id,
        fig = script_safe(&figure.to_string()),
    )
}

/// Keep user-derived strings from closing the surrounding `<script>`.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Z-score scaling with population standard deviation; constant input maps
/// to all zeros.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    values
        .iter()
        .map(|v| if std > 0.0 { (v - mean) / std } else { 0.0 })
        .collect()
}

/// Lloyd's k-means on one dimension, returning a cluster label per value.
///
/// Centroids start at evenly spaced quantiles of the sorted values, so the
/// result is deterministic. Labels are ordered by centroid (0 = smallest).
pub fn kmeans_1d(values: &[f64], k: usize) -> Vec<usize> {
    if values.is_empty() || k == 0 {
        return vec![0; values.len()];
    }
    let k = k.min(values.len());

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut centroids: Vec<f64> = (0..k)
        .map(|i| {
            let idx = if k == 1 {
                0
            } else {
                i * (sorted.len() - 1) / (k - 1)
            };
            sorted[idx]
        })
        .collect();

    let mut labels = vec![0usize; values.len()];
    for _ in 0..KMEANS_MAX_ITER {
        let next: Vec<usize> = values.iter().map(|v| nearest(&centroids, *v)).collect();
        let changed = next != labels;
        labels = next;

        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<f64> = values
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l == c)
                .map(|(v, _)| *v)
                .collect();
            if !members.is_empty() {
                *centroid = members.iter().sum::<f64>() / members.len() as f64;
            }
        }

        if !changed {
            break;
        }
    }

    labels
}

fn nearest(centroids: &[f64], value: f64) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (value - **a).abs().total_cmp(&(value - **b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(natures: &[&str]) -> Vec<IncidentRecord> {
        natures
            .iter()
            .enumerate()
            .map(|(i, n)| IncidentRecord {
                incident_time: "01/01/2024 12:00".to_string(),
                incident_number: i.to_string(),
                incident_location: "Main St".to_string(),
                nature: n.to_string(),
                incident_ori: "OK0140200".to_string(),
            })
            .collect()
    }

    #[test]
    fn counts_sorted_by_frequency_then_name() {
        let counts = nature_counts(&records(&["Fight", "Alarm", "Fight", "Burglary", "Alarm", "Fight"]));
        assert_eq!(
            counts,
            vec![
                ("Fight".to_string(), 3),
                ("Alarm".to_string(), 2),
                ("Burglary".to_string(), 1),
            ]
        );
    }

    #[test]
    fn viz_kind_parses_route_names() {
        assert_eq!("clustering".parse::<VizKind>(), Ok(VizKind::Clustering));
        assert_eq!("bargraph".parse::<VizKind>(), Ok(VizKind::BarGraph));
        assert_eq!("custom".parse::<VizKind>(), Ok(VizKind::Custom));
        assert!("pie".parse::<VizKind>().is_err());
    }

    #[test]
    fn bar_graph_embeds_plotly_figure() {
        let html = bar_graph(&records(&["Fight", "Alarm", "Fight"]));
        assert!(html.contains("Incident Nature Counts"));
        assert!(html.contains("PlotlyConfig"));
        assert!(html.contains("plotly"));
        assert!(html.contains("\"type\":\"bar\""));
    }

    #[test]
    fn line_graph_messages_on_empty_data() {
        assert!(line_graph(&[]).contains("No data available"));
        let html = line_graph(&records(&["Fight"]));
        assert!(html.contains("lines+markers"));
        assert!(html.contains("#f9f9f9"));
    }

    #[test]
    fn clustering_needs_two_natures() {
        assert!(clustering(&[]).contains("No valid data"));
        assert!(clustering(&records(&["Fight", "Fight"])).contains("Not enough data points"));
        let html = clustering(&records(&["Fight", "Fight", "Alarm"]));
        assert!(html.contains(CLUSTER_TITLE));
    }

    #[test]
    fn script_content_cannot_close_tag() {
        let html = bar_graph(&records(&["</script><b>x"]));
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn standardize_handles_constant_input() {
        assert_eq!(standardize(&[3.0, 3.0]), vec![0.0, 0.0]);
        let z = standardize(&[1.0, 3.0]);
        assert!((z[0] + 1.0).abs() < 1e-9 && (z[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn kmeans_separates_obvious_groups() {
        let labels = kmeans_1d(&[1.0, 1.1, 0.9, 10.0, 10.2, 9.8], 2);
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn kmeans_caps_k_at_input_len() {
        let labels = kmeans_1d(&[5.0, 1.0], 4);
        assert_eq!(labels.len(), 2);
        assert_ne!(labels[0], labels[1]);
    }
}
