//! Command handlers behind the CLI. Each returns a JSON value for printing.
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::canvas::encode_png;
use crate::config::{self, InspectorConfig};
use crate::errors::{InspectorError, InspectorResult};
use crate::geometry::{PixelPoint, Point, Rect, RectF};
use crate::hierarchy::{format_bounds, UiNode};
use crate::sampling::{PickMode, Upsert};
use crate::session::{FileCapture, History, Inspector, JsonHistoryStore, PointerOutcome};

/// Inputs shared by every command.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub image: Option<PathBuf>,
    pub xml: Option<PathBuf>,
    pub container: Option<(f64, f64)>,
    pub remember: bool,
}

pub fn open_history(config: &InspectorConfig) -> History {
    let store = JsonHistoryStore::from_config(&config.history);
    tracing::debug!(path = %store.path().display(), "opening history");
    History::open(Box::new(store), config.history.limit)
}

/// Builds a session from the screenshot and/or dump on the command line.
pub async fn open_session(
    config: &InspectorConfig,
    opts: &SessionOptions,
) -> InspectorResult<Inspector> {
    let mut inspector = Inspector::new(config.clone());
    if opts.remember {
        inspector = inspector.with_history(open_history(config));
    }
    match (&opts.image, &opts.xml) {
        (Some(image), xml) => {
            let source = FileCapture::new(image.clone(), xml.clone());
            inspector.load_capture(&source, opts.container).await?;
        }
        (None, Some(xml)) => {
            let text = tokio::fs::read_to_string(xml).await?;
            inspector.load_hierarchy(&text)?;
        }
        (None, None) => {}
    }
    Ok(inspector)
}

fn require_hierarchy(inspector: &Inspector) -> InspectorResult<&UiNode> {
    inspector
        .hierarchy()
        .root()
        .ok_or(InspectorError::NoHierarchy)
}

#[derive(Debug, Serialize)]
struct TreeRow {
    id: u64,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeRow>,
}

fn tree_row(node: &UiNode, max_depth: Option<usize>) -> TreeRow {
    let expand = max_depth.map_or(true, |max| node.depth < max);
    TreeRow {
        id: node.id.get(),
        label: node.display_label(),
        bounds: node.bounds().map(|b| format_bounds(&b)),
        children: if expand {
            node.children.iter().map(|c| tree_row(c, max_depth)).collect()
        } else {
            Vec::new()
        },
    }
}

fn node_json(inspector: &Inspector, node: &UiNode) -> Value {
    let details: serde_json::Map<String, Value> = node
        .details()
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let path: Vec<String> = inspector
        .hierarchy()
        .path_to(node.id)
        .unwrap_or_default()
        .iter()
        .map(|n| n.display_label())
        .collect();
    json!({
        "id": node.id.get(),
        "label": node.display_label(),
        "bounds": node.bounds(),
        "details": details,
        "path": path,
    })
}

pub fn tree(inspector: &Inspector, max_depth: Option<usize>) -> InspectorResult<Value> {
    let root = require_hierarchy(inspector)?;
    Ok(json!({
        "nodes": root.node_count(),
        "root": tree_row(root, max_depth),
    }))
}

pub fn search(inspector: &Inspector, query: &str) -> InspectorResult<Value> {
    require_hierarchy(inspector)?;
    let matches: Vec<Value> = inspector
        .hierarchy()
        .search(query)
        .into_iter()
        .map(|n| node_json(inspector, n))
        .collect();
    Ok(json!({ "query": query, "count": matches.len(), "matches": matches }))
}

/// Hit-test at an original-space point.
pub fn hit(inspector: &mut Inspector, x: i32, y: i32) -> InspectorResult<Value> {
    require_hierarchy(inspector)?;
    let position = PixelPoint::new(x, y);
    let id = inspector.select_node_at(position).map(|n| n.id);
    let node = id
        .and_then(|id| inspector.hierarchy().find(id))
        .map(|n| node_json(inspector, n));
    Ok(json!({ "position": position, "node": node }))
}

/// Click at a display-space point with colour picking on.
pub fn pick(inspector: &mut Inspector, x: f64, y: f64) -> InspectorResult<Value> {
    if inspector.bitmap().is_none() {
        return Err(InspectorError::NoImage);
    }
    inspector.set_pick_mode(PickMode::SingleColor);
    let at = Point::new(x, y);
    let crosshair = inspector.crosshair(at);
    inspector.pointer_down(at);
    let outcome = inspector.pointer_up(at);

    let (node, sample) = match &outcome {
        PointerOutcome::Click { node, sample, .. } => (*node, *sample),
        _ => (None, None),
    };
    let node = node
        .and_then(|id| inspector.hierarchy().find(id))
        .map(|n| node_json(inspector, n));
    let viewport = inspector.viewport().map(|v| {
        json!({
            "zoom_percent": v.zoom_percent(),
            "canvas": v.canvas_size(),
        })
    });
    let color = sample.map(|s| {
        json!({
            "hex": s.hex(),
            "rgb": s.rgb(),
            "rgba": s.rgba(),
            "copy": s.copy_text(),
        })
    });
    Ok(json!({
        "display": at,
        "original": crosshair,
        "viewport": viewport,
        "color": color,
        "node": node,
    }))
}

pub fn area(inspector: &mut Inspector, rect: Rect, points: Option<usize>) -> InspectorResult<Value> {
    if let Some(n) = points {
        inspector.set_point_count(n);
    }
    let index = match inspector.sample_region(RectF::from(rect))? {
        Some(Upsert::Inserted) => 0,
        Some(Upsert::Replaced(i)) => i,
        None => return Ok(json!({ "area": rect, "samples": [] })),
    };
    let Some(record) = inspector.records().areas().get(index) else {
        return Ok(json!({ "area": rect, "samples": [] }));
    };
    Ok(json!({
        "area": record.area,
        "requested": inspector.point_count(),
        "samples": record.samples.iter().map(|s| s.copy_text()).collect::<Vec<_>>(),
        "copy": record.copy_text(),
    }))
}

pub fn crop(
    inspector: &Inspector,
    region: Rect,
    out: &Path,
    preview_out: Option<&Path>,
) -> InspectorResult<Value> {
    let crop = inspector.crop(region)?;
    std::fs::write(out, crop.png_bytes()?)?;
    if let Some(path) = preview_out {
        std::fs::write(path, encode_png(&crop.preview)?)?;
    }
    tracing::info!(out = %out.display(), "crop written");
    Ok(json!({
        "region": crop.region,
        "size": crop.image.dimensions(),
        "preview_size": crop.preview.dimensions(),
        "preview_scale": crop.preview_scale(),
        "out": out,
    }))
}

/// Samples every `--pick` (display space) and `--area` (original space),
/// then writes the export document.
pub fn export(
    inspector: &mut Inspector,
    picks: &[Point],
    areas: &[Rect],
    points: Option<usize>,
    out: &Path,
) -> InspectorResult<Value> {
    if inspector.bitmap().is_none() {
        return Err(InspectorError::NoImage);
    }
    if let Some(n) = points {
        inspector.set_point_count(n);
    }
    for p in picks {
        if inspector.sample_at(*p).is_none() {
            tracing::warn!(x = p.x, y = p.y, "pick outside canvas skipped");
        }
    }
    for rect in areas {
        inspector.sample_region(RectF::from(*rect))?;
    }
    inspector.select_area_record(0);

    let doc = inspector.export()?;
    doc.write(out)?;
    Ok(json!({
        "out": out,
        "total_items": doc.total_items,
        "snippet": inspector.multi_color_snippet(),
    }))
}

pub fn history_list(history: &History) -> Value {
    json!({ "entries": history.entries() })
}

pub fn history_remove(history: &mut History, id: &str) -> InspectorResult<Value> {
    let removed = history
        .remove(id)
        .ok_or_else(|| InspectorError::HistoryEntryNotFound(id.to_string()))?;
    Ok(json!({ "removed": removed }))
}

pub fn history_clear(history: &mut History) -> Value {
    history.clear();
    json!({ "cleared": true })
}

pub fn show_config(config: &InspectorConfig, write: bool) -> InspectorResult<Value> {
    if write {
        config::save_config(config)?;
    }
    Ok(serde_json::to_value(config)?)
}
