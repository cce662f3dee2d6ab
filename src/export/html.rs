use serde_json::{Value, json};

use crate::export::model::{GraphModel, Physics};

const VIS_NETWORK_URL: &str = "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>codeweb</title>
"#;

const STYLE: &str = r#"<style>
  html, body { margin: 0; height: 100%; }
  #web { width: 100%; height: 100%; border: 0; }
</style>
</head>
<body>
<div id="web"></div>
"#;

/// Serialize a value for embedding in a `<script>` block.
fn script_json(value: &Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn network_options(physics: &Physics) -> Value {
    json!({
        "edges": { "arrows": { "to": { "enabled": true } } },
        "physics": {
            "solver": "repulsion",
            "repulsion": {
                "nodeDistance": physics.node_distance,
                "centralGravity": physics.central_gravity,
                "springLength": physics.spring_length,
                "springConstant": physics.spring_strength,
                "damping": physics.damping,
            }
        }
    })
}

/// Render a standalone HTML page that lays the graph out with vis-network.
pub fn render_html(model: &GraphModel, physics: &Physics) -> anyhow::Result<String> {
    let nodes: Vec<Value> = model
        .nodes
        .iter()
        .map(|node| {
            let title = match node.lines {
                Some(lines) => format!("{} ({} lines)", node.label, lines),
                None => format!("{} (external)", node.label),
            };
            json!({
                "id": node.id,
                "label": node.label,
                "size": node.size,
                "shape": node.shape,
                "title": title,
            })
        })
        .collect();

    let edges: Vec<Value> = model
        .edges
        .iter()
        .map(|edge| {
            json!({
                "from": edge.from,
                "to": edge.to,
                "value": edge.count,
            })
        })
        .collect();

    // Assembled in one pass: inserted JSON is never rescanned.
    let nodes = script_json(&Value::Array(nodes))?;
    let edges = script_json(&Value::Array(edges))?;
    let options = script_json(&network_options(physics))?;
    Ok(format!(
        "{HEAD}<script src=\"{VIS_NETWORK_URL}\"></script>\n{STYLE}<script>
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var options = {options};
  new vis.Network(document.getElementById(\"web\"), {{ nodes: nodes, edges: edges }}, options);
</script>
</body>
</html>
"
    ))
}
