use serde_json::{Value, json};

/// A body of the given size holding `children`.
pub fn page(width: f32, height: f32, children: Vec<Value>) -> Value {
    json!({
        "tag": "body",
        "bounds": { "left": 0, "top": 0, "width": width, "height": height },
        "children": children
    })
}

/// An element with an id, a style and a border box.
pub fn element(tag: &str, id: &str, style: Value, bounds: [f32; 4]) -> Value {
    json!({
        "tag": tag,
        "id": id,
        "style": style,
        "bounds": { "left": bounds[0], "top": bounds[1], "width": bounds[2], "height": bounds[3] }
    })
}

/// A block with a background, so it is never collapsed away.
pub fn panel(id: &str, bounds: [f32; 4]) -> Value {
    element("div", id, json!({ "background-color": "#eeeeee" }), bounds)
}

pub fn with_children(mut parent: Value, children: Vec<Value>) -> Value {
    parent["children"] = Value::Array(children);
    parent
}

/// A paragraph with measured text and a baseline at 80% of its height.
pub fn paragraph(id: &str, text: &str, bounds: [f32; 4]) -> Value {
    let mut node = element("p", id, json!({ "display": "block" }), bounds);
    node["text"] = json!(text);
    node["baseline"] = json!(bounds[3] * 0.8);
    node
}

/// An inline run of text with a baseline at 80% of its height.
pub fn label(id: &str, text: &str, bounds: [f32; 4]) -> Value {
    let mut node = element("span", id, json!({ "display": "inline" }), bounds);
    node["text"] = json!(text);
    node["baseline"] = json!(bounds[3] * 0.8);
    node
}

pub fn floated(id: &str, side: &str, bounds: [f32; 4]) -> Value {
    element(
        "div",
        id,
        json!({ "float": side, "background-color": "#cccccc" }),
        bounds,
    )
}

/// A flex container with the given flex properties.
pub fn flex_row(id: &str, style: Value, bounds: [f32; 4], children: Vec<Value>) -> Value {
    let mut style = style;
    style["display"] = json!("flex");
    with_children(element("div", id, style, bounds), children)
}
