//! SVG markup serialization

use std::fmt::Write;

use super::{NodeId, Scene, Tag};

const XMLNS: &str = "http://www.w3.org/2000/svg";

/// Serialize the subtree rooted at `id`
pub fn render(scene: &Scene, id: NodeId) -> String {
    let mut out = String::new();
    write_node(scene, id, &mut out);
    out
}

fn write_node(scene: &Scene, id: NodeId, out: &mut String) {
    let Some(element) = scene.element(id) else {
        return;
    };
    let name = element.tag.name();
    out.push('<');
    out.push_str(name);
    if element.tag == Tag::Svg && !element.attrs.contains_key("xmlns") {
        let _ = write!(out, " xmlns=\"{XMLNS}\"");
    }
    for (key, value) in &element.attrs {
        let _ = write!(out, " {key}=\"{}\"", escape(value));
    }
    if !element.style.is_empty() {
        out.push_str(" style=\"");
        for (key, value) in &element.style {
            let _ = write!(out, "{key}: {};", escape(value));
        }
        out.push('"');
    }

    let children = scene.children(id);
    if element.text.is_none() && children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = &element.text {
        out.push_str(&escape(text));
    }
    for &child in children {
        write_node(scene, child, out);
    }
    let _ = write!(out, "</{name}>");
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::super::Element;
    use super::*;

    #[test]
    fn test_render_nested() {
        let mut scene = Scene::new(Element::new(Tag::Svg).attr("viewBox", "0 0 10 10"));
        let root = scene.root();
        let g = scene.append(root, Element::group().attr("fill", "#fff"));
        scene.append(g, Element::new(Tag::Circle).attr("r", 3));
        let t = scene.append(root, Element::new(Tag::Text).text("A & B"));
        scene.set_style(t, "display", "none");

        assert_eq!(
            scene.to_svg(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 10 10\">\
             <g fill=\"#fff\"><circle r=\"3\"/></g>\
             <text style=\"display: none;\">A &amp; B</text></svg>"
        );
    }

    #[test]
    fn test_render_removed_node_is_empty() {
        let mut scene = Scene::new(Element::new(Tag::Svg));
        let root = scene.root();
        let g = scene.append(root, Element::group());
        scene.remove(g);
        assert_eq!(render(&scene, g), "");
    }
}
