//! In-memory SVG document
//!
//! Mirrors what the browser's `<svg>` element holds so native runs and tests
//! can drive the scene and export without a DOM.

use glam::Vec2;

use super::{Element, Gradient, Paint, Placement, Primitive, PrimitiveId, SVG_NS, Surface};
use crate::export::ExportError;
use crate::sim::Bounds;

/// A top-level child of the root `<svg>`
#[derive(Debug, Clone)]
struct Node {
    /// None for the `<defs>` block
    id: Option<PrimitiveId>,
    element: Element,
}

#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
    bounds: Option<Bounds>,
    children: Vec<Node>,
    next_id: u32,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Number of registered primitives (excludes `<defs>`)
    pub fn primitive_count(&self) -> usize {
        self.children.iter().filter(|n| n.id.is_some()).count()
    }

    /// Iterate primitives with the given tag in paint order
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |n| n.id.is_some() && n.element.tag == tag)
            .map(|n| &n.element)
    }

    pub fn element(&self, id: PrimitiveId) -> Option<&Element> {
        self.children
            .iter()
            .find(|n| n.id == Some(id))
            .map(|n| &n.element)
    }

    /// Tags of all top-level children, in paint order
    pub fn paint_order(&self) -> Vec<&'static str> {
        self.children.iter().map(|n| n.element.tag).collect()
    }

    /// Gradient definition by id
    pub fn gradient(&self, id: &str) -> Option<&Element> {
        self.defs()?
            .children
            .iter()
            .find(|g| g.get_attr("id") == Some(id))
    }

    fn defs(&self) -> Option<&Element> {
        self.children
            .iter()
            .find(|n| n.id.is_none())
            .map(|n| &n.element)
    }

    fn element_mut(&mut self, id: PrimitiveId) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .find(|n| n.id == Some(id))
            .map(|n| &mut n.element)
    }

    fn defs_mut(&mut self) -> &mut Element {
        let idx = match self.children.iter().position(|n| n.id.is_none()) {
            Some(idx) => idx,
            None => {
                self.children.push(Node {
                    id: None,
                    element: Element::new("defs"),
                });
                self.children.len() - 1
            }
        };
        &mut self.children[idx].element
    }

    /// Serialize to markup, root element first
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str("<svg");
        if let Some(b) = self.bounds {
            out.push_str(&format!(
                " width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\"",
                b.width, b.height, b.width, b.height
            ));
        }
        out.push_str(&format!(" xmlns=\"{SVG_NS}\" id=\"mitosys\">"));
        for node in &self.children {
            write_element(&mut out, &node.element);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value, true));
        out.push('"');
    }
    if el.children.is_empty() && el.text.is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = &el.text {
        out.push_str(&escape(text, false));
    }
    for child in &el.children {
        write_element(out, child);
    }
    out.push_str("</");
    out.push_str(el.tag);
    out.push('>');
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl Surface for SvgDocument {
    fn reset(&mut self, bounds: Bounds) {
        self.children.clear();
        self.bounds = Some(bounds);
    }

    fn define_gradient(&mut self, gradient: &Gradient) {
        self.defs_mut().children.push(gradient.element());
    }

    fn add(&mut self, primitive: &Primitive, placement: Placement) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        let node = Node {
            id: Some(id),
            element: primitive.element(),
        };
        match placement {
            Placement::Front => self.children.push(node),
            Placement::Back => self.children.insert(0, node),
        }
        id
    }

    fn move_to(&mut self, id: PrimitiveId, center: Vec2) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr("cx", center.x.to_string());
            el.set_attr("cy", center.y.to_string());
        }
    }

    fn set_fill(&mut self, id: PrimitiveId, fill: &Paint) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr("fill", fill.to_attr());
        }
    }

    fn set_stop_color(&mut self, class: &str, color: &str) {
        let stop = self
            .children
            .iter_mut()
            .filter(|n| n.id.is_none())
            .find_map(|n| n.element.find_class_mut(class));
        if let Some(stop) = stop {
            stop.set_attr("stop-color", color.to_string());
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        self.children.retain(|n| n.id != Some(id));
    }

    fn to_svg_source(&self) -> Result<String, ExportError> {
        Ok(self.to_markup())
    }
}
