//! Live `<svg>` element surface (WASM only)

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element as DomElement, HtmlAnchorElement};

use super::{Element, Gradient, Paint, Placement, Primitive, PrimitiveId, SVG_NS, Surface};
use crate::consts::EXPORT_FILE_NAME;
use crate::export::{self, ExportError};
use crate::sim::Bounds;

pub struct DomSurface {
    document: Document,
    root: DomElement,
    defs: Option<DomElement>,
    nodes: HashMap<PrimitiveId, DomElement>,
    next_id: u32,
}

impl DomSurface {
    /// Attach to the `<svg>` element with the given id
    pub fn attach(element_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let root = document.get_element_by_id(element_id)?;
        Some(Self {
            document,
            root,
            defs: None,
            nodes: HashMap::new(),
            next_id: 0,
        })
    }

    fn build(&self, el: &Element) -> Result<DomElement, JsValue> {
        let node = self.document.create_element_ns(Some(SVG_NS), el.tag)?;
        for (name, value) in &el.attrs {
            node.set_attribute(name, value)?;
        }
        if let Some(text) = &el.text {
            node.set_text_content(Some(text));
        }
        for child in &el.children {
            node.append_child(&self.build(child)?)?;
        }
        Ok(node)
    }

    fn defs(&mut self) -> Result<DomElement, JsValue> {
        if let Some(defs) = &self.defs {
            return Ok(defs.clone());
        }
        let defs = self.document.create_element_ns(Some(SVG_NS), "defs")?;
        self.root.append_child(&defs)?;
        self.defs = Some(defs.clone());
        Ok(defs)
    }

    /// Serialize the live element and hand it to the browser as `mitosys.svg`
    pub fn download(&self) -> Result<(), ExportError> {
        let doc = export::document(self)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| ExportError::Host("no document body".into()))?;
        let link: HtmlAnchorElement = self
            .document
            .create_element("a")
            .map_err(host_err)?
            .dyn_into()
            .map_err(|_| ExportError::Host("not an anchor".into()))?;
        link.set_text_content(Some("download"));
        link.set_href(&export::data_url(&doc));
        link.set_target("_blank");
        link.set_download(EXPORT_FILE_NAME);
        body.append_child(&link).map_err(host_err)?;
        link.click();
        link.remove();
        log::info!("Offered {} ({} bytes)", EXPORT_FILE_NAME, doc.len());
        Ok(())
    }
}

fn host_err(e: JsValue) -> ExportError {
    ExportError::Host(format!("{:?}", e))
}

impl Surface for DomSurface {
    fn reset(&mut self, bounds: Bounds) {
        self.root.set_inner_html("");
        self.defs = None;
        self.nodes.clear();
        let view_box = format!("0 0 {} {}", bounds.width, bounds.height);
        let _ = self.root.set_attribute("width", &bounds.width.to_string());
        let _ = self.root.set_attribute("height", &bounds.height.to_string());
        let _ = self.root.set_attribute("viewBox", &view_box);
        let _ = self.root.set_attribute("xmlns", SVG_NS);
    }

    fn define_gradient(&mut self, gradient: &Gradient) {
        let result = self.defs().and_then(|defs| {
            let node = self.build(&gradient.element())?;
            defs.append_child(&node)
        });
        if result.is_err() {
            log::warn!("Failed to define gradient {}", gradient.id());
        }
    }

    fn add(&mut self, primitive: &Primitive, placement: Placement) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;

        match self.build(&primitive.element()) {
            Ok(node) => {
                let inserted = match placement {
                    Placement::Front => self.root.append_child(&node).map(|_| ()),
                    Placement::Back => self.root.prepend_with_node_1(&node),
                };
                if inserted.is_ok() {
                    self.nodes.insert(id, node);
                } else {
                    log::warn!("Failed to insert primitive");
                }
            }
            Err(e) => log::warn!("Failed to create primitive: {:?}", e),
        }
        id
    }

    fn move_to(&mut self, id: PrimitiveId, center: Vec2) {
        if let Some(node) = self.nodes.get(&id) {
            let _ = node.set_attribute("cx", &center.x.to_string());
            let _ = node.set_attribute("cy", &center.y.to_string());
        }
    }

    fn set_fill(&mut self, id: PrimitiveId, fill: &Paint) {
        if let Some(node) = self.nodes.get(&id) {
            let _ = node.set_attribute("fill", &fill.to_attr());
        }
    }

    fn set_stop_color(&mut self, class: &str, color: &str) {
        if let Ok(Some(stop)) = self.root.query_selector(&format!(".{class}")) {
            let _ = stop.set_attribute("stop-color", color);
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        if let Some(node) = self.nodes.remove(&id) {
            node.remove();
        }
    }

    fn to_svg_source(&self) -> Result<String, ExportError> {
        let serializer = web_sys::XmlSerializer::new().map_err(host_err)?;
        serializer.serialize_to_string(&self.root).map_err(host_err)
    }
}
