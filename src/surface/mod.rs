//! Drawing surface abstraction
//!
//! Scene and circles talk to a retained-mode vector surface through the
//! [`Surface`] trait. Primitives and gradients are described once as
//! [`Element`] trees so every backend emits the same markup:
//! - `SvgDocument`: in-memory document (native runs, tests, export)
//! - `DomSurface`: live `<svg>` element in the browser (wasm only)

pub mod svg;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use svg::SvgDocument;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;

use glam::Vec2;

use crate::export::ExportError;
use crate::sim::Bounds;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Handle to a primitive registered on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

/// Compositing rule for a primitive over what lies beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Lighten,
    HardLight,
    SoftLight,
}

impl BlendMode {
    pub fn as_css(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Lighten => "lighten",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
        }
    }

    /// `style` declaration, or None for the default mode
    fn declaration(&self) -> Option<String> {
        match self {
            BlendMode::Normal => None,
            mode => Some(format!("mix-blend-mode: {};", mode.as_css())),
        }
    }
}

/// Fill for a primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(String),
    /// Reference to a gradient definition by id
    Gradient(&'static str),
}

impl Paint {
    pub fn to_attr(&self) -> String {
        match self {
            Paint::Solid(color) => color.clone(),
            Paint::Gradient(id) => format!("url(\"#{id}\")"),
        }
    }
}

/// Where a new primitive is inserted in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Painted last (appended)
    Front,
    /// Painted first (prepended)
    Back,
}

/// Renderable primitives the scene creates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled disc
    Disc {
        center: Vec2,
        radius: f32,
        fill: Paint,
        blend: BlendMode,
    },
    /// Rectangle covering the whole surface
    FullRect {
        class: Option<&'static str>,
        fill: Paint,
        blend: BlendMode,
    },
    /// Text centered on the surface
    Label {
        text: String,
        font_size: f32,
        text_length: f32,
        fill: Paint,
        blend: BlendMode,
    },
}

impl Primitive {
    pub fn element(&self) -> Element {
        match self {
            Primitive::Disc {
                center,
                radius,
                fill,
                blend,
            } => Element::new("circle")
                .attr("cx", center.x)
                .attr("cy", center.y)
                .attr("r", radius)
                .attr("fill", fill.to_attr())
                .attr_opt("style", blend.declaration()),
            Primitive::FullRect { class, fill, blend } => Element::new("rect")
                .attr_opt("class", *class)
                .attr("height", "100%")
                .attr("width", "100%")
                .attr("fill", fill.to_attr())
                .attr_opt("style", blend.declaration()),
            Primitive::Label {
                text,
                font_size,
                text_length,
                fill,
                blend,
            } => {
                let mut style = String::from("font-family: \"Montserrat\", sans-serif; ");
                if let Some(decl) = blend.declaration() {
                    style.push_str(&decl);
                    style.push(' ');
                }
                style.push_str(&format!("font-size: {font_size}px;"));
                Element::new("text")
                    .attr("text-anchor", "middle")
                    .attr("x", "50%")
                    .attr("y", "50%")
                    .attr("fill", fill.to_attr())
                    .attr("textLength", text_length)
                    .attr("style", style)
                    .text(text.clone())
            }
        }
    }
}

/// A gradient color stop
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Offset in percent
    pub offset: f32,
    pub color: String,
    /// Class used to find the stop again for live recoloring
    pub class: Option<&'static str>,
}

impl GradientStop {
    pub fn new(offset: f32, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    fn element(&self) -> Element {
        Element::new("stop")
            .attr_opt("class", self.class)
            .attr("offset", percent(self.offset))
            .attr("stop-color", &self.color)
    }
}

/// Gradient definitions referenced by [`Paint::Gradient`]
///
/// Geometry values are percentages of the painted shape's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Radial {
        id: &'static str,
        spread: &'static str,
        cx: f32,
        cy: f32,
        r: f32,
        fx: f32,
        fy: f32,
        fr: f32,
        stops: Vec<GradientStop>,
    },
    Linear {
        id: &'static str,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stops: Vec<GradientStop>,
    },
}

impl Gradient {
    pub fn id(&self) -> &'static str {
        match self {
            Gradient::Radial { id, .. } | Gradient::Linear { id, .. } => *id,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Radial { stops, .. } | Gradient::Linear { stops, .. } => stops,
        }
    }

    pub fn element(&self) -> Element {
        let el = match self {
            Gradient::Radial {
                id,
                spread,
                cx,
                cy,
                r,
                fx,
                fy,
                fr,
                ..
            } => Element::new("radialGradient")
                .attr("id", *id)
                .attr("spreadMethod", *spread)
                .attr("cx", percent(*cx))
                .attr("cy", percent(*cy))
                .attr("r", percent(*r))
                .attr("fx", percent(*fx))
                .attr("fy", percent(*fy))
                .attr("fr", percent(*fr)),
            Gradient::Linear { id, x1, y1, x2, y2, .. } => Element::new("linearGradient")
                .attr("id", *id)
                .attr("x1", percent(*x1))
                .attr("y1", percent(*y1))
                .attr("x2", percent(*x2))
                .attr("y2", percent(*y2)),
        };
        self.stops()
            .iter()
            .fold(el, |el, stop| el.child(stop.element()))
    }
}

fn percent(v: f32) -> String {
    format!("{v}%")
}

/// Backend-neutral markup node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: &'static str,
    /// Attributes in insertion order
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.set_attr(name, value.to_string());
        self
    }

    pub fn attr_opt<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    pub fn text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Replace an attribute in place, or append it
    pub fn set_attr(&mut self, name: &'static str, value: String) {
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first search for the first element carrying `class`
    pub fn find_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.get_attr("class") == Some(class) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_class_mut(class))
    }
}

/// Capabilities the scene needs from its host drawing surface
pub trait Surface {
    /// Remove all content and size the surface to `bounds`
    fn reset(&mut self, bounds: Bounds);

    /// Add a gradient to the shared definitions
    fn define_gradient(&mut self, gradient: &Gradient);

    /// Register a primitive, returning its handle
    fn add(&mut self, primitive: &Primitive, placement: Placement) -> PrimitiveId;

    /// Move a disc's center
    fn move_to(&mut self, id: PrimitiveId, center: Vec2);

    /// Replace a primitive's fill
    fn set_fill(&mut self, id: PrimitiveId, fill: &Paint);

    /// Recolor the gradient stop carrying `class`
    fn set_stop_color(&mut self, class: &str, color: &str);

    /// Remove a single primitive
    fn remove(&mut self, id: PrimitiveId);

    /// Serialize the surface to SVG markup (without XML prolog)
    fn to_svg_source(&self) -> Result<String, ExportError>;
}
