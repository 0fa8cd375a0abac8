//! Element model: design elements, their properties, and sparse updates.
//!
//! An [`Element`] carries typed geometry and structural fields (grouping,
//! anchoring, template binding) plus an open-ended style bag (`props`) for the
//! type-specific payloads: font and colour for text, source and filters for
//! images, fill and stroke for shapes. [`Props`] gives typed read access to the
//! keys the engine itself consults.
//!
//! On the wire an element is one flat camelCase JSON object; every key the
//! typed fields do not claim lands in `props`, so style payloads survive a
//! round trip untouched.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::consts::DEFAULT_FONT_SIZE;
use crate::geometry::Rect;
use crate::shapes::ShapeKind;

/// Unique identifier for an element. Opaque and stable for the element's lifetime.
pub type ElementId = String;

/// The kind of a design element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A run of styled text.
    Text,
    /// A raster image, optionally masked by a shape.
    Image,
    /// A filled/stroked geometric shape.
    Shape,
    /// A vector icon from the icon set.
    Icon,
    /// A container whose `children` are member element ids.
    Group,
}

impl ElementKind {
    /// Whether this kind keeps its aspect ratio when a platform variant relayouts it.
    #[must_use]
    pub fn keeps_aspect(self) -> bool {
        matches!(self, Self::Image | Self::Shape | Self::Icon)
    }
}

/// Corner or edge an element is pinned to relative to another element.
///
/// Anchors are free-form strings on the wire; unrecognised values are kept as
/// [`Anchor::Other`] and never move anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Anchor {
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Other(String),
}

impl Anchor {
    /// Anchors whose name contains "bottom": the element sits below its leader.
    #[must_use]
    pub fn below(&self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Anchors whose name contains "top": the element sits above its leader.
    #[must_use]
    pub fn above(&self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Anchor {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            _ => Self::Other(raw),
        }
    }
}

impl From<Anchor> for String {
    fn from(anchor: Anchor) -> Self {
        anchor.as_str().to_owned()
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

fn default_extent() -> f64 {
    10.0
}

/// A design element as stored in the document and in persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Element type tag.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Left edge, percent of frame width.
    #[serde(default)]
    pub x: f64,
    /// Top edge, percent of frame height.
    #[serde(default)]
    pub y: f64,
    /// Width, percent of frame width.
    #[serde(default = "default_extent")]
    pub width: f64,
    /// Height, percent of frame height.
    #[serde(default = "default_extent")]
    pub height: f64,
    /// Clockwise rotation in degrees, always in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Locked elements ignore move/resize/rotate gestures.
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Parent group, if this element is a group member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<ElementId>,
    /// Member ids, in order. Only non-empty on groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementId>,
    /// Marks the element as a template data slot.
    #[serde(default)]
    pub is_bindable: bool,
    /// Binding metadata owned by the template layer. Preserved, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    /// Leader element whose box this element's position follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<ElementId>,
    /// Shrink the font until the text fits the box width (text only).
    #[serde(default)]
    pub auto_scale: bool,
    /// Type-specific style payload.
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl Element {
    /// Default element of the given kind, with an empty id.
    ///
    /// The store assigns the id and merges the caller's fields on top.
    #[must_use]
    pub fn skeleton(kind: ElementKind) -> Self {
        let (width, height, props) = match kind {
            ElementKind::Text => (
                60.0,
                10.0,
                props_from([
                    ("text", Value::from("Text")),
                    ("fontSize", Value::from(DEFAULT_FONT_SIZE)),
                    ("fontFamily", Value::from("Inter")),
                    ("color", Value::from("#111111")),
                ]),
            ),
            ElementKind::Image => (40.0, 40.0, Map::new()),
            ElementKind::Shape => (
                30.0,
                30.0,
                props_from([
                    ("shapeType", Value::from(ShapeKind::Rectangle.tag())),
                    ("fill", Value::from("#4F46E5")),
                ]),
            ),
            ElementKind::Icon => (
                15.0,
                15.0,
                props_from([("iconName", Value::from("star")), ("color", Value::from("#111111"))]),
            ),
            ElementKind::Group => (default_extent(), default_extent(), Map::new()),
        };
        Self {
            id: ElementId::new(),
            kind,
            x: 20.0,
            y: 20.0,
            width,
            height,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            opacity: 1.0,
            locked: false,
            visible: true,
            group_id: None,
            children: Vec::new(),
            is_bindable: false,
            bind_config: None,
            anchor: None,
            relative_to: None,
            auto_scale: false,
            props,
        }
    }

    /// Axis-aligned bounding box, ignoring rotation.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Overwrite position and size from a box.
    pub fn set_bounds(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == ElementKind::Group
    }

    /// Typed view over the style bag.
    #[must_use]
    pub fn style(&self) -> Props<'_> {
        Props::new(&self.props)
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.props.insert("fontSize".into(), Value::from(size));
    }

    /// Shallow-merge a patch. Fields absent from the patch are left untouched.
    ///
    /// No clamping happens here; the store normalizes geometry afterwards.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(flip) = patch.flip_x {
            self.flip_x = flip;
        }
        if let Some(flip) = patch.flip_y {
            self.flip_y = flip;
        }
        if let Some(o) = patch.opacity {
            self.opacity = o;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(bindable) = patch.is_bindable {
            self.is_bindable = bindable;
        }
        if let Some(ref config) = patch.bind_config {
            self.bind_config = if config.is_null() { None } else { Some(config.clone()) };
        }
        if let Some(ref anchor) = patch.anchor {
            self.anchor.clone_from(anchor);
        }
        if let Some(ref leader) = patch.relative_to {
            self.relative_to.clone_from(leader);
        }
        if let Some(auto) = patch.auto_scale {
            self.auto_scale = auto;
        }
        if let Some(ref props) = patch.props {
            for (k, v) in props {
                if v.is_null() {
                    self.props.remove(k);
                } else {
                    self.props.insert(k.clone(), v.clone());
                }
            }
        }
    }
}

fn props_from<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Sparse update for an element. Only present fields are applied.
///
/// `groupId` and `children` are deliberately absent: grouping bookkeeping is
/// only ever changed by the store's group/ungroup/delete operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bindable: Option<bool>,
    /// New binding metadata; `null` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_config: Option<Value>,
    /// `Some(None)` clears the anchor.
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Option<Anchor>>,
    /// `Some(None)` detaches the element from its leader.
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<Option<ElementId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<bool>,
    /// Style keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Patch that sets a full box.
    #[must_use]
    pub fn bounds(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    /// Patch that merges a single style key.
    #[must_use]
    pub fn prop(key: &str, value: impl Into<Value>) -> Self {
        let mut props = Map::new();
        props.insert(key.to_owned(), value.into());
        Self { props: Some(props), ..Self::default() }
    }

    /// Whether the patch changes anything the text-fit estimate depends on.
    #[must_use]
    pub fn touches_text_fit(&self) -> bool {
        self.width.is_some()
            || self.auto_scale == Some(true)
            || self
                .props
                .as_ref()
                .is_some_and(|p| p.contains_key("text") || p.contains_key("fontSize"))
    }

    /// Whether the patch changes the element's box.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }
}

/// Typed access to common style fields from an element's `props` bag.
pub struct Props<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.map.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Text content. Empty when absent.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.str_or("text", "")
    }

    /// Font size in pixels. Defaults to [`DEFAULT_FONT_SIZE`] when absent.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.map
            .get("fontSize")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    #[must_use]
    pub fn font_family(&self) -> &'a str {
        self.str_or("fontFamily", "Inter")
    }

    /// Text or icon colour. Defaults to near-black.
    #[must_use]
    pub fn color(&self) -> &'a str {
        self.str_or("color", "#111111")
    }

    /// Shape fill colour. Defaults to `"#4F46E5"`.
    #[must_use]
    pub fn fill(&self) -> &'a str {
        self.str_or("fill", "#4F46E5")
    }

    /// Stroke colour, if the element has one.
    #[must_use]
    pub fn stroke(&self) -> Option<&'a str> {
        self.map.get("stroke").and_then(Value::as_str)
    }

    /// Stroke width in pixels. `0.0` when absent.
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.map
            .get("strokeWidth")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Shape outline. Unknown or missing tags read as a rectangle.
    #[must_use]
    pub fn shape_kind(&self) -> ShapeKind {
        self.map
            .get("shapeType")
            .and_then(Value::as_str)
            .and_then(ShapeKind::from_tag)
            .unwrap_or(ShapeKind::Rectangle)
    }

    /// Point count for star/burst shapes, if set.
    #[must_use]
    pub fn points(&self) -> Option<u32> {
        self.map
            .get("points")
            .and_then(Value::as_u64)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
    }

    /// Mask outline applied to an image, if any.
    #[must_use]
    pub fn mask(&self) -> Option<ShapeKind> {
        self.map
            .get("mask")
            .and_then(Value::as_str)
            .and_then(ShapeKind::from_tag)
    }

    /// Image source URL.
    #[must_use]
    pub fn src(&self) -> Option<&'a str> {
        self.map.get("src").and_then(Value::as_str)
    }

    #[must_use]
    pub fn icon_name(&self) -> Option<&'a str> {
        self.map.get("iconName").and_then(Value::as_str)
    }
}
