//! Document model: canvas elements, their properties, and sparse updates.
//!
//! This module defines what lives on the canvas (`CanvasElement`, a shared
//! geometry header plus a closed `ElementKind` sum type), the weak
//! arrow-to-element reference (`ArrowBinding`), and the sparse-update type
//! used by every editing command (`ElementPatch`).
//!
//! The serialized form matches the persisted state blob: camelCase field
//! names with the element kind flattened into a `type` tag.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Rect};

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// Anchor position on an element that an arrow endpoint can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorTag {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl AnchorTag {
    /// Absolute document position of this anchor on an unrotated box.
    #[must_use]
    pub fn locate(self, r: &Rect) -> Point {
        let cx = r.x + r.width / 2.0;
        let cy = r.y + r.height / 2.0;
        match self {
            Self::Top => Point::new(cx, r.y),
            Self::Bottom => Point::new(cx, r.bottom()),
            Self::Left => Point::new(r.x, cy),
            Self::Right => Point::new(r.right(), cy),
            Self::Center => Point::new(cx, cy),
            Self::TopLeft => Point::new(r.x, r.y),
            Self::TopRight => Point::new(r.right(), r.y),
            Self::BottomLeft => Point::new(r.x, r.bottom()),
            Self::BottomRight => Point::new(r.right(), r.bottom()),
        }
    }
}

/// Weak reference from an arrow endpoint to an anchor on another element.
///
/// Resolved by id lookup at use time; the target may no longer exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowBinding {
    pub element_id: ElementId,
    pub position: AnchorTag,
}

/// Font and decoration settings for element text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".into(),
            font_size: 16.0,
            color: "#000000".into(),
            background_color: None,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }
}

/// Sparse text style update; merged field by field into an existing style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStylePatch {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub background_color: Option<Option<String>>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
}

impl TextStyle {
    /// Shallow-merge `patch` into this style. Absent fields are kept.
    pub fn merge(&mut self, patch: &TextStylePatch) {
        if let Some(v) = &patch.font_family {
            self.font_family.clone_from(v);
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = &patch.color {
            self.color.clone_from(v);
        }
        if let Some(v) = &patch.background_color {
            self.background_color.clone_from(v);
        }
        if let Some(v) = patch.bold {
            self.bold = v;
        }
        if let Some(v) = patch.italic {
            self.italic = v;
        }
        if let Some(v) = patch.underline {
            self.underline = v;
        }
        if let Some(v) = patch.strikethrough {
            self.strikethrough = v;
        }
    }
}

/// Properties shared by the closed shapes (rectangle, circle, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProps {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            background_color: "#3B82F6".into(),
            border_color: "#1E40AF".into(),
            border_width: 2.0,
            corner_radius: None,
            content: None,
            text_style: None,
        }
    }
}

/// Arrow connector properties.
///
/// `arrow_start` / `arrow_end` are relative to the owning element's `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowProps {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub arrow_start: Point,
    pub arrow_end: Point,
    pub arrow_head_size: f64,
    pub arrow_tail_width: f64,
    /// Bend amount in `[-1, 1]`; zero is a straight line.
    #[serde(default)]
    pub arrow_curve: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<ArrowBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<ArrowBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl Default for ArrowProps {
    fn default() -> Self {
        Self {
            background_color: "#3B82F6".into(),
            border_color: "#1E40AF".into(),
            border_width: 2.0,
            arrow_start: Point::new(0.0, 0.0),
            arrow_end: Point::new(0.0, 0.0),
            arrow_head_size: 15.0,
            arrow_tail_width: 2.0,
            arrow_curve: 0.0,
            start_binding: None,
            end_binding: None,
            content: None,
            text_style: None,
        }
    }
}

/// Filter applied to an image element by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Blur,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    #[serde(default)]
    pub filter: ImageFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub content: String,
    pub style: TextStyle,
}

/// Group children. Child `x` / `y` are relative to the group's own `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProps {
    pub children: Vec<CanvasElement>,
}

/// Per-kind element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ElementKind {
    Rectangle(ShapeProps),
    RoundedRectangle(ShapeProps),
    Circle(ShapeProps),
    Triangle(ShapeProps),
    Arrow(ArrowProps),
    Image(ImageProps),
    Text(TextProps),
    Group(GroupProps),
}

/// A canvas element as stored in the document and in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Left edge of the unrotated bounding box.
    pub x: f64,
    /// Top edge of the unrotated bounding box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the box center, in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; dense `0..n-1` after any reorder.
    #[serde(default)]
    pub z_index: i64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    /// Create an element with a fresh id at the given box.
    #[must_use]
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { id: Uuid::new_v4(), x, y, width, height, rotation: 0.0, z_index: 0, kind }
    }

    /// Unrotated bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    #[must_use]
    pub fn is_arrow(&self) -> bool {
        matches!(self.kind, ElementKind::Arrow(_))
    }

    #[must_use]
    pub fn arrow(&self) -> Option<&ArrowProps> {
        match &self.kind {
            ElementKind::Arrow(a) => Some(a),
            _ => None,
        }
    }

    pub fn arrow_mut(&mut self) -> Option<&mut ArrowProps> {
        match &mut self.kind {
            ElementKind::Arrow(a) => Some(a),
            _ => None,
        }
    }

    /// Absolute document positions of an arrow's endpoints.
    #[must_use]
    pub fn arrow_endpoints(&self) -> Option<(Point, Point)> {
        self.arrow().map(|a| {
            (
                Point::new(self.x + a.arrow_start.x, self.y + a.arrow_start.y),
                Point::new(self.x + a.arrow_end.x, self.y + a.arrow_end.y),
            )
        })
    }

    /// Apply a sparse update in place.
    ///
    /// Arrows whose box changes without a new endpoint keep their endpoints
    /// visually attached by rescaling the relative points; a zero old
    /// dimension scales by 1. Text styles merge rather than replace.
    pub fn apply(&mut self, patch: &ElementPatch) {
        let old_w = self.width;
        let old_h = self.height;
        if let Some(v) = patch.x {
            self.x = v;
        }
        if let Some(v) = patch.y {
            self.y = v;
        }
        if let Some(v) = patch.width {
            self.width = v.max(0.0);
        }
        if let Some(v) = patch.height {
            self.height = v.max(0.0);
        }
        if let Some(v) = patch.rotation {
            self.rotation = crate::camera::normalize_degrees(v);
        }
        if let Some(v) = patch.z_index {
            self.z_index = v;
        }

        let scale_x = if patch.width.is_some() && old_w != 0.0 { self.width / old_w } else { 1.0 };
        let scale_y = if patch.height.is_some() && old_h != 0.0 { self.height / old_h } else { 1.0 };

        match &mut self.kind {
            ElementKind::Arrow(a) => {
                a.arrow_start = patch
                    .arrow_start
                    .unwrap_or(Point::new(a.arrow_start.x * scale_x, a.arrow_start.y * scale_y));
                a.arrow_end = patch
                    .arrow_end
                    .unwrap_or(Point::new(a.arrow_end.x * scale_x, a.arrow_end.y * scale_y));
                if let Some(b) = patch.start_binding {
                    a.start_binding = b;
                }
                if let Some(b) = patch.end_binding {
                    a.end_binding = b;
                }
                if let Some(c) = patch.arrow_curve {
                    a.arrow_curve = c.clamp(-1.0, 1.0);
                }
                apply_paint(&mut a.background_color, &mut a.border_color, &mut a.border_width, patch);
                apply_label(&mut a.content, &mut a.text_style, patch);
            }
            ElementKind::Rectangle(s)
            | ElementKind::RoundedRectangle(s)
            | ElementKind::Circle(s)
            | ElementKind::Triangle(s) => {
                apply_paint(&mut s.background_color, &mut s.border_color, &mut s.border_width, patch);
                if let Some(r) = patch.corner_radius {
                    s.corner_radius = Some(r);
                }
                apply_label(&mut s.content, &mut s.text_style, patch);
            }
            ElementKind::Text(t) => {
                if let Some(c) = &patch.content {
                    t.content.clone_from(c);
                }
                if let Some(style) = &patch.text_style {
                    t.style.merge(style);
                }
            }
            ElementKind::Image(i) => {
                if let Some(f) = patch.image_filter {
                    i.filter = f;
                }
            }
            ElementKind::Group(_) => {}
        }
    }
}

fn apply_paint(bg: &mut String, border: &mut String, border_width: &mut f64, patch: &ElementPatch) {
    if let Some(v) = &patch.background_color {
        bg.clone_from(v);
    }
    if let Some(v) = &patch.border_color {
        border.clone_from(v);
    }
    if let Some(v) = patch.border_width {
        *border_width = v;
    }
}

fn apply_label(content: &mut Option<String>, style: &mut Option<TextStyle>, patch: &ElementPatch) {
    if let Some(c) = &patch.content {
        *content = Some(c.clone());
    }
    if let Some(p) = &patch.text_style {
        style.get_or_insert_with(TextStyle::default).merge(p);
    }
}

/// Sparse update for a canvas element. Only present fields are applied.
///
/// Binding fields are doubly optional: `Some(None)` clears a binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i64>,
    pub arrow_start: Option<Point>,
    pub arrow_end: Option<Point>,
    pub arrow_curve: Option<f64>,
    pub start_binding: Option<Option<ArrowBinding>>,
    pub end_binding: Option<Option<ArrowBinding>>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub corner_radius: Option<f64>,
    pub content: Option<String>,
    pub text_style: Option<TextStylePatch>,
    pub image_filter: Option<ImageFilter>,
}

impl ElementPatch {
    /// Patch that moves an element's top-left corner.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Patch that replaces an element's whole box.
    #[must_use]
    pub fn bounds(r: Rect) -> Self {
        Self { x: Some(r.x), y: Some(r.y), width: Some(r.width), height: Some(r.height), ..Self::default() }
    }

    /// Overlay `other` on top of `self`; fields present in `other` win.
    pub fn merge(&mut self, other: ElementPatch) {
        macro_rules! take {
            ($($f:ident),*) => { $( if other.$f.is_some() { self.$f = other.$f; } )* };
        }
        take!(
            x, y, width, height, rotation, z_index, arrow_start, arrow_end, arrow_curve, start_binding, end_binding,
            background_color, border_color, border_width, corner_radius, content, text_style, image_filter
        );
    }
}
