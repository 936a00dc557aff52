//! Scene description consumed by the renderer.
//!
//! A [`Scene`] is a canvas size plus a tree of [`Element`]s. Every element
//! carries its own local [`Transform`] and [`Style`]; groups nest elements and
//! compose their transform onto their children's.

use crate::color::Color;
use crate::geometry::Point;
use crate::texture::Texture;
use crate::transform::Transform;
use std::sync::Arc;

/// Paint for the fill and stroke passes.
///
/// A channel with alpha exactly `0.0` is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Interior paint. Also the paint of point elements.
    pub fill: Color,
    /// Outline paint. Also the paint of lines and polylines.
    pub stroke: Color,
}

impl Style {
    /// Fill only.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: color,
            stroke: Color::NONE,
        }
    }

    /// Stroke only.
    #[must_use]
    pub const fn stroke(color: Color) -> Self {
        Self {
            fill: Color::NONE,
            stroke: color,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::NONE,
        }
    }
}

/// Geometry of an element, in its local coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single pixel-sized dot.
    Point {
        /// Location.
        position: Point,
    },
    /// A straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Connected segments.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
    /// Axis-aligned rectangle in local space.
    Rect {
        /// Top-left corner.
        position: Point,
        /// Width and height.
        dimension: Point,
    },
    /// Closed outline, filled then stroked.
    Polygon {
        /// Vertices in order.
        points: Vec<Point>,
    },
    /// Parsed but not drawn.
    Ellipse {
        /// Center point.
        center: Point,
        /// Radii along x and y.
        radius: Point,
    },
    /// A texture stretched over a rectangle.
    Image {
        /// Top-left corner.
        position: Point,
        /// Width and height.
        dimension: Point,
        /// Shared texture, read-only during drawing.
        texture: Arc<Texture>,
    },
    /// Child elements drawn under this element's transform.
    Group {
        /// Children in painter's order.
        children: Vec<Element>,
    },
}

/// A drawable node: shape plus local transform and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Local-to-parent transform.
    pub transform: Transform,
    /// Paint.
    pub style: Style,
    /// Geometry.
    pub shape: Shape,
}

impl Element {
    /// Wrap a shape with identity transform and default style.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            transform: Transform::IDENTITY,
            style: Style::default(),
            shape,
        }
    }

    /// A point, painted with the fill color.
    #[must_use]
    pub fn point(position: Point) -> Self {
        Self::new(Shape::Point { position })
    }

    /// A line, painted with the stroke color.
    #[must_use]
    pub fn line(from: Point, to: Point) -> Self {
        Self::new(Shape::Line { from, to }).with_style(Style::stroke(Color::BLACK))
    }

    /// A polyline, painted with the stroke color.
    #[must_use]
    pub fn polyline(points: Vec<Point>) -> Self {
        Self::new(Shape::Polyline { points }).with_style(Style::stroke(Color::BLACK))
    }

    /// A rectangle.
    #[must_use]
    pub fn rect(position: Point, dimension: Point) -> Self {
        Self::new(Shape::Rect {
            position,
            dimension,
        })
    }

    /// A polygon.
    #[must_use]
    pub fn polygon(points: Vec<Point>) -> Self {
        Self::new(Shape::Polygon { points })
    }

    /// An ellipse.
    #[must_use]
    pub fn ellipse(center: Point, radius: Point) -> Self {
        Self::new(Shape::Ellipse { center, radius })
    }

    /// An image.
    #[must_use]
    pub fn image(position: Point, dimension: Point, texture: Arc<Texture>) -> Self {
        Self::new(Shape::Image {
            position,
            dimension,
            texture,
        })
    }

    /// A group of children.
    #[must_use]
    pub fn group(children: Vec<Element>) -> Self {
        Self::new(Shape::Group { children })
    }

    /// Replace the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the fill color.
    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.style.fill = fill;
        self
    }

    /// Replace the stroke color.
    #[must_use]
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.style.stroke = stroke;
        self
    }

    /// Number of elements in this subtree, including itself.
    #[must_use]
    pub fn count(&self) -> usize {
        match &self.shape {
            Shape::Group { children } => 1 + children.iter().map(Self::count).sum::<usize>(),
            _ => 1,
        }
    }
}

/// A canvas and its top-level elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Canvas width in scene units.
    pub width: f32,
    /// Canvas height in scene units.
    pub height: f32,
    /// Top-level elements in painter's order.
    pub elements: Vec<Element>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Append an element (builder style).
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Append an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Total number of elements, counting group members.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(Element::count).sum()
    }
}
