//! Drawing seam between the mark layout and an actual vector format.

use svg::node::element::{Definitions, Mask, Path, Rectangle, Use};
use svg::Document;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl ViewBox {
    pub fn attribute(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// The primitives the renderer needs: a filled background, reusable path
/// definitions, luminance masks made of a rect plus a reused shape, and masked
/// uses of a defined path.
pub trait VectorCanvas {
    type Output;

    fn background(&mut self, area: ViewBox, fill: &str);
    fn define_path(&mut self, id: &str, d: &str, transform: Option<&str>);
    fn define_mask(&mut self, id: &str, size: usize, background: &str, shape_id: &str, shape_fill: &str);
    fn overlay(&mut self, shape_id: &str, fill: &str, mask_id: &str);
    fn finish(self) -> Self::Output;
}

/// `svg`-crate backed canvas producing a standalone document.
pub struct SvgCanvas {
    view_box: ViewBox,
    width_px: u32,
    height_px: u32,
    background: Option<Rectangle>,
    paths: Vec<Path>,
    masks: Vec<Mask>,
    layers: Vec<Use>,
}

impl SvgCanvas {
    pub fn new(view_box: ViewBox, width_px: u32, height_px: u32) -> Self {
        Self {
            view_box,
            width_px,
            height_px,
            background: None,
            paths: Vec::new(),
            masks: Vec::new(),
            layers: Vec::new(),
        }
    }
}

fn reference(id: &str) -> String {
    format!("#{}", id)
}

impl VectorCanvas for SvgCanvas {
    type Output = Document;

    fn background(&mut self, area: ViewBox, fill: &str) {
        self.background = Some(
            Rectangle::new()
                .set("x", area.x)
                .set("y", area.y)
                .set("width", area.width)
                .set("height", area.height)
                .set("fill", fill),
        );
    }

    fn define_path(&mut self, id: &str, d: &str, transform: Option<&str>) {
        let mut path = Path::new().set("id", id).set("d", d);
        if let Some(transform) = transform {
            path = path.set("transform", transform);
        }
        self.paths.push(path);
    }

    fn define_mask(&mut self, id: &str, size: usize, background: &str, shape_id: &str, shape_fill: &str) {
        let mask = Mask::new()
            .set("id", id)
            .add(
                Rectangle::new()
                    .set("width", size)
                    .set("height", size)
                    .set("fill", background),
            )
            .add(
                Use::new()
                    .set("xlink:href", reference(shape_id))
                    .set("fill", shape_fill)
                    .set("stroke", shape_fill)
                    .set("stroke-width", 0),
            );
        self.masks.push(mask);
    }

    fn overlay(&mut self, shape_id: &str, fill: &str, mask_id: &str) {
        self.layers.push(
            Use::new()
                .set("xlink:href", reference(shape_id))
                .set("fill", fill)
                .set("mask", format!("url(#{})", mask_id)),
        );
    }

    fn finish(self) -> Document {
        let mut defs = Definitions::new();
        for path in self.paths {
            defs = defs.add(path);
        }
        for mask in self.masks {
            defs = defs.add(mask);
        }

        let mut document = Document::new()
            .set("xmlns:xlink", XLINK_NS)
            .set("viewBox", self.view_box.attribute())
            .set("width", self.width_px)
            .set("height", self.height_px);
        if let Some(background) = self.background {
            document = document.add(background);
        }
        document = document.add(defs);
        for layer in self.layers {
            document = document.add(layer);
        }
        document
    }
}
