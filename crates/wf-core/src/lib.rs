pub mod catalog;
pub mod document;
pub mod geometry;
pub mod handles;
pub mod id;
pub mod model;

pub use catalog::{Catalog, NodeTemplate};
pub use document::Document;
pub use geometry::{CanvasTransform, Point, Rect, Size, Viewport};
pub use handles::{HandleClass, HandleDirection, HandleRegistry, HandleSpec};
pub use id::NodeId;
pub use model::*;
