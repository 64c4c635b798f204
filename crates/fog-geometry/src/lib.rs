pub mod boolean;
pub mod contour;
pub mod intersect;
pub mod measure;
pub mod path;
pub mod sample;
pub mod stroke;
pub mod visibility;

pub use boolean::{BoolOp, Ring, flatten_rings, ring_op};
pub use contour::{
    DoorOverlay, Polyline, door_overlay, door_path, drawing_to_contours, item_affine,
    path_to_polylines, polylines_to_world,
};
pub use intersect::{
    PathIntersection, ScanParams, commands_between, path_between, path_intersection,
    path_intersection_on, path_point,
};
pub use measure::{ContourMeasure, contours};
pub use path::{commands_to_path, drawing_to_path, path_to_commands};
pub use visibility::{
    Segment, compute_viewport, light_polygon, line_of_sight, polygon_contains,
    segments_from_polylines,
};

pub use kurbo::BezPath;
