mod ring;

pub use ring::{geographic_polygon, plane_ring};
