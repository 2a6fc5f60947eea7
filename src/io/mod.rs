pub mod stream;

pub use stream::{
    FeaturesToGeoJson, to_feature_collection, write_feature_collection, write_features,
};
