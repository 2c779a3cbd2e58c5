pub mod builder;
pub mod types;

pub use builder::CollectionBuilder;
pub use types::{
    Collection, CollectionNode, Folder, Header, Info, RequestItem, RequestSpec, RequestUrl,
    SCHEMA_V2_1_0, Variable,
};
