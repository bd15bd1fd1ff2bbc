// Image storage backed by object_store
pub mod object_store_image_adapter;

pub use object_store_image_adapter::ObjectStoreImageAdapter;
