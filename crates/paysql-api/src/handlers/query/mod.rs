mod shared;

pub use shared::query_shared;
