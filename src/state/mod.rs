pub mod store;

pub use store::{ReplayStore, StoreSnapshot};
