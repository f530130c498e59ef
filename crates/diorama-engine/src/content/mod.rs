//! Content synchronization.
//!
//! The application hands over a full list of placed objects on every change.
//! `ContentSync` tears down the previous content group, builds placeholders,
//! and swaps in real assets as the loader resolves them.

mod asset;
mod file_loader;
mod sync;

pub use asset::{AssetCompletion, AssetLoader, AssetRequest, AssetSink, AssetTicket, ResolvedAsset};
pub use file_loader::FileAssetLoader;
pub use sync::{ContentSync, SyncReport};
