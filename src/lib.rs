pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod favorites;
pub mod logging;
pub mod models;
pub mod network;
pub mod repository;

pub use config::AppConfig;
pub use controller::{FetchState, PropertyListController};
pub use error::{FavoritesError, LoadError, NetworkError};
pub use favorites::FavoritesStore;
pub use models::{Property, PropertyFilter, SortOrder};
pub use repository::{LocalPropertyRepository, PropertyRepository, RemotePropertyRepository};
