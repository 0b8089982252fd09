//! Administrative services (menu, staff)
//!
//! Every mutation requires the administrator role; see [`crate::auth::permissions`].

pub mod catalog_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use user_service::UserService;
