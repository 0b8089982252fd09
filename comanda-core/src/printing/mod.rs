//! Order ticket printing
//!
//! Renders a submitted order as a text ticket and writes it to
//! `<work_dir>/tickets/`.

pub mod renderer;
pub mod service;
pub mod types;

pub use renderer::TicketRenderer;
pub use service::{TicketService, ticket_file_name};
pub use types::*;
