//! # comanda-printer
//!
//! Ticket output library - low-level document capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW a ticket is produced:
//! - Fixed-width text layout (centering, left/right pairs, separators)
//! - Writing finished documents to a ticket directory
//!
//! Business logic (WHAT goes on a ticket) stays in `comanda-core`.
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{FilePrinter, PrintJob, Printer, TicketTextBuilder};
//!
//! let mut b = TicketTextBuilder::new(40);
//! b.text_center("RESTAURANT");
//! b.eq_sep();
//! b.line_lr("2 x Paella", "$25.00");
//!
//! let printer = FilePrinter::new("./work_dir/tickets");
//! let path = printer.print(&PrintJob::new("ticket_ORD-20240101-01.txt", b.finalize())).await?;
//! ```

mod error;
mod layout;
mod printer;
mod text;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use layout::{pad_text, text_width, truncate_text};
pub use printer::{FilePrinter, PrintJob, Printer};
pub use text::TicketTextBuilder;
