//! Ticket output service
//!
//! Best effort: a failed write is reported to the caller and logged, the order
//! it belongs to stays committed.

use super::renderer::TicketRenderer;
use super::types::{TicketData, TicketStyle};
use chrono_tz::Tz;
use comanda_printer::{FilePrinter, PrintError, PrintJob, Printer};
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;
use std::path::{Path, PathBuf};

fn print_failed(err: PrintError) -> AppError {
    AppError::with_message(ErrorCode::PrintFailed, format!("Ticket output failed: {err}"))
}

#[derive(Clone)]
pub struct TicketService {
    printer: FilePrinter,
    width: usize,
    timezone: Tz,
}

impl TicketService {
    pub fn new(tickets_dir: impl Into<PathBuf>, width: usize, timezone: Tz) -> Self {
        Self {
            printer: FilePrinter::new(tickets_dir),
            width,
            timezone,
        }
    }

    pub fn tickets_dir(&self) -> &Path {
        self.printer.dir()
    }

    pub async fn is_online(&self) -> bool {
        self.printer.is_online().await
    }

    /// Render and write one ticket, returning the file path
    pub async fn print(&self, data: &TicketData, style: TicketStyle) -> Result<PathBuf, AppError> {
        let content = TicketRenderer::new(self.width, self.timezone).render(data, style);
        let name = ticket_file_name(&data.order_number, now_millis(), self.timezone);

        match self.printer.print(&PrintJob::new(name, content)).await {
            Ok(path) => {
                tracing::info!(
                    order_number = %data.order_number,
                    path = %path.display(),
                    "Ticket generated"
                );
                Ok(path)
            }
            Err(e) => {
                tracing::error!(
                    order_number = %data.order_number,
                    dir = %self.printer.dir().display(),
                    error = %e,
                    "Ticket generation failed"
                );
                Err(print_failed(e))
            }
        }
    }
}

/// `ticket_<order_number>_<YYYYMMDD_HHMMSS>.txt`
pub fn ticket_file_name(order_number: &str, at: i64, tz: Tz) -> String {
    let stamp = crate::utils::time::format_millis(at, tz, "%Y%m%d_%H%M%S");
    format!("ticket_{order_number}_{stamp}.txt")
}
