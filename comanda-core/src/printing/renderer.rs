//! Order ticket renderer
//!
//! Renders [`TicketData`] as fixed-width text. The upper part goes to the
//! kitchen/counter, the optional stub below the cut line goes to the customer.

use super::types::{TicketData, TicketStyle};
use chrono_tz::Tz;
use comanda_printer::TicketTextBuilder;

pub struct TicketRenderer {
    width: usize,
    timezone: Tz,
}

impl TicketRenderer {
    /// Common widths: 32 (58mm paper), 48 (80mm paper)
    pub fn new(width: usize, timezone: Tz) -> Self {
        Self { width, timezone }
    }

    pub fn render(&self, data: &TicketData, style: TicketStyle) -> String {
        let mut b = TicketTextBuilder::new(self.width);

        self.render_header(&mut b, data);
        self.render_items(&mut b, data);
        self.render_observations(&mut b, data);
        self.render_totals(&mut b, data);

        if style == TicketStyle::WithCustomerStub {
            self.render_stub(&mut b, data);
        }

        b.finalize()
    }

    fn render_header(&self, b: &mut TicketTextBuilder, data: &TicketData) {
        b.text_center(&data.business_name.to_uppercase());
        b.blank_line();
        b.text_center(&format!("TABLE: {}", table_label(data)));
        b.text_center(&format!("ORDER No. {}", data.pickup_number()));
        b.text_center(&data.order_number);
        b.blank_line();
        b.text_center(&format!(
            "Date: {}",
            format_timestamp(data.created_at, self.timezone, "%d/%m/%Y %H:%M")
        ));
        b.text_center(&format!("Server: {}", data.server_name));
        b.eq_sep();
    }

    fn render_items(&self, b: &mut TicketTextBuilder, data: &TicketData) {
        for item in &data.items {
            b.line_lr(
                &format!("{}x {}", item.quantity, item.name),
                &data.format_amount(item.subtotal),
            );
            if let Some(note) = &item.note {
                b.write_line(&format!("    * {}", note.trim()));
            }
        }
    }

    fn render_observations(&self, b: &mut TicketTextBuilder, data: &TicketData) {
        let Some(observations) = data.observations.as_deref() else {
            return;
        };
        let lines: Vec<&str> = observations
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return;
        }

        b.blank_line();
        b.write_line("OBSERVATIONS:");
        for line in lines {
            b.write_line(&format!("* {line}"));
        }
    }

    fn render_totals(&self, b: &mut TicketTextBuilder, data: &TicketData) {
        b.dash_sep();
        b.text_center(&format!("TOTAL: {}", data.format_amount(data.total)));
        b.text_center(&format!("Total items: {}", data.item_count()));
    }

    fn render_stub(&self, b: &mut TicketTextBuilder, data: &TicketData) {
        b.blank_line();
        b.cut_line("CUT HERE");
        b.blank_line();
        b.text_center(&data.business_name.to_uppercase());
        b.blank_line();
        b.text_large(data.pickup_number());
        b.blank_line();
        b.text_center("PICK UP YOUR ORDER");
        b.text_center("Present this ticket");
        b.blank_line();
        b.text_center(&format!("Table: {}", table_label(data)));
        b.text_center(&format!(
            "Time: {}",
            format_timestamp(data.created_at, self.timezone, "%H:%M")
        ));
    }
}

fn table_label(data: &TicketData) -> &str {
    data.table_name.as_deref().unwrap_or("No table")
}

fn format_timestamp(ts: i64, tz: Tz, fmt: &str) -> String {
    if chrono::DateTime::from_timestamp_millis(ts).is_some() {
        crate::utils::time::format_millis(ts, tz, fmt)
    } else {
        "unknown time".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::types::TicketLine;

    fn create_test_ticket() -> TicketData {
        TicketData {
            business_name: "Casa Pepe".to_string(),
            currency: "$".to_string(),
            table_name: Some("Terrace 1".to_string()),
            order_number: "ORD-20240122-07".to_string(),
            created_at: 1705933935000, // 2024-01-22 14:32:15 UTC (millis)
            server_name: "Ana".to_string(),
            items: vec![
                TicketLine {
                    quantity: 2,
                    name: "Burger".to_string(),
                    subtotal: 2000.0,
                    note: Some("no onion".to_string()),
                },
                TicketLine {
                    quantity: 1,
                    name: "Soda".to_string(),
                    subtotal: 500.0,
                    note: None,
                },
            ],
            observations: Some("Birthday\n\n  candles please ".to_string()),
            total: 2500.0,
        }
    }

    #[test]
    fn test_render_standard() {
        let renderer = TicketRenderer::new(32, chrono_tz::Europe::Madrid);
        let output = renderer.render(&create_test_ticket(), TicketStyle::Standard);

        assert!(output.contains("CASA PEPE"));
        assert!(output.contains("TABLE: Terrace 1"));
        assert!(output.contains("ORDER No. 07"));
        assert!(output.contains("Date: 22/01/2024 15:32"));
        assert!(output.contains("Server: Ana"));
        assert!(output.contains("2x Burger"));
        assert!(output.contains("$2000.00"));
        assert!(output.contains("    * no onion"));
        assert!(output.contains("OBSERVATIONS:"));
        assert!(output.contains("* candles please"));
        assert!(output.contains("TOTAL: $2500.00"));
        assert!(output.contains("Total items: 3"));
        assert!(!output.contains("CUT HERE"));
    }

    #[test]
    fn test_render_with_stub() {
        let renderer = TicketRenderer::new(32, chrono_tz::Europe::Madrid);
        let mut ticket = create_test_ticket();
        ticket.table_name = None;
        ticket.observations = None;
        let output = renderer.render(&ticket, TicketStyle::WithCustomerStub);

        assert!(output.contains("TABLE: No table"));
        assert!(!output.contains("OBSERVATIONS:"));
        assert!(output.contains("CUT HERE"));
        assert!(output.contains("[ 0 7 ]"));
        assert!(output.contains("PICK UP YOUR ORDER"));
        assert!(output.contains("Time: 15:32"));

        // Stub comes after the totals
        let total_pos = output.find("TOTAL:").unwrap();
        let cut_pos = output.find("CUT HERE").unwrap();
        assert!(cut_pos > total_pos);
    }
}
