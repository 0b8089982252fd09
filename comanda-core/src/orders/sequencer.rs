//! Order number sequencer
//!
//! Order numbers look like `ORD-20240115-07`: the business date plus a two-digit
//! counter that starts again every day. The counter lives in 1..=99.
//!
//! Known limitation: the next number is always `max + 1` over today's numbers,
//! and once `99` exists the max stays at 99. Every order after the 99th of a
//! day is therefore `01`; numbers do not cycle through 01..=99 again.
//!
//! Rows whose suffix cannot be parsed are skipped, logged and mark the result
//! as degraded.

use crate::db::repository::{RepoResult, order as order_repo};
use chrono::{NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use sqlx::SqliteConnection;

pub const ORDER_NUMBER_PREFIX: &str = "ORD";

const SEQUENCE_MODULO: u32 = 100;

/// Next order number for a business date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketNumber {
    /// Full identifier, `ORD-YYYYMMDD-NN`
    pub order_number: String,
    pub sequence: u32,
    /// Today's numbers could not be read (clock-derived sequence) or some of
    /// them were unparsable
    pub degraded: bool,
}

/// `ORD-YYYYMMDD-`
pub fn day_prefix(date: NaiveDate) -> String {
    format!("{ORDER_NUMBER_PREFIX}-{}-", date.format("%Y%m%d"))
}

pub fn format_order_number(date: NaiveDate, sequence: u32) -> String {
    format!("{}{sequence:02}", day_prefix(date))
}

/// Trailing numeric suffix of an order number
pub fn parse_sequence(order_number: &str) -> Option<u32> {
    order_number.rsplit('-').next()?.parse().ok()
}

/// `(max + 1) mod 100`, with 0 mapped to 1
pub fn next_after(max: u32) -> u32 {
    match (max + 1) % SEQUENCE_MODULO {
        0 => 1,
        n => n,
    }
}

/// Clock-derived sequence used when the store cannot be read
pub fn fallback_sequence(seconds_of_minute: u32) -> u32 {
    match seconds_of_minute % 60 {
        0 => 1,
        n => n,
    }
}

/// Highest sequence among today's numbers
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SequenceScan<'a> {
    pub max: u32,
    /// Numbers whose suffix is not numeric
    pub unparsable: Vec<&'a str>,
}

pub fn max_sequence<'a>(numbers: impl IntoIterator<Item = &'a str>) -> SequenceScan<'a> {
    let mut scan = SequenceScan::default();
    for number in numbers {
        match parse_sequence(number) {
            Some(sequence) => scan.max = scan.max.max(sequence),
            None => scan.unparsable.push(number),
        }
    }
    scan
}

/// Read today's numbers inside the caller's transaction and pick the next one
///
/// Never fails: a read error degrades to a clock-derived number.
pub async fn next_number(conn: &mut SqliteConnection, tz: Tz) -> TicketNumber {
    let date = crate::utils::time::today(tz);
    let result: RepoResult<Vec<String>> =
        order_repo::find_numbers_with_prefix(&mut *conn, &day_prefix(date)).await;

    match result {
        Ok(numbers) => {
            let scan = max_sequence(numbers.iter().map(String::as_str));
            for bad in &scan.unparsable {
                tracing::warn!(order_number = %bad, "Skipping order number with unparsable sequence");
            }
            let sequence = next_after(scan.max);
            TicketNumber {
                order_number: format_order_number(date, sequence),
                sequence,
                degraded: !scan.unparsable.is_empty(),
            }
        }
        Err(e) => {
            let sequence = fallback_sequence(Utc::now().second());
            tracing::warn!(
                error = %e,
                sequence,
                "Failed to read today's order numbers, using clock-derived sequence"
            );
            TicketNumber {
                order_number: format_order_number(date, sequence),
                sequence,
                degraded: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::order::{NewOrder, insert};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_order_number(date(), 7), "ORD-20240115-07");
        assert_eq!(parse_sequence("ORD-20240115-07"), Some(7));
        assert_eq!(parse_sequence("ORD-20240115-xx"), None);
    }

    #[test]
    fn test_next_wraps_within_1_to_99() {
        assert_eq!(next_after(0), 1);
        assert_eq!(next_after(1), 2);
        assert_eq!(next_after(98), 99);
        assert_eq!(next_after(99), 1);
    }

    #[test]
    fn test_max_ignores_garbage() {
        let numbers = ["ORD-20240115-03", "ORD-20240115-bad", "ORD-20240115-11"];
        let scan = max_sequence(numbers);
        assert_eq!(scan.max, 11);
        assert_eq!(scan.unparsable, vec!["ORD-20240115-bad"]);
        assert_eq!(max_sequence(Vec::<&str>::new()), SequenceScan::default());
    }

    #[test]
    fn test_fallback_never_zero() {
        assert_eq!(fallback_sequence(0), 1);
        assert_eq!(fallback_sequence(42), 42);
        for s in 0..60 {
            assert!((1..=59).contains(&fallback_sequence(s)));
        }
    }

    #[tokio::test]
    async fn test_next_number_reads_today() {
        let db = DbService::in_memory().await.unwrap();
        let tz = chrono_tz::Europe::Madrid;
        let today = crate::utils::time::today(tz);

        let mut conn = db.pool.acquire().await.unwrap();
        let first = next_number(&mut conn, tz).await;
        assert_eq!(first.order_number, format_order_number(today, 1));
        assert!(!first.degraded);

        // Yesterday's numbers do not count
        let yesterday = format_order_number(today.pred_opt().unwrap(), 50);
        for number in [first.order_number.as_str(), yesterday.as_str()] {
            insert(
                &mut *conn,
                &NewOrder {
                    order_number: number,
                    table_id: None,
                    user_id: None,
                    created_by: "Ana",
                    created_at: 0,
                    total: 0.0,
                    observations: None,
                },
            )
            .await
            .unwrap();
        }

        let second = next_number(&mut conn, tz).await;
        assert_eq!(second.sequence, 2);
        assert!(!second.degraded);
    }

    #[tokio::test]
    async fn test_corrupt_number_is_skipped_and_degrades() {
        let db = DbService::in_memory().await.unwrap();
        let tz = chrono_tz::Europe::Madrid;
        let today = crate::utils::time::today(tz);
        let good = format_order_number(today, 4);
        let corrupt = format!("{}xx", day_prefix(today));

        let mut conn = db.pool.acquire().await.unwrap();
        for number in [good.as_str(), corrupt.as_str()] {
            insert(
                &mut *conn,
                &NewOrder {
                    order_number: number,
                    table_id: None,
                    user_id: None,
                    created_by: "Ana",
                    created_at: 0,
                    total: 0.0,
                    observations: None,
                },
            )
            .await
            .unwrap();
        }

        let next = next_number(&mut conn, tz).await;
        assert_eq!(next.sequence, 5);
        assert!(next.degraded);
    }

    #[tokio::test]
    async fn test_read_failure_degrades() {
        let db = DbService::in_memory().await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        sqlx::query("DROP TABLE order_items")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("DROP TABLE orders")
            .execute(&mut *conn)
            .await
            .unwrap();

        let number = next_number(&mut conn, chrono_tz::Europe::Madrid).await;
        assert!(number.degraded);
        assert!((1..=59).contains(&number.sequence));
    }
}
