//! The five grouped aggregates behind the dashboard charts.
//!
//! Every function takes the filtered view (tickets in source order) and is
//! independent of the others.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use dashboard_core::models::Ticket;
use serde::Serialize;

// ── Result rows ───────────────────────────────────────────────────────────────

/// Total spend of one calendar month in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpend {
    pub month: u32,
    pub year: String,
    pub total: f64,
}

/// Mean ticket amount of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAverage {
    pub customer_id: String,
    pub average: f64,
    /// Year of the customer's first ticket in the filtered view.
    pub year: String,
}

/// Number of tickets of one customer in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseFrequency {
    pub customer_id: String,
    pub year: String,
    pub purchases: usize,
}

/// Total spend of one year in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyComparison {
    pub year: String,
    pub month: u32,
    pub total: f64,
}

/// Number of tickets in one month of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketVolume {
    /// First day of the month.
    pub period: NaiveDate,
    pub tickets: usize,
}

/// The five result tables for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardTables {
    pub monthly_spend: Vec<MonthlySpend>,
    pub average_ticket: Vec<CustomerAverage>,
    pub purchase_frequency: Vec<PurchaseFrequency>,
    pub yearly_comparison: Vec<YearlyComparison>,
    pub ticket_volume: Vec<TicketVolume>,
}

// ── AmountStats ───────────────────────────────────────────────────────────────

/// Running sum and count of known ticket amounts.
///
/// Unknown amounts are skipped: they add nothing to the sum and do not
/// count towards the mean.
#[derive(Debug, Clone, Copy, Default)]
struct AmountStats {
    total: f64,
    count: usize,
}

impl AmountStats {
    fn add(&mut self, amount: Option<f64>) {
        if let Some(amount) = amount {
            self.total += amount;
            self.count += 1;
        }
    }

    /// `None` when no known amount was added.
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

// ── CustomerKey ───────────────────────────────────────────────────────────────

/// Customer id ordered numerically when both ids are integers, textually
/// otherwise, so `"9"` sorts before `"10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CustomerKey<'a>(&'a str);

impl Ord for CustomerKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<i64>(), other.0.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(other.0),
        }
    }
}

impl PartialOrd for CustomerKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Run all five aggregates over `view`.
pub fn aggregate(view: &[&Ticket]) -> DashboardTables {
    DashboardTables {
        monthly_spend: monthly_spend(view),
        average_ticket: average_ticket(view),
        purchase_frequency: purchase_frequency(view),
        yearly_comparison: yearly_comparison(view),
        ticket_volume: ticket_volume(view),
    }
}

/// Sum of amounts per (month, year), ordered by month then year.
pub fn monthly_spend(view: &[&Ticket]) -> Vec<MonthlySpend> {
    let mut map: BTreeMap<(u32, &str), AmountStats> = BTreeMap::new();
    for t in view {
        map.entry((t.month(), t.year.as_str()))
            .or_default()
            .add(t.amount);
    }
    map.into_iter()
        .map(|((month, year), stats)| MonthlySpend {
            month,
            year: year.to_string(),
            total: stats.total,
        })
        .collect()
}

/// Mean amount per customer, labelled with the customer's first-seen year.
///
/// Tickets without a customer id are ignored. A customer whose amounts are
/// all unknown has no mean and gets no row.
pub fn average_ticket(view: &[&Ticket]) -> Vec<CustomerAverage> {
    let mut map: BTreeMap<CustomerKey, (AmountStats, &str)> = BTreeMap::new();
    for t in view {
        let Some(customer) = t.customer_id.as_deref() else {
            continue;
        };
        map.entry(CustomerKey(customer))
            .or_insert_with(|| (AmountStats::default(), t.year.as_str()))
            .0
            .add(t.amount);
    }
    map.into_iter()
        .filter_map(|(customer, (stats, year))| {
            Some(CustomerAverage {
                customer_id: customer.0.to_string(),
                average: stats.mean()?,
                year: year.to_string(),
            })
        })
        .collect()
}

/// Ticket count per (customer, year), ordered by customer then year.
///
/// Tickets without a customer id are ignored; tickets with an unknown
/// amount still count.
pub fn purchase_frequency(view: &[&Ticket]) -> Vec<PurchaseFrequency> {
    let mut map: BTreeMap<(CustomerKey, &str), usize> = BTreeMap::new();
    for t in view {
        let Some(customer) = t.customer_id.as_deref() else {
            continue;
        };
        *map.entry((CustomerKey(customer), t.year.as_str()))
            .or_default() += 1;
    }
    map.into_iter()
        .map(|((customer, year), purchases)| PurchaseFrequency {
            customer_id: customer.0.to_string(),
            year: year.to_string(),
            purchases,
        })
        .collect()
}

/// Sum of amounts per (year, month), ordered by year then month.
pub fn yearly_comparison(view: &[&Ticket]) -> Vec<YearlyComparison> {
    let mut map: BTreeMap<(&str, u32), AmountStats> = BTreeMap::new();
    for t in view {
        map.entry((t.year.as_str(), t.month()))
            .or_default()
            .add(t.amount);
    }
    map.into_iter()
        .map(|((year, month), stats)| YearlyComparison {
            year: year.to_string(),
            month,
            total: stats.total,
        })
        .collect()
}

/// Ticket count per calendar month, in chronological order.
///
/// Every month present in `view` gets a row; only tickets with an id are
/// counted.
pub fn ticket_volume(view: &[&Ticket]) -> Vec<TicketVolume> {
    let mut map: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for t in view {
        let count = map.entry(t.month_period()).or_default();
        if t.ticket_id.is_some() {
            *count += 1;
        }
    }
    map.into_iter()
        .map(|(period, tickets)| TicketVolume { period, tickets })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn make_ticket(
        ts: &str,
        amount: impl Into<Option<f64>>,
        customer: Option<&str>,
        id: Option<&str>,
    ) -> Ticket {
        Ticket::new(
            customer.map(str::to_string),
            id.map(str::to_string),
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            amount,
        )
    }

    fn t(ts: &str, amount: f64, customer: &str) -> Ticket {
        make_ticket(ts, amount, Some(customer), Some(ts))
    }

    fn view(tickets: &[Ticket]) -> Vec<&Ticket> {
        tickets.iter().collect()
    }

    // ── monthly_spend ─────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_spend_two_record_example() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 100.0, "A"),
            t("2022-02-15 00:00:00", 50.0, "A"),
        ];
        let rows = monthly_spend(&view(&tickets));
        assert_eq!(
            rows,
            vec![
                MonthlySpend { month: 1, year: "2022".into(), total: 100.0 },
                MonthlySpend { month: 2, year: "2022".into(), total: 50.0 },
            ]
        );
    }

    #[test]
    fn test_monthly_spend_ordered_by_month_then_year() {
        let tickets = vec![
            t("2023-03-01 00:00:00", 1.0, "A"),
            t("2022-03-01 00:00:00", 2.0, "A"),
            t("2022-01-01 00:00:00", 3.0, "A"),
        ];
        let keys: Vec<(u32, String)> = monthly_spend(&view(&tickets))
            .into_iter()
            .map(|r| (r.month, r.year))
            .collect();
        assert_eq!(
            keys,
            vec![(1, "2022".into()), (3, "2022".into()), (3, "2023".into())]
        );
    }

    #[test]
    fn test_monthly_spend_conserves_total_per_year() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 10.5, "A"),
            t("2022-01-20 00:00:00", -4.0, "B"),
            t("2022-07-01 00:00:00", 30.0, "C"),
            t("2021-07-01 00:00:00", 99.0, "C"),
        ];
        let rows = monthly_spend(&view(&tickets));
        let sum_2022: f64 = rows.iter().filter(|r| r.year == "2022").map(|r| r.total).sum();
        assert!((sum_2022 - 36.5).abs() < 1e-9);
    }

    // ── average_ticket ────────────────────────────────────────────────────────

    #[test]
    fn test_average_ticket_mean_per_customer() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 100.0, "A"),
            t("2022-02-15 00:00:00", 50.0, "A"),
            t("2022-02-16 00:00:00", 30.0, "B"),
        ];
        let rows = average_ticket(&view(&tickets));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer_id, "A");
        assert!((rows[0].average - 75.0).abs() < 1e-9);
        assert_eq!(rows[1].customer_id, "B");
        assert!((rows[1].average - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_ticket_uses_first_seen_year() {
        let tickets = vec![
            t("2023-01-10 00:00:00", 10.0, "A"),
            t("2022-01-10 00:00:00", 20.0, "A"),
        ];
        let rows = average_ticket(&view(&tickets));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, "2023");
        assert!((rows[0].average - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_ticket_skips_missing_customer() {
        let tickets = vec![
            make_ticket("2022-01-10 00:00:00", 10.0, None, Some("T1")),
            t("2022-01-11 00:00:00", 20.0, "A"),
        ];
        let rows = average_ticket(&view(&tickets));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_id, "A");
    }

    #[test]
    fn test_customer_ids_sort_numerically() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 1.0, "10"),
            t("2022-01-10 00:00:00", 1.0, "9"),
            t("2022-01-10 00:00:00", 1.0, "X"),
            t("2022-01-10 00:00:00", 1.0, "100"),
        ];
        let ids: Vec<String> = average_ticket(&view(&tickets))
            .into_iter()
            .map(|r| r.customer_id)
            .collect();
        assert_eq!(ids, vec!["9", "10", "100", "X"]);
    }

    // ── purchase_frequency ────────────────────────────────────────────────────

    #[test]
    fn test_purchase_frequency_per_customer_and_year() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 1.0, "A"),
            t("2023-01-10 00:00:00", 1.0, "A"),
            t("2022-05-10 00:00:00", 1.0, "A"),
            t("2022-05-10 00:00:00", 1.0, "B"),
        ];
        let rows = purchase_frequency(&view(&tickets));
        assert_eq!(
            rows,
            vec![
                PurchaseFrequency { customer_id: "A".into(), year: "2022".into(), purchases: 2 },
                PurchaseFrequency { customer_id: "A".into(), year: "2023".into(), purchases: 1 },
                PurchaseFrequency { customer_id: "B".into(), year: "2022".into(), purchases: 1 },
            ]
        );
    }

    #[test]
    fn test_purchase_frequency_matches_ticket_count() {
        let tickets: Vec<Ticket> = (1..=7)
            .map(|d| t(&format!("2022-03-0{d} 00:00:00"), 1.0, "A"))
            .collect();
        let rows = purchase_frequency(&view(&tickets));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].purchases, 7);
    }

    // ── yearly_comparison ─────────────────────────────────────────────────────

    #[test]
    fn test_yearly_comparison_ordered_by_year_then_month() {
        let tickets = vec![
            t("2023-01-01 00:00:00", 5.0, "A"),
            t("2022-12-01 00:00:00", 7.0, "A"),
            t("2022-02-01 00:00:00", 1.0, "A"),
            t("2022-02-15 00:00:00", 2.0, "B"),
        ];
        let rows = yearly_comparison(&view(&tickets));
        assert_eq!(
            rows,
            vec![
                YearlyComparison { year: "2022".into(), month: 2, total: 3.0 },
                YearlyComparison { year: "2022".into(), month: 12, total: 7.0 },
                YearlyComparison { year: "2023".into(), month: 1, total: 5.0 },
            ]
        );
    }

    // ── ticket_volume ─────────────────────────────────────────────────────────

    #[test]
    fn test_ticket_volume_two_record_example() {
        let tickets = vec![
            t("2022-01-10 00:00:00", 100.0, "A"),
            t("2022-02-15 00:00:00", 50.0, "A"),
        ];
        let rows = ticket_volume(&view(&tickets));
        assert_eq!(
            rows,
            vec![
                TicketVolume { period: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), tickets: 1 },
                TicketVolume { period: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(), tickets: 1 },
            ]
        );
    }

    #[test]
    fn test_ticket_volume_is_chronological_across_years() {
        let tickets = vec![
            t("2023-02-01 00:00:00", 1.0, "A"),
            t("2021-12-01 00:00:00", 1.0, "A"),
            t("2022-01-01 00:00:00", 1.0, "A"),
            t("2022-01-31 00:00:00", 1.0, "B"),
        ];
        let rows = ticket_volume(&view(&tickets));
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].period < w[1].period));
        assert_eq!(rows[1].tickets, 2);
    }

    #[test]
    fn test_ticket_volume_counts_only_identified_tickets() {
        let tickets = vec![
            make_ticket("2022-04-01 00:00:00", 1.0, Some("A"), None),
            make_ticket("2022-04-02 00:00:00", 1.0, Some("A"), Some("T2")),
            make_ticket("2022-05-02 00:00:00", 1.0, Some("A"), None),
        ];
        let rows = ticket_volume(&view(&tickets));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tickets, 1);
        assert_eq!(rows[1].tickets, 0);
    }

    // ── unknown amounts ───────────────────────────────────────────────────────

    #[test]
    fn test_unknown_amount_counts_but_does_not_sum() {
        let tickets = vec![
            make_ticket("2022-01-10 00:00:00", 100.0, Some("A"), Some("T1")),
            make_ticket("2022-01-20 00:00:00", None, Some("A"), Some("T2")),
        ];
        let tables = aggregate(&view(&tickets));

        assert_eq!(tables.purchase_frequency.len(), 1);
        assert_eq!(tables.purchase_frequency[0].purchases, 2);
        assert_eq!(tables.ticket_volume.len(), 1);
        assert_eq!(tables.ticket_volume[0].tickets, 2);

        assert_eq!(tables.monthly_spend[0].total, 100.0);
        assert_eq!(tables.yearly_comparison[0].total, 100.0);
        assert!((tables.average_ticket[0].average - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_with_only_unknown_amounts_totals_zero() {
        let tickets = vec![make_ticket("2022-03-10 00:00:00", None, Some("A"), Some("T1"))];
        let tables = aggregate(&view(&tickets));
        assert_eq!(
            tables.monthly_spend,
            vec![MonthlySpend { month: 3, year: "2022".into(), total: 0.0 }]
        );
        assert_eq!(tables.yearly_comparison[0].total, 0.0);
        assert!(tables.average_ticket.is_empty());
        assert_eq!(tables.purchase_frequency[0].purchases, 1);
    }

    // ── aggregate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_empty_view() {
        let tables = aggregate(&[]);
        assert_eq!(tables, DashboardTables::default());
    }

    #[test]
    fn test_aggregate_fills_all_tables() {
        let tickets = vec![t("2022-01-10 00:00:00", 100.0, "A")];
        let tables = aggregate(&view(&tickets));
        assert_eq!(tables.monthly_spend.len(), 1);
        assert_eq!(tables.average_ticket.len(), 1);
        assert_eq!(tables.purchase_frequency.len(), 1);
        assert_eq!(tables.yearly_comparison.len(), 1);
        assert_eq!(tables.ticket_volume.len(), 1);
    }
}
