//! One recomputation of the dashboard: filter, empty check, five aggregates.

use dashboard_core::labels::ChartLabels;
use dashboard_core::models::{Dataset, YearCutoff, YearSelection};
use tracing::debug;

use crate::aggregator::{self, DashboardTables};
use crate::figures::DashboardFigures;
use crate::selection::filter_view;

/// Outcome of running the pipeline for one selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    /// The filtered view is empty; every chart is a placeholder.
    NoData,
    Tables(DashboardTables),
}

impl DashboardUpdate {
    pub fn is_no_data(&self) -> bool {
        matches!(self, DashboardUpdate::NoData)
    }

    /// Chart specifications for this update.
    pub fn into_figures(self, labels: &ChartLabels, selection: &YearSelection) -> DashboardFigures {
        match self {
            DashboardUpdate::NoData => DashboardFigures::empty(),
            DashboardUpdate::Tables(tables) => {
                DashboardFigures::from_tables(&tables, labels, selection)
            }
        }
    }
}

/// Filter `dataset` by `selection` (honouring `cutoff`) and aggregate.
pub fn run(
    dataset: &Dataset,
    selection: &YearSelection,
    cutoff: Option<&YearCutoff>,
) -> DashboardUpdate {
    let view = filter_view(dataset.tickets(), selection, cutoff);
    if view.is_empty() {
        debug!(years = %selection.joined(), "selection has no tickets");
        return DashboardUpdate::NoData;
    }

    debug!(
        years = %selection.joined(),
        tickets = view.len(),
        "aggregating filtered view"
    );
    DashboardUpdate::Tables(aggregator::aggregate(&view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::Ticket;

    fn ticket(y: i32, m: u32, d: u32, amount: f64, customer: &str) -> Ticket {
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Ticket::new(
            Some(customer.to_string()),
            Some(format!("{customer}-{y}{m:02}{d:02}")),
            date,
            amount,
        )
    }

    fn dataset() -> Dataset {
        Dataset::from_tickets(vec![
            ticket(2022, 1, 10, 100.0, "A"),
            ticket(2022, 2, 15, 50.0, "A"),
            ticket(2023, 3, 1, 20.0, "B"),
            ticket(2023, 7, 1, 999.0, "B"),
        ])
    }

    #[test]
    fn test_run_two_record_example() {
        let ds = dataset();
        let update = run(&ds, &YearSelection::new(["2022"]), Some(&YearCutoff::default()));
        let DashboardUpdate::Tables(tables) = update else {
            panic!("expected tables");
        };
        assert_eq!(tables.monthly_spend.len(), 2);
        assert_eq!(tables.monthly_spend[0].total, 100.0);
        assert_eq!(tables.monthly_spend[1].total, 50.0);
        let volumes: Vec<usize> = tables.ticket_volume.iter().map(|v| v.tickets).collect();
        assert_eq!(volumes, vec![1, 1]);
    }

    #[test]
    fn test_run_disjoint_selection_is_no_data() {
        let ds = dataset();
        let update = run(&ds, &YearSelection::new(["1999"]), None);
        assert!(update.is_no_data());

        let figs = update.into_figures(&ChartLabels::spanish(), &YearSelection::new(["1999"]));
        assert_eq!(figs, DashboardFigures::empty());
    }

    #[test]
    fn test_run_empty_after_cutoff_is_no_data() {
        let ds = Dataset::from_tickets(vec![ticket(2023, 9, 1, 10.0, "A")]);
        let update = run(&ds, &YearSelection::new(["2023"]), Some(&YearCutoff::default()));
        assert!(update.is_no_data());
    }

    #[test]
    fn test_run_cutoff_excludes_late_months() {
        let ds = dataset();
        let update = run(&ds, &YearSelection::new(["2023"]), Some(&YearCutoff::default()));
        let DashboardUpdate::Tables(tables) = update else {
            panic!("expected tables");
        };
        assert!(tables.yearly_comparison.iter().all(|r| r.month <= 5));
        let total: f64 = tables.monthly_spend.iter().map(|r| r.total).sum();
        assert_eq!(total, 20.0);
    }

    #[test]
    fn test_run_empty_dataset_is_no_data() {
        let ds = Dataset::from_tickets(Vec::new());
        assert!(run(&ds, &YearSelection::new(["2022"]), None).is_no_data());
    }

    #[test]
    fn test_into_figures_titles_use_selection() {
        let ds = dataset();
        let sel = YearSelection::new(["2023", "2022"]);
        let figs = run(&ds, &sel, None).into_figures(&ChartLabels::spanish(), &sel);
        assert_eq!(
            figs.purchase_frequency.title,
            "Frecuencia de compra por cliente en 2023, 2022"
        );
        assert!(!figs.is_empty());
    }

    #[test]
    fn test_run_blank_amount_still_counts_as_purchase() {
        let csv = "Id_cliente,Id_tiquet,Fecha_tiquet,Importe_tiquet\n\
                   A,T1,2022-01-10,100\n\
                   A,T2,2022-01-20,\n";
        let ds = crate::reader::read_tickets(csv.as_bytes()).expect("read");
        assert_eq!(ds.report().kept_rows, 2);
        assert_eq!(ds.report().invalid_amounts, 1);

        let DashboardUpdate::Tables(tables) = run(&ds, &YearSelection::new(["2022"]), None) else {
            panic!("expected tables");
        };
        assert_eq!(tables.purchase_frequency[0].purchases, 2);
        assert_eq!(tables.ticket_volume[0].tickets, 2);
        assert_eq!(tables.monthly_spend[0].total, 100.0);
        assert!((tables.average_ticket[0].average - 100.0).abs() < 1e-9);
    }
}
