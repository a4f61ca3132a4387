//! Year filtering of the ticket dataset.

use dashboard_core::models::{Ticket, YearCutoff, YearSelection};

/// Tickets of `tickets` that belong to the selected years, in source order.
///
/// When the cutoff year is among the selected years, its tickets after the
/// cutoff month are left out. Other years are never truncated.
pub fn filter_view<'a>(
    tickets: &'a [Ticket],
    selection: &YearSelection,
    cutoff: Option<&YearCutoff>,
) -> Vec<&'a Ticket> {
    let cutoff = cutoff.filter(|c| selection.contains(&c.year));

    tickets
        .iter()
        .filter(|t| selection.contains(&t.year))
        .filter(|t| !cutoff.is_some_and(|c| c.excludes(t)))
        .collect()
}
