//! Small stateless-or-nearly widgets shared by the dashboard screens.

pub mod header;
pub mod year_picker;
