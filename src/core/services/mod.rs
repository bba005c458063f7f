pub mod expense_service;
pub mod export_service;
pub mod summary_service;

pub use expense_service::{CreateOutcome, ExpenseService};
pub use export_service::{ExportService, EXPORT_FILE_NAME};
pub use summary_service::{CategoryShare, DashboardSummary, SummaryService};
