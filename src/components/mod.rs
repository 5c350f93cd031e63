pub mod chart;
pub mod filter_panel;
pub mod kpi_card;
pub mod status;
pub mod summary;

pub use chart::{DailySalesChart, SalesDistributionChart};
pub use filter_panel::FilterPanel;
pub use kpi_card::KpiCard;
pub use status::{SiteStatus, Status};
pub use summary::Summary;
