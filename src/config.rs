/// Configuration constants for the application
pub struct Config;

impl Config {
    /// Metrics API base URL used when none is given at build time
    pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:3000/api";

    /// Session storage key holding the persisted filter selection
    pub const SELECTION_STORAGE_KEY: &'static str = "fuel-dashboard.filters";

    /// Month selected when nothing valid is persisted (November)
    pub const DEFAULT_MONTH: u8 = 11;

    /// Year selected when nothing valid is persisted
    pub const DEFAULT_YEAR: i32 = 2025;

    /// Years offered by the filter panel
    pub const SELECTABLE_YEARS: [i32; 4] = [2022, 2023, 2024, 2025];

    /// Count-up animation length in milliseconds
    pub const ANIMATION_DURATION_MS: u32 = 1_200;

    /// Animation frame pacing (~60fps)
    pub const ANIMATION_FRAME_MS: u32 = 16;

    /// Pie/donut slices smaller than this are dropped
    pub const MIN_SLICE_VALUE: f64 = 0.01;

    /// Share of total fuel volume assumed bunkered when no breakdown is reported
    pub const BUNKERED_ESTIMATE_SHARE: f64 = 0.7;

    /// Base URL of the metrics API.
    ///
    /// Set `FUEL_DASHBOARD_API_URL` at build time to override the default.
    pub fn api_base_url() -> &'static str {
        option_env!("FUEL_DASHBOARD_API_URL").unwrap_or(Self::DEFAULT_API_BASE_URL)
    }
}
