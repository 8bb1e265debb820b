pub mod download_buttons;
pub mod error_banner;
pub mod navbar;
pub mod page;
pub mod production_chart;
pub mod production_table;
pub mod region_picker;

pub use download_buttons::DownloadButtons;
pub use error_banner::ErrorBanner;
pub use navbar::Navbar;
pub use page::Page;
pub use production_chart::ProductionChart;
pub use production_table::ProductionTableView;
pub use region_picker::RegionPicker;
