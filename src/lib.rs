pub mod aggregate;
pub mod error;
pub mod filter;
pub mod load;
pub mod normalize;
pub mod report;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{count_by, count_by_year, count_hierarchy, CountRow, CountTable, HierarchyCount};
pub use error::DataLoadError;
pub use filter::{FilterOptions, FilterSelection};
pub use load::{cache::DatasetCache, load_raw_table, RawTable};
pub use normalize::{normalize, CaseTable};
pub use report::DashboardReport;
