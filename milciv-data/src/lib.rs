//! Rate-table loading for `milciv-core`.
//!
//! A rate-table directory holds five CSV files and one TOML file:
//!
//! | File                | Columns / sections                                          |
//! |---------------------|-------------------------------------------------------------|
//! | `base_pay.csv`      | `rank,min_years,monthly_pay`                                |
//! | `bah.csv`           | `location,rank,without_dependents,with_dependents`          |
//! | `bas.csv`           | `category,monthly_rate` (`enlisted` / `officer`)            |
//! | `tax_brackets.csv`  | `jurisdiction,filing_status,min_income,max_income,rate`     |
//! | `state_taxes.csv`   | `state,method,rate` (`none` / `flat` / `progressive`)       |
//! | `policy.toml`       | `[housing]`, `[standard_deduction]`, `[fica]`, `[policy]`   |
//!
//! Federal brackets use jurisdiction `US`; progressive states list their
//! brackets under their two-letter code. Any missing file yields an empty
//! table (or built-in defaults) and a `warn!` event; a malformed file is a
//! [`LoaderError`].

mod error;
mod loader;
mod records;

pub use error::LoaderError;
pub use loader::{RateTableLoader, RateTableSources};
pub use records::{
    BasePayRecord, HousingRecord, HousingSection, PolicyFile, StateTaxRecord, SubsistenceRecord,
    TaxBracketRecord,
};
