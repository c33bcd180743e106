mod fica;
mod filing_status;
mod policy;
mod rank;
mod rate_tables;
mod tax_bracket;
mod warning;

pub use fica::FicaPolicy;
pub use filing_status::FilingStatus;
pub use policy::{CompanyStage, PolicyConstants, StageDiscounts};
pub use rank::{Rank, RankCategory};
pub use rate_tables::{
    BasePayTable, DEFAULT_DUTY_STATION, FederalTaxTable, HousingRate, HousingTable, RateTables,
    StandardDeductions, StateTaxMethod, StateTaxTable, SubsistenceRates, normalize_location,
    normalize_state,
};
pub use tax_bracket::{BracketSchedule, ScheduleError, TaxBracket};
pub use warning::Warning;
