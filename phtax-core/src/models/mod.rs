mod filing_period;
mod tax_bracket;
mod tax_type;

pub use filing_period::FilingPeriod;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_type::{TaxType, TaxTypeInfo};
