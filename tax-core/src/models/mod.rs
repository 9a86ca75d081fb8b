mod regime;
mod surcharge;
mod tax_bracket;
mod tax_result;

pub use regime::{CESS_RATE, RegimeError, RegimeId, TaxRegime, validate_brackets};
pub use surcharge::{SurchargePolicy, SurchargeTier};
pub use tax_bracket::TaxBracket;
pub use tax_result::{BracketContribution, TaxResult};
