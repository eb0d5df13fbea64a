//! Ledger key scheme
//!
//! A company's balance lives under a single namespaced key:
//!
//! ```text
//! shares:<company_id>
//! ```

use crate::types::CompanyId;

/// Namespace prefix for balance keys
pub const SHARES_PREFIX: &str = "shares:";

/// Build the balance key for a company
///
/// # Examples
///
/// ```
/// use shareguard_core::{shares_key, CompanyId};
///
/// assert_eq!(shares_key(&CompanyId::new("TestCompanySL")), "shares:TestCompanySL");
/// ```
pub fn shares_key(company: &CompanyId) -> String {
    format!("{}{}", SHARES_PREFIX, company.as_str())
}

/// Recover the company id from a balance key
///
/// Returns `None` for keys outside the `shares:` namespace.
pub fn company_from_key(key: &str) -> Option<CompanyId> {
    key.strip_prefix(SHARES_PREFIX).map(CompanyId::from)
}
