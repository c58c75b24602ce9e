//! Sequential code generation.

use std::collections::HashSet;

use crate::code::WarrantyCode;

/// First code of the auto-sequenced range.
pub const CODE_FLOOR: u64 = 2_378_561_284_420_001;

/// Compute the next code to offer for issuance.
///
/// `entries` yields `(registry key, is_custom_code)` for every record. Only
/// auto-sequenced records move the watermark, but every key (custom or not)
/// is treated as occupied. Keys are compared with whitespace removed; keys
/// that are not 16 digits occupy nothing numerically and are ignored for the
/// watermark.
///
/// Returns None when the sequence would run past `9999 9999 9999 9999`.
pub fn next_code<'a, I>(entries: I) -> Option<WarrantyCode>
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut used = HashSet::new();
    let mut last = 0u64;

    for (key, is_custom) in entries {
        let bare: String = key.chars().filter(|c| !c.is_whitespace()).collect();
        if !is_custom {
            if let Ok(code) = WarrantyCode::parse_exact(&bare) {
                last = last.max(code.to_u64());
            }
        }
        used.insert(bare);
    }

    let mut candidate = if last >= CODE_FLOOR { last.checked_add(1)? } else { CODE_FLOOR };
    loop {
        let code = WarrantyCode::from_u64(candidate)?;
        if !used.contains(code.as_str()) {
            return Some(code);
        }
        candidate = candidate.checked_add(1)?;
    }
}
