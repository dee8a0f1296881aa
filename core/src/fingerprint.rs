//! Deduplication keys.
//!
//! Public addresses are globally unique, so only the flag and address go into
//! the key. Inner addresses may repeat across VLANs and assignments.

use entity::sea_orm_active_enums::NetFlag;

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Input string hashed by [`fingerprint`].
pub fn fingerprint_input(
    normalized: &str,
    flag: NetFlag,
    vlan_id: Option<&str>,
    assignment: Option<&str>,
) -> String {
    let normalized = normalized.trim();
    match flag {
        NetFlag::Public => format!("1#{normalized}"),
        NetFlag::Inner => {
            let mut key = String::new();
            if let Some(vlan) = vlan_id.map(str::trim).filter(|v| !v.is_empty()) {
                key.push_str(vlan);
                key.push('#');
            }
            key.push_str("0#");
            key.push_str(normalized);
            if let Some(assignment) = assignment.map(str::trim).filter(|a| !a.is_empty()) {
                key.push('#');
                key.push_str(assignment);
            }
            key
        }
    }
}

pub fn fingerprint(
    normalized: &str,
    flag: NetFlag,
    vlan_id: Option<&str>,
    assignment: Option<&str>,
) -> String {
    md5_hex(&fingerprint_input(normalized, flag, vlan_id, assignment))
}

/// Natural key of a vendor: md5 of its trimmed full name.
pub fn vendor_fingerprint(fullname: &str) -> String {
    md5_hex(fullname.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn public_key_ignores_context() {
        assert_eq!(
            fingerprint_input("8.8.8.8", NetFlag::Public, Some("10"), Some("dns")),
            "1#8.8.8.8"
        );
        assert_eq!(
            fingerprint("8.8.8.8", NetFlag::Public, None, None),
            format!("{:x}", md5::compute("1#8.8.8.8"))
        );
    }

    #[test]
    fn inner_key_carries_context() {
        assert_eq!(fingerprint_input("10.0.0.1", NetFlag::Inner, None, None), "0#10.0.0.1");
        assert_eq!(
            fingerprint_input("10.0.0.1", NetFlag::Inner, Some(" 100 "), Some(" web ")),
            "100#0#10.0.0.1#web"
        );
        assert_eq!(
            fingerprint_input("10.0.0.1", NetFlag::Inner, Some(""), Some("   ")),
            "0#10.0.0.1"
        );
    }

    #[test]
    fn flag_changes_the_key() {
        let inner = fingerprint("10.0.0.0/30", NetFlag::Inner, None, None);
        assert_eq!(inner, fingerprint("10.0.0.0/30", NetFlag::Inner, None, None));
        assert_ne!(inner, fingerprint("10.0.0.0/30", NetFlag::Public, None, None));
        assert_eq!(inner.len(), 32);
    }

    #[test]
    fn vendor_key_is_trimmed() {
        assert_eq!(vendor_fingerprint("  Acme Ltd "), vendor_fingerprint("Acme Ltd"));
        assert_ne!(vendor_fingerprint("Acme Ltd"), vendor_fingerprint("acme ltd"));
    }
}
