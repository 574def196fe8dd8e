//! Utility functions

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hide most of the local part for log output.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 }).collect();
        format!("{}***{}", visible, domain)
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(68.75), 68.75);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("budi@robotik.ac.id"), "bu***@robotik.ac.id");
        assert_eq!(mask_email("a@x.id"), "a***@x.id");
        assert_eq!(mask_email("invalid"), "***");
    }
}
