/// Price label for course listings. Zero is shown as "Free"; everything else
/// is rupees with Indian digit grouping (last three digits, then pairs).
pub(crate) fn format_price(price: i64) -> String {
    if price == 0 {
        return "Free".to_string();
    }

    format!("₹{}", group_indian(price.unsigned_abs()))
}

fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let head_bytes = head.as_bytes();
    let mut index = head_bytes.len();
    while index > 0 {
        let start = index.saturating_sub(2);
        groups.push(head[start..index].to_string());
        index = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_price_is_free() {
        assert_eq!(format_price(0), "Free");
    }

    #[test]
    fn formats_rupees_with_grouping() {
        assert_eq!(format_price(999), "₹999");
        assert_eq!(format_price(15_000), "₹15,000");
        assert_eq!(format_price(1_50_000), "₹1,50,000");
        assert_eq!(format_price(12_34_56_789), "₹12,34,56,789");
    }
}
