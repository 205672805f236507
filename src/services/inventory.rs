use std::cmp::Ordering;

use crate::models::Cabin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountFilter {
    #[default]
    All,
    Discounted,
    FullPrice,
}

impl DiscountFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(DiscountFilter::All),
            "discount" => Some(DiscountFilter::Discounted),
            "no-discount" => Some(DiscountFilter::FullPrice),
            _ => None,
        }
    }

    fn keeps(&self, cabin: &Cabin) -> bool {
        match self {
            DiscountFilter::All => true,
            DiscountFilter::Discounted => cabin.discount > 0.0,
            DiscountFilter::FullPrice => cabin.discount == 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinField {
    Name,
    RegularPrice,
    MaxCapacity,
}

/// `<field>-<asc|desc>`, e.g. `regularPrice-desc`. Fields are `name`,
/// `regularPrice` and `capacity` (`maxCapacity` is accepted too).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CabinSort {
    pub field: CabinField,
    pub ascending: bool,
}

impl Default for CabinSort {
    fn default() -> Self {
        Self {
            field: CabinField::Name,
            ascending: true,
        }
    }
}

impl CabinSort {
    pub fn parse(s: &str) -> Option<Self> {
        let (field, direction) = s.rsplit_once('-')?;
        let field = match field {
            "name" => CabinField::Name,
            "regularPrice" => CabinField::RegularPrice,
            "capacity" | "maxCapacity" => CabinField::MaxCapacity,
            _ => return None,
        };
        let ascending = match direction {
            "asc" => true,
            "desc" => false,
            _ => return None,
        };
        Some(Self { field, ascending })
    }

    fn compare(&self, a: &Cabin, b: &Cabin) -> Ordering {
        let ord = match self.field {
            CabinField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            CabinField::RegularPrice => a.regular_price.total_cmp(&b.regular_price),
            CabinField::MaxCapacity => a.max_capacity.cmp(&b.max_capacity),
        };
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Filters and orders the cabin list in memory. The sort is stable, so equal
/// keys keep their storage order.
pub fn arrange_cabins(mut cabins: Vec<Cabin>, filter: DiscountFilter, sort: CabinSort) -> Vec<Cabin> {
    cabins.retain(|c| filter.keeps(c));
    cabins.sort_by(|a, b| sort.compare(a, b));
    cabins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabin(id: i64, name: &str, price: f64, discount: f64, capacity: i64) -> Cabin {
        Cabin {
            id,
            name: name.to_string(),
            max_capacity: capacity,
            regular_price: price,
            discount,
            description: String::new(),
            image: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn cabins() -> Vec<Cabin> {
        vec![
            cabin(1, "Birch", 300.0, 0.0, 2),
            cabin(2, "alder", 500.0, 50.0, 6),
            cabin(3, "Cedar", 150.0, 10.0, 4),
        ]
    }

    fn ids(cabins: &[Cabin]) -> Vec<i64> {
        cabins.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_default_is_name_ascending_case_insensitive() {
        let arranged = arrange_cabins(cabins(), DiscountFilter::All, CabinSort::default());
        assert_eq!(ids(&arranged), vec![2, 1, 3]);
    }

    #[test]
    fn test_discount_filters() {
        let discounted = arrange_cabins(cabins(), DiscountFilter::Discounted, CabinSort::default());
        assert_eq!(ids(&discounted), vec![2, 3]);
        let full = arrange_cabins(cabins(), DiscountFilter::FullPrice, CabinSort::default());
        assert_eq!(ids(&full), vec![1]);
    }

    #[test]
    fn test_sort_by_price_and_capacity() {
        let sort = CabinSort::parse("regularPrice-desc").unwrap();
        assert_eq!(ids(&arrange_cabins(cabins(), DiscountFilter::All, sort)), vec![2, 1, 3]);
        let sort = CabinSort::parse("capacity-asc").unwrap();
        assert_eq!(ids(&arrange_cabins(cabins(), DiscountFilter::All, sort)), vec![1, 3, 2]);
        assert_eq!(CabinSort::parse("maxCapacity-asc"), Some(sort));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(CabinSort::parse("discount-asc").is_none());
        assert!(CabinSort::parse("name-up").is_none());
        assert!(CabinSort::parse("name").is_none());
        assert!(DiscountFilter::parse("cheap").is_none());
    }
}
