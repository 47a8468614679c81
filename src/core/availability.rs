use crate::domain::model::{
    BoundaryPolicy, RangeInput, RequestedRange, Reservation, StatusPolicy, Vehicle,
};

/// Decides which vehicles are free for a requested date range.
///
/// Pure over its inputs; the catalog is an already fetched snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityFilter {
    status_policy: StatusPolicy,
    boundary: BoundaryPolicy,
}

impl AvailabilityFilter {
    pub fn new(status_policy: StatusPolicy, boundary: BoundaryPolicy) -> Self {
        Self {
            status_policy,
            boundary,
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// `false` as soon as one blocking reservation overlaps `range`.
    pub fn is_available(&self, vehicle: &Vehicle, range: &RequestedRange) -> bool {
        let policy = self.status_policy;
        self.is_available_where(vehicle, range, |r| r.blocks(policy))
    }

    /// Same test with a caller supplied predicate deciding which reservations block.
    pub fn is_available_where<F>(&self, vehicle: &Vehicle, range: &RequestedRange, blocks: F) -> bool
    where
        F: Fn(&Reservation) -> bool,
    {
        !vehicle
            .reservations
            .iter()
            .filter(|r| blocks(r))
            .any(|r| r.interval.overlaps_with(range, self.boundary))
    }

    /// Filters `catalog` down to the vehicles free for the range, keeping catalog order.
    ///
    /// A missing, unparseable or inverted range yields no vehicles at all.
    pub fn filter_available<'a>(&self, catalog: &'a [Vehicle], input: &RangeInput) -> Vec<&'a Vehicle> {
        match input.resolve() {
            Ok(range) => self.filter_in_range(catalog, &range),
            Err(e) => {
                tracing::debug!("No availability without a valid date range: {}", e);
                Vec::new()
            }
        }
    }

    pub fn filter_in_range<'a>(&self, catalog: &'a [Vehicle], range: &RequestedRange) -> Vec<&'a Vehicle> {
        let available: Vec<&Vehicle> = catalog
            .iter()
            .filter(|vehicle| self.is_available(vehicle, range))
            .collect();

        tracing::debug!(
            "{} of {} vehicles available for {}",
            available.len(),
            catalog.len(),
            range
        );
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BookingStatus, DateRange};

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    fn ids(vehicles: &[&Vehicle]) -> Vec<u64> {
        vehicles.iter().map(|v| v.id).collect()
    }

    fn scenario_catalog() -> Vec<Vehicle> {
        vec![
            Vehicle::new(1).with_reservation(range("2024-06-01", "2024-06-05"), Some(BookingStatus::Booked)),
            Vehicle::new(2),
        ]
    }

    #[test]
    fn test_vehicle_without_reservations_is_available() {
        let filter = AvailabilityFilter::default();
        let vehicle = Vehicle::new(9);
        for (start, end) in [("2024-01-01", "2024-01-01"), ("2020-02-28", "2030-03-01")] {
            assert!(filter.is_available(&vehicle, &range(start, end)));
        }
    }

    #[test]
    fn test_disjoint_ranges_are_available() {
        let filter = AvailabilityFilter::default();
        let vehicle = Vehicle::new(1).with_reservation(range("2024-06-10", "2024-06-15"), None);

        assert!(filter.is_available(&vehicle, &range("2024-06-01", "2024-06-09")));
        assert!(filter.is_available(&vehicle, &range("2024-06-16", "2024-06-20")));
    }

    #[test]
    fn test_overlapping_ranges_are_unavailable() {
        let filter = AvailabilityFilter::default();
        let vehicle = Vehicle::new(1).with_reservation(range("2024-06-10", "2024-06-15"), None);

        for (start, end) in [
            ("2024-06-08", "2024-06-10"), // ends on reservation start
            ("2024-06-15", "2024-06-18"), // starts on reservation end
            ("2024-06-11", "2024-06-12"), // inside
            ("2024-06-01", "2024-06-30"), // covers
            ("2024-06-12", "2024-06-20"), // straddles end
        ] {
            assert!(
                !filter.is_available(&vehicle, &range(start, end)),
                "{}..{} should collide",
                start,
                end
            );
        }
    }

    #[test]
    fn test_any_single_overlap_blocks() {
        let filter = AvailabilityFilter::default();
        let vehicle = Vehicle::new(1)
            .with_reservation(range("2024-01-01", "2024-01-03"), None)
            .with_reservation(range("2024-07-01", "2024-07-03"), None);

        assert!(filter.is_available(&vehicle, &range("2024-03-01", "2024-03-05")));
        assert!(!filter.is_available(&vehicle, &range("2024-07-03", "2024-07-04")));
    }

    #[test]
    fn test_scenario_request_inside_reservation() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::default();
        let result = filter.filter_available(&catalog, &RangeInput::new("2024-06-03", "2024-06-04"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_scenario_day_after_reservation_ends() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::default();
        let result = filter.filter_available(&catalog, &RangeInput::new("2024-06-06", "2024-06-10"));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_scenario_start_on_reservation_end_collides() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::default();
        let result = filter.filter_available(&catalog, &RangeInput::new("2024-06-05", "2024-06-07"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_same_day_turnover_admits_boundary_day() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::new(StatusPolicy::ActiveOnly, BoundaryPolicy::SameDayTurnover);
        let result = filter.filter_available(&catalog, &RangeInput::new("2024-06-05", "2024-06-07"));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_unset_or_bad_range_yields_nothing() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::default();

        assert!(filter.filter_available(&catalog, &RangeInput::unset()).is_empty());
        assert!(filter
            .filter_available(
                &catalog,
                &RangeInput {
                    start: Some("2024-06-06".to_string()),
                    end: Some(String::new()),
                }
            )
            .is_empty());
        assert!(filter
            .filter_available(&catalog, &RangeInput::new("06/06/2024", "2024-06-10"))
            .is_empty());
        assert!(filter
            .filter_available(&catalog, &RangeInput::new("2024-06-10", "2024-06-06"))
            .is_empty());
    }

    #[test]
    fn test_date_followed_by_junk_yields_nothing() {
        let catalog = scenario_catalog();
        let filter = AvailabilityFilter::default();

        assert!(filter
            .filter_available(&catalog, &RangeInput::new("2024-06-06 garbage", "2024-06-10"))
            .is_empty());
        assert!(filter
            .filter_available(&catalog, &RangeInput::new("2024-06-06", "2024-06-10Tnonsense"))
            .is_empty());
    }

    #[test]
    fn test_filter_preserves_order_and_membership() {
        let catalog: Vec<Vehicle> = (1..=8)
            .map(|id| {
                if id % 3 == 0 {
                    Vehicle::new(id).with_reservation(range("2024-06-01", "2024-06-30"), None)
                } else {
                    Vehicle::new(id)
                }
            })
            .collect();
        let filter = AvailabilityFilter::default();
        let result = filter.filter_available(&catalog, &RangeInput::new("2024-06-10", "2024-06-12"));

        assert_eq!(ids(&result), vec![1, 2, 4, 5, 7, 8]);
        assert!(result.iter().all(|v| catalog.iter().any(|c| std::ptr::eq(*v, c))));
    }

    #[test]
    fn test_terminal_reservations_do_not_block_by_default() {
        let vehicle = Vehicle::new(1)
            .with_reservation(range("2024-06-01", "2024-06-05"), Some(BookingStatus::Cancelled))
            .with_reservation(range("2024-06-01", "2024-06-05"), Some(BookingStatus::Completed))
            .with_reservation(
                range("2024-06-01", "2024-06-05"),
                Some(BookingStatus::CancelledByCustomer),
            );
        let request = range("2024-06-02", "2024-06-03");

        assert!(AvailabilityFilter::default().is_available(&vehicle, &request));
        let strict = AvailabilityFilter::new(StatusPolicy::AllReservations, BoundaryPolicy::Inclusive);
        assert!(!strict.is_available(&vehicle, &request));
    }

    #[test]
    fn test_custom_blocking_predicate() {
        let vehicle = Vehicle::new(1)
            .with_reservation(range("2024-06-01", "2024-06-05"), None)
            .with_reservation(range("2024-06-20", "2024-06-25"), Some(BookingStatus::Booked));
        let filter = AvailabilityFilter::default();

        // 只把有明確狀態的預約當作佔用
        let only_known = |r: &Reservation| r.status.is_some();
        assert!(filter.is_available_where(&vehicle, &range("2024-06-02", "2024-06-03"), only_known));
        assert!(!filter.is_available_where(&vehicle, &range("2024-06-21", "2024-06-22"), only_known));
    }
}
