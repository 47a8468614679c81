use crate::domain::model::{
    BookingStatus, Car, CarListing, DateRange, RawReservation, Reservation, Vehicle, VehicleId,
};
use crate::utils::error::RentalError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    MissingDate,
    UnparseableDate,
    InvertedRange,
    UnknownStatus,
}

/// A reservation record that could not be taken at face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogAnomaly {
    pub vehicle_id: VehicleId,
    pub kind: AnomalyKind,
    pub detail: String,
}

/// Normalised catalog: `vehicles[i]` and `cars[i]` describe the same listing.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub cars: Vec<Car>,
    pub anomalies: Vec<CatalogAnomaly>,
}

impl CatalogSnapshot {
    pub fn car(&self, id: VehicleId) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Car details for a filtered vehicle list, in the same order.
    pub fn cars_for(&self, vehicles: &[&Vehicle]) -> Vec<Car> {
        vehicles
            .iter()
            .filter_map(|v| self.car(v.id))
            .cloned()
            .collect()
    }
}

pub fn normalize_catalog(listings: Vec<CarListing>) -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::default();

    for listing in listings {
        let id = listing.car.id;
        let mut vehicle = Vehicle::new(id);

        for raw in &listing.bookings {
            if let Some(reservation) = normalize_reservation(id, raw, &mut snapshot.anomalies) {
                vehicle.reservations.push(reservation);
            }
        }

        snapshot.vehicles.push(vehicle);
        snapshot.cars.push(listing.car);
    }

    if !snapshot.anomalies.is_empty() {
        tracing::warn!(
            "Catalog contained {} malformed reservation record(s)",
            snapshot.anomalies.len()
        );
    }
    snapshot
}

fn normalize_reservation(
    vehicle_id: VehicleId,
    raw: &RawReservation,
    anomalies: &mut Vec<CatalogAnomaly>,
) -> Option<Reservation> {
    let mut report = |kind: AnomalyKind, detail: String| {
        tracing::warn!(vehicle_id, ?kind, "Reservation anomaly: {}", detail);
        anomalies.push(CatalogAnomaly {
            vehicle_id,
            kind,
            detail,
        });
    };

    let (start, end) = match (raw.start_date.as_deref(), raw.end_date.as_deref()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            report(
                AnomalyKind::MissingDate,
                format!("start={:?} end={:?}", raw.start_date, raw.end_date),
            );
            return None;
        }
    };

    let interval = match DateRange::parse(start, end) {
        Ok(interval) => interval,
        Err(RentalError::InvalidRange { start, end }) => {
            report(AnomalyKind::InvertedRange, format!("{} after {}", start, end));
            return None;
        }
        Err(e) => {
            report(AnomalyKind::UnparseableDate, e.to_string());
            return None;
        }
    };

    let status = match raw.status.as_deref() {
        None => None,
        Some(s) => match s.parse::<BookingStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                // 狀態不明時仍視為佔用
                report(AnomalyKind::UnknownStatus, e.to_string());
                None
            }
        },
    };

    Some(Reservation::new(interval, status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: VehicleId, bookings: Vec<RawReservation>) -> CarListing {
        CarListing {
            car: Car {
                id,
                model: format!("Model {}", id),
                brand: "Maruti".to_string(),
                price_per_day: 1500.0,
                available: true,
            },
            bookings,
        }
    }

    fn raw(start: Option<&str>, end: Option<&str>, status: Option<&str>) -> RawReservation {
        RawReservation {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_keeps_order_and_valid_reservations() {
        let snapshot = normalize_catalog(vec![
            listing(3, vec![raw(Some("2024-06-01"), Some("2024-06-05"), Some("Booked"))]),
            listing(1, vec![]),
        ]);

        assert_eq!(snapshot.vehicles.iter().map(|v| v.id).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(snapshot.cars.len(), 2);
        assert_eq!(snapshot.vehicles[0].reservations.len(), 1);
        assert_eq!(
            snapshot.vehicles[0].reservations[0].status,
            Some(BookingStatus::Booked)
        );
        assert!(snapshot.anomalies.is_empty());
    }

    #[test]
    fn test_corrupt_reservations_are_dropped_and_reported() {
        let snapshot = normalize_catalog(vec![listing(
            5,
            vec![
                raw(Some("not a date"), Some("2024-06-05"), None),
                raw(None, Some("2024-06-05"), None),
                raw(Some("2024-06-09"), Some("2024-06-01"), None),
                raw(Some("2024-07-01"), Some("2024-07-02"), None),
                raw(Some("2024-06-01 junk"), Some("2024-06-05"), None),
            ],
        )]);

        let vehicle = snapshot.vehicle(5).unwrap();
        assert_eq!(vehicle.reservations.len(), 1);
        let kinds: Vec<AnomalyKind> = snapshot.anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnomalyKind::UnparseableDate,
                AnomalyKind::MissingDate,
                AnomalyKind::InvertedRange,
                AnomalyKind::UnparseableDate
            ]
        );
        assert!(snapshot.anomalies.iter().all(|a| a.vehicle_id == 5));
    }

    #[test]
    fn test_unknown_status_keeps_blocking_reservation() {
        let snapshot = normalize_catalog(vec![listing(
            2,
            vec![raw(Some("2024-06-01"), Some("2024-06-02"), Some("on hold"))],
        )]);

        let reservations = &snapshot.vehicle(2).unwrap().reservations;
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].status, None);
        assert_eq!(snapshot.anomalies[0].kind, AnomalyKind::UnknownStatus);
    }

    #[test]
    fn test_listing_deserializes_from_wire_json() {
        let json = serde_json::json!([
            {
                "id": 1, "model": "Swift", "brand": "Maruti", "price_per_day": 1200.0,
                "available": true,
                "bookings": [{"start_date": "2024-06-01", "end_date": "2024-06-05"}]
            },
            { "id": 2, "model": "City", "brand": "Honda", "price_per_day": 2100 }
        ]);
        let listings: Vec<CarListing> = serde_json::from_value(json).unwrap();
        let snapshot = normalize_catalog(listings);

        assert_eq!(snapshot.car(2).unwrap().brand, "Honda");
        assert!(snapshot.vehicle(2).unwrap().reservations.is_empty());
        assert_eq!(snapshot.vehicle(1).unwrap().reservations.len(), 1);
    }
}
