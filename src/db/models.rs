use std::str::FromStr;
use thiserror::Error as ThisError;

/// Status values accepted by `bookings_status_check`, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    DocumentationPrepared,
    ShipmentFinalised,
    PickupArranged,
    ArrivedHubOrigin,
    SortedToDestination,
    InTransitToDestination,
    ArrivedDepotDestination,
    ReleasedFromCustoms,
    Delivered,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 11] = [
        BookingStatus::Pending,
        BookingStatus::DocumentationPrepared,
        BookingStatus::ShipmentFinalised,
        BookingStatus::PickupArranged,
        BookingStatus::ArrivedHubOrigin,
        BookingStatus::SortedToDestination,
        BookingStatus::InTransitToDestination,
        BookingStatus::ArrivedDepotDestination,
        BookingStatus::ReleasedFromCustoms,
        BookingStatus::Delivered,
        BookingStatus::Cancelled,
    ];

    /// Literal stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::DocumentationPrepared => "Documentation Prepared",
            BookingStatus::ShipmentFinalised => "Shipment Finalised",
            BookingStatus::PickupArranged => "Pickup Arranged",
            BookingStatus::ArrivedHubOrigin => "Arrived Hub (Origin)",
            BookingStatus::SortedToDestination => "Sorted to Destination",
            BookingStatus::InTransitToDestination => "In Transit to Destination",
            BookingStatus::ArrivedDepotDestination => "Arrived Depot (Destination)",
            BookingStatus::ReleasedFromCustoms => "Released from Customs",
            BookingStatus::Delivered => "Delivered",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown status: {0:?}")]
pub struct UnknownStatus(pub String);

/// Pre-migration status values still present in old rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyStatus {
    Pending,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl LegacyStatus {
    pub const ALL: [LegacyStatus; 5] = [
        LegacyStatus::Pending,
        LegacyStatus::Confirmed,
        LegacyStatus::InTransit,
        LegacyStatus::Delivered,
        LegacyStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegacyStatus::Pending => "pending",
            LegacyStatus::Confirmed => "confirmed",
            LegacyStatus::InTransit => "in_transit",
            LegacyStatus::Delivered => "delivered",
            LegacyStatus::Cancelled => "cancelled",
        }
    }

    /// Status a legacy row is rewritten to.
    pub fn target(self) -> BookingStatus {
        match self {
            LegacyStatus::Pending => BookingStatus::Pending,
            LegacyStatus::Confirmed => BookingStatus::DocumentationPrepared,
            LegacyStatus::InTransit => BookingStatus::InTransitToDestination,
            LegacyStatus::Delivered => BookingStatus::Delivered,
            LegacyStatus::Cancelled => BookingStatus::Cancelled,
        }
    }
}

impl FromStr for LegacyStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LegacyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Value a `status` cell holds after the backfill `UPDATE`.
/// Matching is exact (case-sensitive); anything else is returned unchanged.
pub fn backfill_status(status: &str) -> &str {
    match status.parse::<LegacyStatus>() {
        Ok(legacy) => legacy.target().as_str(),
        Err(_) => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{STATUS_CONSTRAINT_FIX, STATUS_CONSTRAINT_NAME};

    /// Minimal stand-in for the `bookings` table: the check constraint (if
    /// any) and the status column of each row.
    #[derive(Debug, Clone, PartialEq)]
    struct BookingsTable {
        constraint: Option<Vec<&'static str>>,
        statuses: Vec<String>,
    }

    impl BookingsTable {
        fn apply_fix(&mut self) {
            // DROP CONSTRAINT IF EXISTS
            self.constraint = None;
            // ADD CONSTRAINT
            self.constraint = Some(BookingStatus::ALL.iter().map(|s| s.as_str()).collect());
            // guarded UPDATE
            for status in self.statuses.iter_mut() {
                let next = backfill_status(status).to_string();
                *status = next;
            }
        }
    }

    #[test]
    fn legacy_values_map_to_new_literals() {
        let expected = [
            ("pending", "Pending"),
            ("confirmed", "Documentation Prepared"),
            ("in_transit", "In Transit to Destination"),
            ("delivered", "Delivered"),
            ("cancelled", "Cancelled"),
        ];
        for (old, new) in expected {
            assert_eq!(backfill_status(old), new, "legacy value {old}");
        }
    }

    #[test]
    fn non_legacy_values_are_left_alone() {
        for status in [
            "Pending",
            "Shipment Finalised",
            "PENDING",
            "Confirmed",
            "in transit",
            "",
            "shipped",
        ] {
            assert_eq!(backfill_status(status), status);
        }
    }

    #[test]
    fn applying_the_fix_twice_matches_applying_it_once() {
        let sample = vec![
            "pending".to_string(),
            "confirmed".to_string(),
            "in_transit".to_string(),
            "Delivered".to_string(),
            "cancelled".to_string(),
            "Pickup Arranged".to_string(),
            "mystery".to_string(),
        ];
        let mut once = BookingsTable {
            constraint: Some(vec!["pending", "confirmed"]),
            statuses: sample.clone(),
        };
        once.apply_fix();

        let mut twice = BookingsTable {
            constraint: Some(vec!["pending", "confirmed"]),
            statuses: sample,
        };
        twice.apply_fix();
        twice.apply_fix();

        assert_eq!(once, twice);
        assert_eq!(
            once.statuses,
            vec![
                "Pending",
                "Documentation Prepared",
                "In Transit to Destination",
                "Delivered",
                "Cancelled",
                "Pickup Arranged",
                "mystery",
            ]
        );
    }

    #[test]
    fn every_legacy_target_satisfies_the_new_constraint() {
        for legacy in LegacyStatus::ALL {
            assert!(BookingStatus::ALL.contains(&legacy.target()));
        }
    }

    #[test]
    fn script_lists_exactly_the_booking_statuses() {
        let check = STATUS_CONSTRAINT_FIX
            .split("CHECK (status IN (")
            .nth(1)
            .and_then(|rest| rest.split("))").next())
            .expect("CHECK clause present");
        let listed: Vec<&str> = check
            .split(',')
            .map(|v| v.trim().trim_matches('\''))
            .collect();
        let expected: Vec<&str> = BookingStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(listed, expected);
        assert!(STATUS_CONSTRAINT_FIX.contains(&format!(
            "DROP CONSTRAINT IF EXISTS {STATUS_CONSTRAINT_NAME};"
        )));
    }

    #[test]
    fn script_backfill_matches_legacy_mapping() {
        for legacy in LegacyStatus::ALL {
            let arm = format!(
                "WHEN status = '{}' THEN '{}'",
                legacy.as_str(),
                legacy.target().as_str()
            );
            assert!(STATUS_CONSTRAINT_FIX.contains(&arm), "missing arm: {arm}");
        }
        let guard: Vec<String> = LegacyStatus::ALL
            .iter()
            .map(|l| format!("'{}'", l.as_str()))
            .collect();
        assert!(STATUS_CONSTRAINT_FIX.contains(&format!(
            "WHERE status IN ({});",
            guard.join(", ")
        )));
    }

    #[test]
    fn legacy_parsing_is_exact() {
        assert_eq!("in_transit".parse::<LegacyStatus>(), Ok(LegacyStatus::InTransit));
        assert_eq!(
            "In_Transit".parse::<LegacyStatus>(),
            Err(UnknownStatus("In_Transit".to_string()))
        );
    }
}
