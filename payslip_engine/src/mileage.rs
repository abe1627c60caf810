//! Mileage claims: journeys, per-vehicle rates and the claim payload.

use crate::calc::{mileage_reimbursement, sanitize_amount};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Rate per kilometre used when a vehicle type has no usable rate.
pub const DEFAULT_RATE_PER_KM: f64 = 0.5;

/// Kind of vehicle driven; selects the rate per kilometre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    PersonalCar,
    CompanyCar,
    Rental,
}

/// Rate-per-km lookup keyed by vehicle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MileageRateTable {
    /// Used for vehicle types with no entry, or a non-positive one.
    pub default_rate: f64,
    /// Per-vehicle overrides, in currency per kilometre.
    pub rates: BTreeMap<VehicleType, f64>,
}

impl Default for MileageRateTable {
    fn default() -> Self {
        Self {
            default_rate: DEFAULT_RATE_PER_KM,
            rates: BTreeMap::new(),
        }
    }
}

impl MileageRateTable {
    /// A missing or zero rate falls back to the default rate.
    pub fn rate_for(&self, vehicle: VehicleType) -> f64 {
        match self.rates.get(&vehicle) {
            Some(rate) if *rate > 0.0 => *rate,
            _ => self.default_rate,
        }
    }
}

/// A single point-to-point journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageJourney {
    /// Client-side identifier; never sent with the claim.
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "journeyDate")]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "fromLocation")]
    pub from: String,
    #[serde(default, alias = "toLocation")]
    pub to: String,
    #[serde(default)]
    pub purpose: String,
    /// One-way distance.
    pub distance_km: f64,
    /// Doubles the distance when set.
    #[serde(default)]
    pub round_trip: bool,
}

impl MileageJourney {
    pub fn new(distance_km: f64, round_trip: bool) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            date: None,
            from: String::new(),
            to: String::new(),
            purpose: String::new(),
            distance_km,
            round_trip,
        }
    }

    /// Distance actually driven: round trips count twice.
    pub fn effective_distance(&self) -> f64 {
        if self.round_trip {
            self.distance_km * 2.0
        } else {
            self.distance_km
        }
    }
}

/// A journey as the expense claim endpoint stores it.  The client id
/// stays on the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journey_date: Option<NaiveDate>,
    pub from_location: String,
    pub to_location: String,
    pub purpose: String,
    pub distance_km: f64,
    pub round_trip: bool,
}

impl From<&MileageJourney> for JourneyPayload {
    fn from(journey: &MileageJourney) -> Self {
        Self {
            journey_date: journey.date,
            from_location: journey.from.clone(),
            to_location: journey.to.clone(),
            purpose: journey.purpose.clone(),
            distance_km: journey.distance_km,
            round_trip: journey.round_trip,
        }
    }
}

/// Derived mileage figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageTotals {
    /// Sum of effective distances.
    pub total_distance: f64,
    /// `total_distance * rate`, unrounded.
    pub amount: f64,
}

/// Partial update applied to a journey; `None` fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyUpdate {
    pub date: Option<NaiveDate>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub purpose: Option<String>,
    pub distance_km: Option<f64>,
    pub round_trip: Option<bool>,
}

/// In-memory mileage section of an expense claim being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageClaimDraft {
    #[serde(default)]
    pub vehicle_type: VehicleType,
    /// Free text; omitted from the claim when blank.
    #[serde(default)]
    pub vehicle_plate: String,
    #[serde(default)]
    pub journeys: Vec<MileageJourney>,
}

/// Mileage section as sent to the expense claim endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageClaim {
    pub journeys: Vec<JourneyPayload>,
    pub total_distance: f64,
    /// Rate resolved for the vehicle type.
    pub rate_per_km: f64,
    /// Reimbursement amount, `total_distance * rate_per_km`.
    pub total_mileage_amount: f64,
    pub vehicle_type: VehicleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
}

impl MileageClaimDraft {
    pub fn new(vehicle_type: VehicleType) -> Self {
        Self {
            vehicle_type,
            ..Self::default()
        }
    }

    /// Appends a blank one-way journey and returns its id.
    pub fn add_journey(&mut self) -> String {
        let journey = MileageJourney::new(0.0, false);
        let id = journey.id.clone();
        self.journeys.push(journey);
        id
    }

    /// Returns `false` if no journey has the given id.
    pub fn update_journey(&mut self, id: &str, update: JourneyUpdate) -> bool {
        let Some(journey) = self.journeys.iter_mut().find(|j| j.id == id) else {
            return false;
        };
        if let Some(date) = update.date {
            journey.date = Some(date);
        }
        if let Some(from) = update.from {
            journey.from = from;
        }
        if let Some(to) = update.to {
            journey.to = to;
        }
        if let Some(purpose) = update.purpose {
            journey.purpose = purpose;
        }
        if let Some(distance) = update.distance_km {
            journey.distance_km = sanitize_amount(distance);
        }
        if let Some(round_trip) = update.round_trip {
            journey.round_trip = round_trip;
        }
        true
    }

    /// Zeroes negative or non-finite distances on journeys that did not
    /// come through [`update_journey`](Self::update_journey).
    pub fn sanitize(&mut self) {
        for journey in &mut self.journeys {
            journey.distance_km = sanitize_amount(journey.distance_km);
        }
    }

    pub fn remove_journey(&mut self, id: &str) {
        self.journeys.retain(|j| j.id != id);
    }

    pub fn totals(&self, rates: &MileageRateTable) -> MileageTotals {
        mileage_reimbursement(&self.journeys, rates.rate_for(self.vehicle_type))
    }

    pub fn to_claim(&self, rates: &MileageRateTable) -> MileageClaim {
        let rate_per_km = rates.rate_for(self.vehicle_type);
        let totals = mileage_reimbursement(&self.journeys, rate_per_km);
        let plate = self.vehicle_plate.trim();
        MileageClaim {
            journeys: self.journeys.iter().map(JourneyPayload::from).collect(),
            total_distance: totals.total_distance,
            rate_per_km,
            total_mileage_amount: totals.amount,
            vehicle_type: self.vehicle_type,
            vehicle_plate: (!plate.is_empty()).then(|| plate.to_string()),
        }
    }
}
