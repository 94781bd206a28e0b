//! Listing vocabulary: room types, amenities, addresses and search filters.

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;
use crate::types::define_text_enum;

define_text_enum! {
    /// How a listing's rooms are shared.
    RoomType ("room type") {
        Single = "single",
        Shared = "shared",
        Dormitory = "dormitory",
    }
}

impl RoomType {
    pub fn display_name(self) -> &'static str {
        match self {
            RoomType::Single => "Single Room",
            RoomType::Shared => "Shared Room",
            RoomType::Dormitory => "Dormitory",
        }
    }
}

define_text_enum! {
    /// A facility offered by a listing.
    Amenity ("amenity") {
        Wifi = "wifi",
        Ac = "ac",
        Parking = "parking",
        Laundry = "laundry",
        Meals = "meals",
        Gym = "gym",
        Security = "security",
        PowerBackup = "power_backup",
        HotWater = "hot_water",
        Refrigerator = "refrigerator",
        Tv = "tv",
        StudyRoom = "study_room",
    }
}

impl Amenity {
    pub fn display_name(self) -> &'static str {
        match self {
            Amenity::Wifi => "Wi-Fi",
            Amenity::Ac => "Air Conditioning",
            Amenity::Parking => "Parking",
            Amenity::Laundry => "Laundry",
            Amenity::Meals => "Meals",
            Amenity::Gym => "Gym",
            Amenity::Security => "24/7 Security",
            Amenity::PowerBackup => "Power Backup",
            Amenity::HotWater => "Hot Water",
            Amenity::Refrigerator => "Refrigerator",
            Amenity::Tv => "TV",
            Amenity::StudyRoom => "Study Room",
        }
    }
}

/// A de-duplicated set of amenities, stored as a TEXT[] column.
///
/// Insertion order is preserved so listings render amenities the way the
/// owner entered them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Amenity>", into = "Vec<Amenity>")]
pub struct AmenitySet(Vec<Amenity>);

impl AmenitySet {
    pub fn new(items: impl IntoIterator<Item = Amenity>) -> Self {
        let mut set = Vec::new();
        for item in items {
            if !set.contains(&item) {
                set.push(item);
            }
        }
        Self(set)
    }

    pub fn contains(&self, amenity: Amenity) -> bool {
        self.0.contains(&amenity)
    }

    /// True when every amenity in `required` is present in this set.
    pub fn contains_all(&self, required: &[Amenity]) -> bool {
        required.iter().all(|a| self.contains(*a))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Amenity] {
        &self.0
    }

    /// Text values for binding to a TEXT[] parameter.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|a| a.as_str().to_string()).collect()
    }
}

impl From<Vec<Amenity>> for AmenitySet {
    fn from(items: Vec<Amenity>) -> Self {
        Self::new(items)
    }
}

impl From<AmenitySet> for Vec<Amenity> {
    fn from(set: AmenitySet) -> Self {
        set.0
    }
}

impl TryFrom<Vec<String>> for AmenitySet {
    type Error = UnknownVariant;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        values
            .iter()
            .map(|v| v.parse::<Amenity>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

/// Postal address of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Address {
    /// Single-line rendering, e.g. `"12 MG Road, Bengaluru, Karnataka - 560001"`.
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.street, self.city, self.state, self.pincode
        )
    }
}

/// Tenant-facing listing search.
///
/// `max_rent`, `room_type` and `city` are pushed into the SQL predicate.
/// `amenities` (all must be present) and the free-text `q` are applied after
/// the fetch via [`ListingFilter::matches_client_side`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub max_rent: Option<f64>,
    pub room_type: Option<RoomType>,
    pub city: Option<String>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    pub q: Option<String>,
}

impl ListingFilter {
    /// `city` with surrounding whitespace removed; blank means "any city".
    pub fn city_predicate(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// The post-query part of the filter.
    pub fn matches_client_side(&self, title: &str, address: &Address, amenities: &AmenitySet) -> bool {
        if !amenities.contains_all(&self.amenities) {
            return false;
        }
        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                title.to_lowercase().contains(&needle)
                    || address.city.to_lowercase().contains(&needle)
                    || address.full_address().to_lowercase().contains(&needle)
            }
        }
    }
}

/// Tenants only ever see listings that an admin approved and the owner keeps active.
pub fn is_visible_to_tenants(is_approved: bool, is_active: bool) -> bool {
    is_approved && is_active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            street: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn amenity_text_values_match_storage() {
        assert_eq!(Amenity::PowerBackup.as_str(), "power_backup");
        assert_eq!(Amenity::StudyRoom.as_str(), "study_room");
        assert_eq!("hot_water".parse::<Amenity>().unwrap(), Amenity::HotWater);
        assert_eq!(Amenity::ALL.len(), 12);
    }

    #[test]
    fn amenity_set_deduplicates_and_keeps_order() {
        let set = AmenitySet::new([Amenity::Wifi, Amenity::Gym, Amenity::Wifi]);
        assert_eq!(set.as_slice(), &[Amenity::Wifi, Amenity::Gym]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn amenity_set_decodes_from_text_array() {
        let set = AmenitySet::try_from(vec!["wifi".to_string(), "meals".to_string()]).unwrap();
        assert!(set.contains(Amenity::Meals));
        assert_eq!(set.to_strings(), vec!["wifi", "meals"]);

        let err = AmenitySet::try_from(vec!["pool".to_string()]).unwrap_err();
        assert_eq!(err.kind, "amenity");
    }

    #[test]
    fn amenity_superset_filter() {
        let present = AmenitySet::new([Amenity::Wifi, Amenity::Ac, Amenity::Meals]);
        assert!(present.contains_all(&[]));
        assert!(present.contains_all(&[Amenity::Wifi, Amenity::Meals]));
        assert!(!present.contains_all(&[Amenity::Wifi, Amenity::Gym]));
    }

    #[test]
    fn full_address_format() {
        assert_eq!(
            address().full_address(),
            "12 MG Road, Bengaluru, Karnataka - 560001"
        );
    }

    #[test]
    fn text_search_covers_title_city_and_address() {
        let amenities = AmenitySet::default();
        let filter = |q: &str| ListingFilter {
            q: Some(q.to_string()),
            ..Default::default()
        };

        assert!(filter("cozy").matches_client_side("Cozy PG", &address(), &amenities));
        assert!(filter("bengaluru").matches_client_side("Nest", &address(), &amenities));
        assert!(filter("560001").matches_client_side("Nest", &address(), &amenities));
        assert!(!filter("mumbai").matches_client_side("Nest", &address(), &amenities));
        assert!(filter("   ").matches_client_side("Nest", &address(), &amenities));
    }

    #[test]
    fn amenity_filter_requires_every_amenity() {
        let filter = ListingFilter {
            amenities: vec![Amenity::Wifi, Amenity::Laundry],
            ..Default::default()
        };
        let partial = AmenitySet::new([Amenity::Wifi]);
        let full = AmenitySet::new([Amenity::Laundry, Amenity::Wifi, Amenity::Tv]);
        assert!(!filter.matches_client_side("A", &address(), &partial));
        assert!(filter.matches_client_side("A", &address(), &full));
    }

    #[test]
    fn blank_city_means_any_city() {
        let filter = ListingFilter {
            city: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(filter.city_predicate(), None);

        let filter = ListingFilter {
            city: Some(" Pune ".into()),
            ..Default::default()
        };
        assert_eq!(filter.city_predicate(), Some("Pune"));
    }

    #[test]
    fn visibility_requires_approval_and_activity() {
        assert!(is_visible_to_tenants(true, true));
        assert!(!is_visible_to_tenants(false, true));
        assert!(!is_visible_to_tenants(true, false));
        assert!(!is_visible_to_tenants(false, false));
    }
}
