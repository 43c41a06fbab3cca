//! Rules-based tips used whenever the remote model is unavailable.
//!
//! This module carries its own factor table instead of reading the
//! calculator's, so a change there can never break the path that must
//! always produce a tip.

use std::collections::BTreeMap;

use footprint::{normalize_activity, ActivityQuantities};

/// (key, kg CO₂e per unit, targeted advice)
const LOCAL_FACTORS: &[(&str, f64, &str)] = &[
    // Energy
    (
        "electricity_kwh",
        0.233,
        "Reduce standby power: switch devices fully off, use smart strips, and swap to LED bulbs.",
    ),
    (
        "natural_gas_m3",
        2.03,
        "Lower heating setpoint by 1°C and seal drafts to cut gas use.",
    ),
    (
        "hot_water_liter",
        0.25,
        "Take shorter showers and wash clothes on cold to cut hot water.",
    ),
    (
        "cold_water_liter",
        0.075,
        "Fix leaks and install low-flow faucets to save water and energy.",
    ),
    (
        "district_heating_kwh",
        0.15,
        "Use a programmable thermostat and improve insulation to reduce heat demand.",
    ),
    (
        "propane_liter",
        1.51,
        "Service your boiler and optimize thermostat schedules to trim propane use.",
    ),
    (
        "fuel_oil_liter",
        2.52,
        "Schedule a boiler tune-up and improve home insulation to cut oil use.",
    ),
    // Transport
    (
        "petrol_liter",
        0.235,
        "Try car-pooling or public transport 1-2 days/week; keep tires properly inflated.",
    ),
    (
        "diesel_liter",
        0.268,
        "Combine errands into one trip and ease acceleration to save fuel.",
    ),
    (
        "bus_km",
        0.12,
        "Great choice using the bus; consider a weekly pass to keep it going.",
    ),
    (
        "train_km",
        0.14,
        "Nice! Train is low-carbon; can you replace a short car trip with train?",
    ),
    (
        "bicycle_km",
        0.0,
        "Awesome cycling; aim to replace one short car errand by bike this week.",
    ),
    (
        "flight_short_km",
        0.275,
        "Consider rail for short trips, or bundle meetings to reduce flight frequency.",
    ),
    (
        "flight_long_km",
        0.175,
        "Plan fewer long-haul flights; if needed, choose non-stop routes and economy seats.",
    ),
    // Meals
    (
        "meat_kg",
        27.0,
        "Try a meat-free day or swap red meat for chicken/plant-based options.",
    ),
    (
        "chicken_kg",
        6.9,
        "Balance meals with beans, lentils, and seasonal veggies a few times this week.",
    ),
    (
        "eggs_kg",
        4.8,
        "Source from local farms and add plant-based proteins to diversify.",
    ),
    (
        "dairy_kg",
        13.0,
        "Switch to plant milk for coffee/tea and try dairy-free snacks.",
    ),
    (
        "vegetarian_kg",
        2.0,
        "Great! Add pulses and whole grains for protein and nutrition.",
    ),
    (
        "vegan_kg",
        1.5,
        "Excellent! Keep variety with legumes, nuts, and B12-fortified foods.",
    ),
];

const ENERGY_KEYS: &[&str] = &[
    "electricity_kwh",
    "natural_gas_m3",
    "district_heating_kwh",
    "propane_liter",
    "fuel_oil_liter",
];

const TRANSPORT_KEYS: &[&str] = &[
    "petrol_liter",
    "diesel_liter",
    "bus_km",
    "train_km",
    "flight_short_km",
    "flight_long_km",
];

const MEAL_KEYS: &[&str] = &["meat_kg", "chicken_kg", "dairy_kg", "eggs_kg"];

/// Severity tier chosen from the day's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Moderate,
    Low,
}

impl Severity {
    /// > 60 kg high, > 25 kg moderate, otherwise low.
    pub fn from_emissions(kg: f64) -> Self {
        if kg > 60.0 {
            Self::High
        } else if kg > 25.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn preface(self) -> &'static str {
        match self {
            Self::High => "🚨 High footprint today.",
            Self::Moderate => "🌱 Moderate footprint today.",
            Self::Low => "🌍 Low footprint today, nice work!",
        }
    }
}

/// Category groups considered when no single activity stands out.
///
/// Listed in tie-break order: on equal totals the earlier group wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Transport,
    Energy,
    Meals,
}

impl Group {
    const TIE_BREAK_ORDER: [Group; 3] = [Group::Transport, Group::Energy, Group::Meals];

    fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Transport => TRANSPORT_KEYS,
            Self::Energy => ENERGY_KEYS,
            Self::Meals => MEAL_KEYS,
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Self::Transport => {
                "Transport dominates; plan a no-car day, try car-pooling, or take the bus/train for one commute."
            }
            Self::Energy => {
                "Energy dominates; set heating 1-2°C lower and switch off devices fully at night."
            }
            Self::Meals => {
                "Diet is a big lever; try a meat-free day and batch-cook plant-based meals this week."
            }
        }
    }
}

const GENERIC_ADVICE: &str =
    "Start small: one meat-free meal, one public-transport trip, and switch devices fully off tonight.";

fn local_factor(key: &str) -> Option<(f64, &'static str)> {
    LOCAL_FACTORS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, factor, advice)| (*factor, *advice))
}

/// Per-key contribution in kg, in canonical key order. Labels that
/// normalize to the same key are summed; unknown keys are dropped.
fn local_contributions(quantities: &ActivityQuantities) -> Vec<(String, f64)> {
    let mut merged: BTreeMap<String, f64> = BTreeMap::new();
    for (label, amount) in quantities {
        let key = normalize_activity(label);
        if let Some((factor, _)) = local_factor(&key) {
            *merged.entry(key).or_insert(0.0) += amount.effective() * factor;
        }
    }
    merged.into_iter().collect()
}

/// Build a deterministic tip for the day.
///
/// Names the largest positive contributor with targeted advice when there is
/// one; otherwise falls back to the dominant category, then to a generic
/// tip. Never empty. The emissions total only selects the severity preface.
pub fn local_tip(quantities: &ActivityQuantities, emissions: f64) -> String {
    let contributions = local_contributions(quantities);
    let preface = Severity::from_emissions(emissions).preface();

    let mut largest: Option<(&str, f64)> = None;
    for (key, kg) in &contributions {
        if *kg > largest.map_or(0.0, |(_, best)| best) {
            largest = Some((key.as_str(), *kg));
        }
    }

    if let Some((key, _)) = largest {
        if let Some((_, advice)) = local_factor(key) {
            return format!(
                "{preface} Biggest source: {}. Tip: {advice}",
                key.replace('_', " ")
            );
        }
    }

    match dominant_group(&contributions) {
        Some(group) => format!("{preface} {}", group.advice()),
        None => format!("{preface} {GENERIC_ADVICE}"),
    }
}

/// Group with the largest positive total, ties going to the earlier group
/// in [`Group::TIE_BREAK_ORDER`].
fn dominant_group(contributions: &[(String, f64)]) -> Option<Group> {
    let group_total = |group: Group| -> f64 {
        contributions
            .iter()
            .filter(|(key, _)| group.keys().contains(&key.as_str()))
            .map(|(_, kg)| kg)
            .sum()
    };

    let mut dominant: Option<(Group, f64)> = None;
    for group in Group::TIE_BREAK_ORDER {
        let total = group_total(group);
        if total > dominant.map_or(0.0, |(_, best)| best) {
            dominant = Some((group, total));
        }
    }
    dominant.map(|(group, _)| group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint::{quantities, Amount, FACTORS};

    #[test]
    fn test_local_tip_picks_largest_emitter() {
        let day = quantities([("meat_kg", 1.0), ("electricity_kwh", 1.0), ("bus_km", 1.0)]);
        let tip = local_tip(&day, 40.0);
        assert!(tip.to_lowercase().contains("meat"));
        assert!(tip.starts_with("🌱 Moderate footprint today."));
    }

    #[test]
    fn test_local_tip_targets_electricity_when_dominant() {
        let day = quantities([("electricity_kwh", 20.0), ("bus_km", 1.0), ("meat_kg", 0.05)]);
        let tip = local_tip(&day, 10.0);
        assert!(tip.contains("Biggest source: electricity kwh."));
        assert!(tip.to_lowercase().contains("standby"));
        assert!(tip.starts_with("🌍"));
    }

    #[test]
    fn test_local_tip_targets_district_heating() {
        let day = quantities([
            ("district_heating_kwh", 30.0),
            ("electricity_kwh", 1.0),
            ("bus_km", 0.0),
        ]);
        let tip = local_tip(&day, 20.0);
        assert!(tip.contains("district heating kwh"));
        assert!(tip.contains("thermostat") || tip.contains("insulation"));
    }

    #[test]
    fn test_local_tip_accepts_free_form_labels() {
        let day = quantities([("Petrol (liter)", 8.0), ("Electricity kWh", 1.0)]);
        let tip = local_tip(&day, 30.0);
        assert!(tip.contains("Biggest source: petrol liter."));
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(Severity::from_emissions(60.01), Severity::High);
        assert_eq!(Severity::from_emissions(60.0), Severity::Moderate);
        assert_eq!(Severity::from_emissions(25.01), Severity::Moderate);
        assert_eq!(Severity::from_emissions(25.0), Severity::Low);
        assert_eq!(Severity::from_emissions(f64::NAN), Severity::Low);
        assert!(local_tip(&ActivityQuantities::new(), 99.0).starts_with("🚨"));
    }

    #[test]
    fn test_all_zero_gives_generic_tip() {
        let day = quantities([("electricity_kwh", 0.0), ("bus_km", 0.0), ("meat_kg", 0.0)]);
        let tip = local_tip(&day, 0.0);
        assert!(tip.contains("Start small"));
        assert!(tip.starts_with("🌍"));
    }

    #[test]
    fn test_zero_factor_activity_is_not_a_largest_source() {
        let day = quantities([("bicycle_km", 25.0)]);
        let tip = local_tip(&day, 0.0);
        assert!(!tip.contains("Biggest source"));
        assert!(tip.contains("Start small"));
    }

    #[test]
    fn test_invalid_amounts_count_as_zero() {
        let day = quantities([
            ("meat_kg", Amount::from("lots")),
            ("dairy_kg", Amount::from(-2)),
            ("train_km", Amount::from(10)),
        ]);
        let tip = local_tip(&day, 1.4);
        assert!(tip.contains("Biggest source: train km."));
    }

    #[test]
    fn test_unknown_activities_are_ignored() {
        let day = quantities([("jetpack_km", 500.0)]);
        let tip = local_tip(&day, 0.0);
        assert!(tip.contains("Start small"));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        // 27 kg dairy and 13 kg meat both contribute exactly 351 kg; dairy
        // sorts first.
        let day = quantities([("meat_kg", 13.0), ("dairy_kg", 27.0)]);
        let tip = local_tip(&day, 702.0);
        assert!(tip.contains("Biggest source: dairy kg."));
    }

    #[test]
    fn test_ties_follow_canonical_key_order() {
        // "Meat kg" sorts before "dairy_kg" as a raw label, but dairy_kg
        // comes first as a canonical key.
        let day = quantities([("Meat kg", 13.0), ("dairy_kg", 27.0)]);
        let tip = local_tip(&day, 702.0);
        assert!(tip.contains("Biggest source: dairy kg."), "{tip}");
    }

    #[test]
    fn test_labels_with_same_key_are_merged() {
        // Two 0.6 kg bus entries beat 0.932 kg of electricity only when summed.
        let day = quantities([("Bus km", 5.0), ("bus_km", 5.0), ("electricity_kwh", 4.0)]);
        let tip = local_tip(&day, 2.1);
        assert!(tip.contains("Biggest source: bus km."), "{tip}");
        let merged = local_contributions(&day);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].0, "bus_km");
        assert!((merged[0].1 - 1.2).abs() < 1e-9);
    }

    fn kg(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_dominant_group_picks_largest() {
        let contributions = kg(&[("electricity_kwh", 3.0), ("bus_km", 1.0), ("meat_kg", 2.0)]);
        assert_eq!(dominant_group(&contributions), Some(Group::Energy));

        let contributions = kg(&[("dairy_kg", 5.0), ("petrol_liter", 1.0)]);
        assert_eq!(dominant_group(&contributions), Some(Group::Meals));
    }

    #[test]
    fn test_dominant_group_tie_break_order() {
        let contributions = kg(&[("electricity_kwh", 2.0), ("train_km", 2.0), ("eggs_kg", 2.0)]);
        assert_eq!(dominant_group(&contributions), Some(Group::Transport));

        let contributions = kg(&[("electricity_kwh", 2.0), ("eggs_kg", 2.0)]);
        assert_eq!(dominant_group(&contributions), Some(Group::Energy));
    }

    #[test]
    fn test_dominant_group_ignores_ungrouped_keys() {
        // Water, cycling and plant-based meals sit outside every group.
        let contributions = kg(&[("hot_water_liter", 9.0), ("vegan_kg", 4.0)]);
        assert_eq!(dominant_group(&contributions), None);
        assert_eq!(dominant_group(&[]), None);
    }

    #[test]
    fn test_every_calculator_key_has_local_advice() {
        for f in FACTORS {
            let (factor, advice) = local_factor(f.key).expect(f.key);
            assert_eq!(factor, f.kg_per_unit, "{}", f.key);
            assert!(!advice.is_empty());
        }
        assert_eq!(LOCAL_FACTORS.len(), FACTORS.len());
    }

    #[test]
    fn test_local_tip_never_empty() {
        let days = [
            ActivityQuantities::new(),
            quantities([("x", Amount::Missing)]),
            quantities([("meat_kg", 1.0)]),
        ];
        for day in &days {
            for emissions in [0.0, 30.0, 80.0, -5.0, f64::INFINITY] {
                assert!(!local_tip(day, emissions).trim().is_empty());
            }
        }
    }
}
