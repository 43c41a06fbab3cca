//! Emission factor table.
//!
//! Factors are kg CO₂-equivalent per unit of activity. They are illustrative
//! averages and fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Broad grouping of activities, used for category subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Energy,
    Transport,
    Meals,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Energy, Category::Transport, Category::Meals];

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Transport => "Transport",
            Self::Meals => "Meals",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Energy => write!(f, "energy"),
            Self::Transport => write!(f, "transport"),
            Self::Meals => write!(f, "meals"),
        }
    }
}

/// One row of the factor table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactor {
    /// Canonical activity key.
    pub key: &'static str,
    /// kg CO₂e per unit.
    pub kg_per_unit: f64,
    /// Unit the amount is expressed in.
    pub unit: &'static str,
    pub category: Category,
}

const fn factor(
    key: &'static str,
    kg_per_unit: f64,
    unit: &'static str,
    category: Category,
) -> EmissionFactor {
    EmissionFactor {
        key,
        kg_per_unit,
        unit,
        category,
    }
}

/// The fixed factor table, grouped energy → transport → meals.
pub const FACTORS: &[EmissionFactor] = &[
    // Energy
    factor("electricity_kwh", 0.233, "kWh", Category::Energy),
    factor("natural_gas_m3", 2.03, "m³", Category::Energy),
    factor("hot_water_liter", 0.25, "liter", Category::Energy),
    factor("cold_water_liter", 0.075, "liter", Category::Energy),
    factor("district_heating_kwh", 0.15, "kWh", Category::Energy),
    factor("propane_liter", 1.51, "liter", Category::Energy),
    factor("fuel_oil_liter", 2.52, "liter", Category::Energy),
    // Transport
    factor("petrol_liter", 0.235, "liter", Category::Transport),
    factor("diesel_liter", 0.268, "liter", Category::Transport),
    factor("bus_km", 0.12, "km", Category::Transport),
    factor("train_km", 0.14, "km", Category::Transport),
    factor("bicycle_km", 0.0, "km", Category::Transport),
    factor("flight_short_km", 0.275, "km", Category::Transport),
    factor("flight_long_km", 0.175, "km", Category::Transport),
    // Meals (food mass consumed)
    factor("meat_kg", 27.0, "kg", Category::Meals),
    factor("chicken_kg", 6.9, "kg", Category::Meals),
    factor("eggs_kg", 4.8, "kg", Category::Meals),
    factor("dairy_kg", 13.0, "kg", Category::Meals),
    factor("vegetarian_kg", 2.0, "kg", Category::Meals),
    factor("vegan_kg", 1.5, "kg", Category::Meals),
];

/// Look up a factor by canonical key. The key is not normalized here.
pub fn factor_for(key: &str) -> Option<&'static EmissionFactor> {
    FACTORS.iter().find(|f| f.key == key)
}

/// Factors belonging to `category`, in table order.
pub fn factors_in(category: Category) -> impl Iterator<Item = &'static EmissionFactor> {
    FACTORS.iter().filter(move |f| f.category == category)
}
