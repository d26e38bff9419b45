//! Default catalog of gym machines.
//!
//! The catalog is fixed: machines are not recommended or added at runtime.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of machines
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn machine(
    id: &str,
    name: &str,
    body_part: &str,
    range: (u32, u32),
    default_sets: u32,
    default_rest_time_seconds: u32,
) -> Machine {
    Machine {
        id: id.into(),
        name: name.into(),
        body_part: body_part.into(),
        weight_range: WeightRange::new(range.0, range.1),
        default_sets,
        default_rest_time_seconds,
    }
}

fn build_default_catalog_internal() -> Catalog {
    Catalog::new(vec![
        // Pecs: moderate rest
        machine("chest_press", "Chest Press", "chest", (20, 80), 3, 90),
        machine("lat_pull", "Lat Pulldown", "back", (15, 60), 3, 90),
        // Large leg muscles need the longest recovery
        machine("leg_press", "Leg Press", "legs", (40, 120), 3, 120),
        machine("shoulder_press", "Shoulder Press", "shoulders", (10, 50), 3, 75),
        machine("bicep_curl", "Bicep Curl", "arms", (5, 30), 3, 60),
        machine("leg_extension", "Leg Extension", "quadriceps", (20, 80), 3, 90),
    ])
}

impl Catalog {
    /// Build a catalog from machine definitions, keeping their order for display
    pub fn new(machines: Vec<Machine>) -> Self {
        let order = machines.iter().map(|m| m.id.clone()).collect();
        let machines = machines
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect::<HashMap<_, _>>();
        Self { machines, order }
    }

    pub fn get(&self, id: &str) -> Option<&Machine> {
        self.machines.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.machines.contains_key(id)
    }

    /// Machines in display order
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.order.iter().filter_map(|id| self.machines.get(id))
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, machine) in &self.machines {
            if id.is_empty() || machine.id.is_empty() {
                errors.push("Machine has empty ID".to_string());
            }
            if id != &machine.id {
                errors.push(format!(
                    "Machine key '{}' doesn't match machine.id '{}'",
                    id, machine.id
                ));
            }
            if machine.name.is_empty() {
                errors.push(format!("Machine '{}' has empty name", id));
            }
            if machine.weight_range.min > machine.weight_range.max {
                errors.push(format!(
                    "Machine '{}': min weight {} > max {}",
                    id, machine.weight_range.min, machine.weight_range.max
                ));
            }
            if machine.default_sets == 0 {
                errors.push(format!("Machine '{}' has zero default sets", id));
            }
            if machine.default_rest_time_seconds == 0 {
                errors.push(format!("Machine '{}' has zero default rest time", id));
            }
        }

        if self.order.len() != self.machines.len() {
            errors.push(format!(
                "Catalog order lists {} machines but {} are defined (duplicate IDs?)",
                self.order.len(),
                self.machines.len()
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.machines.len(), 6);
        assert_eq!(catalog.order.len(), 6);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_machines_in_display_order() {
        let catalog = get_default_catalog();
        let ids: Vec<_> = catalog.machines().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "chest_press",
                "lat_pull",
                "leg_press",
                "shoulder_press",
                "bicep_curl",
                "leg_extension"
            ]
        );
    }

    #[test]
    fn test_known_ranges() {
        let catalog = get_default_catalog();
        assert_eq!(
            catalog.get("chest_press").unwrap().weight_range,
            WeightRange::new(20, 80)
        );
        assert_eq!(
            catalog.get("bicep_curl").unwrap().weight_range,
            WeightRange::new(5, 30)
        );
        assert_eq!(
            catalog.get("leg_press").unwrap().default_rest_time_seconds,
            120
        );
        assert!(catalog.get("rowing_machine").is_none());
    }

    #[test]
    fn test_validate_flags_bad_machine() {
        let catalog = Catalog::new(vec![
            machine("bad", "", "legs", (50, 10), 0, 0),
            machine("bad", "Duplicate", "legs", (10, 50), 3, 60),
        ]);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("duplicate IDs")));

        let catalog = Catalog::new(vec![machine("bad", "", "legs", (50, 10), 0, 0)]);
        let errors = catalog.validate();
        assert_eq!(errors.len(), 4, "{:?}", errors);
    }
}
