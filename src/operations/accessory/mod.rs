use nalgebra::Rotation3;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::host::PlacedInstance;
use crate::math::{PointKey, Vector3};
use crate::operations::emit::PlacementCommand;

/// Local offset of an accessory on its host piece.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AccessoryOffset {
    /// Distance along the host's rotation axis from its insertion point.
    pub along: f64,
    /// Distance to the left of the host's axis.
    #[serde(default)]
    pub across: f64,
    /// Height above the host's insertion point.
    pub height: f64,
}

/// Accessory set on every placed piece with one of `host_ids`.
///
/// Connectors and ties between panels, and brackets on corner posts, are all
/// rules of this shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessoryRule {
    pub host_ids: Vec<String>,
    pub accessory_id: String,
    pub offsets: Vec<AccessoryOffset>,
}

impl AccessoryRule {
    /// Returns `true` if the rule applies to pieces with `catalog_id`.
    #[must_use]
    pub fn matches(&self, catalog_id: &str) -> bool {
        self.host_ids.iter().any(|id| id == catalog_id)
    }
}

/// Places accessories on already placed hardware.
///
/// Offsets are turned by the host piece's rotation about the vertical axis.
/// Where two pieces share an accessory point, as neighbouring panels do at
/// their common edge, one accessory is placed.
#[derive(Debug)]
pub struct PlaceAccessories<'a> {
    instances: &'a [PlacedInstance],
    rules: &'a [AccessoryRule],
    scale: f64,
}

impl<'a> PlaceAccessories<'a> {
    #[must_use]
    pub fn new(instances: &'a [PlacedInstance], rules: &'a [AccessoryRule]) -> Self {
        Self {
            instances,
            rules,
            scale: 1.0,
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Executes the placement, in instance order.
    #[must_use]
    pub fn execute(&self) -> Vec<PlacementCommand> {
        let mut seen: FxHashSet<(PointKey, &str)> = FxHashSet::default();
        let mut commands = Vec::new();
        for inst in self.instances {
            let turn = Rotation3::from_axis_angle(&Vector3::z_axis(), inst.rotation);
            for rule in self.rules.iter().filter(|r| r.matches(&inst.catalog_id)) {
                for off in &rule.offsets {
                    let local = Vector3::new(off.along, off.across, off.height);
                    let position = inst.position + turn * local;
                    if seen.insert((PointKey::new(&position), rule.accessory_id.as_str())) {
                        commands.push(PlacementCommand::new(
                            rule.accessory_id.clone(),
                            position,
                            inst.rotation,
                            self.scale,
                        ));
                    }
                }
            }
        }
        tracing::debug!(
            hosts = self.instances.len(),
            accessories = commands.len(),
            "Accessories laid out"
        );
        commands
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn panel(id: &str, x: f64, y: f64, rotation: f64) -> PlacedInstance {
        PlacedInstance {
            position: Point3::new(x, y, 0.0),
            catalog_id: id.into(),
            rotation,
        }
    }

    fn edge_rule() -> AccessoryRule {
        AccessoryRule {
            host_ids: vec!["P600".into(), "P300".into()],
            accessory_id: "CLAMP".into(),
            offsets: vec![
                AccessoryOffset {
                    along: 0.0,
                    across: 0.0,
                    height: 300.0,
                },
                AccessoryOffset {
                    along: 600.0,
                    across: 0.0,
                    height: 300.0,
                },
            ],
        }
    }

    #[test]
    fn shared_edge_gets_one_accessory() {
        let instances = [panel("P600", 0.0, 0.0, 0.0), panel("P600", 600.0, 0.0, 0.0)];
        let rules = [edge_rule()];
        let cmds = PlaceAccessories::new(&instances, &rules).execute();
        let xs: Vec<f64> = cmds.iter().map(|c| c.position.x).collect();
        assert_eq!(xs, vec![0.0, 600.0, 1200.0]);
        assert!(cmds.iter().all(|c| (c.position.z - 300.0).abs() < 1e-9));
    }

    #[test]
    fn offsets_turn_with_the_host() {
        let instances = [panel("P600", 100.0, 100.0, FRAC_PI_2)];
        let rules = [edge_rule()];
        let cmds = PlaceAccessories::new(&instances, &rules).execute();
        assert_abs_diff_eq!(cmds[1].position, Point3::new(100.0, 700.0, 300.0), epsilon = 1e-9);
        assert_abs_diff_eq!(cmds[1].rotation, FRAC_PI_2);
    }

    #[test]
    fn near_coincident_points_deduplicate() {
        let instances = [
            panel("P600", 0.0, 0.0, 0.0),
            panel("P600", 600.000_000_1, 0.0, 0.0),
        ];
        let rules = [edge_rule()];
        assert_eq!(PlaceAccessories::new(&instances, &rules).execute().len(), 3);
    }

    #[test]
    fn unmatched_hosts_are_ignored() {
        let instances = [panel("POST", 0.0, 0.0, 0.0)];
        let rules = [edge_rule()];
        assert!(PlaceAccessories::new(&instances, &rules).execute().is_empty());
    }

    #[test]
    fn different_accessories_may_share_a_point() {
        let mut tie = edge_rule();
        tie.accessory_id = "TIE".into();
        let instances = [panel("P300", 0.0, 0.0, 0.0)];
        let rules = [edge_rule(), tie];
        assert_eq!(PlaceAccessories::new(&instances, &rules).execute().len(), 4);
    }

    #[test]
    fn rule_deserializes_with_default_across() {
        let rule: AccessoryRule = serde_json::from_str(
            r#"{"host_ids": ["OC1350"], "accessory_id": "BRK",
                "offsets": [{"along": 0.0, "height": 1000.0}]}"#,
        )
        .unwrap();
        assert!(rule.matches("OC1350"));
        assert!((rule.offsets[0].across).abs() < f64::EPSILON);
    }
}
