//! One sequential sweep over the gym catalog.

use crate::store::Reading;
use chrono::Local;
use gymgroup_client::{GymClientError, OccupancySource};
use std::collections::BTreeMap;

/// Poll every gym in the catalog once, in order, and timestamp each answer.
///
/// Gyms whose query comes back empty (the portal's soft non-200 signal) are
/// logged and skipped; transport errors abort the sweep.
pub async fn sweep_catalog<S: OccupancySource>(
    source: &S,
    catalog: &BTreeMap<String, String>,
) -> Result<Vec<Reading>, GymClientError> {
    let mut readings = Vec::with_capacity(catalog.len());
    for (name, gym_id) in catalog {
        match source.branch_occupancy(gym_id).await? {
            Some(occupancy) => {
                tracing::info!("{name}: {:.1}% full", occupancy.capacity);
                readings.push(Reading {
                    gym: name.clone(),
                    time: Local::now().naive_local(),
                    capacity: occupancy.capacity,
                });
            }
            None => tracing::warn!("{name}: no reading this sweep"),
        }
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gymgroup_client::BranchOccupancy;

    struct FakeSource;

    #[async_trait]
    impl OccupancySource for FakeSource {
        async fn branch_occupancy(
            &self,
            gym_id: &str,
        ) -> Result<Option<BranchOccupancy>, GymClientError> {
            match gym_id {
                "down" => Ok(None),
                other => Ok(Some(BranchOccupancy {
                    capacity: other.len() as f64,
                })),
            }
        }
    }

    #[tokio::test]
    async fn sweep_skips_empty_answers_and_keeps_the_rest() {
        let catalog = BTreeMap::from([
            ("Leeds City".to_string(), "87".to_string()),
            ("London Oval".to_string(), "142".to_string()),
            ("Closed Gym".to_string(), "down".to_string()),
        ]);
        let readings = sweep_catalog(&FakeSource, &catalog).await.expect("sweep");
        assert_eq!(readings.len(), 2);
        // catalog iteration order is by name
        assert_eq!(readings[0].gym, "Leeds City");
        assert_eq!(readings[0].capacity, 2.0);
        assert_eq!(readings[1].gym, "London Oval");
        assert_eq!(readings[1].capacity, 3.0);
    }
}
