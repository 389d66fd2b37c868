// service/ranking_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        postdb::{PostExt, FEED_LIMIT},
        reviewdb::ReviewExt,
        skilldb::SkillExt,
        userdb::UserExt,
    },
    models::{
        postmodel::RankedPost,
        reviewmodel::ReviewStats,
        skillmodel::Skill,
        usermodel::MakerLevel,
    },
    service::error::ServiceError,
    utils::geo::{haversine_km, squared_degree_distance},
};

/// Maker card for discovery listings: public profile fields only, enriched
/// with distance, completed-repair count, level and rating in one pass.
#[derive(Debug, Serialize, Clone)]
pub struct RankedMaker {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub maker_bio: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub distance_km: Option<f64>,
    pub completed_repairs: i64,
    pub average_rating: Option<f64>,
    pub level: MakerLevel,
    pub skills: Vec<Skill>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Proximity ranking over posts and makers. Posts rank inside Postgres so
/// the row cap applies after ordering; the maker pool is small enough to
/// rank in memory, which keeps the enrichment joins out of the hot query.
#[derive(Debug, Clone)]
pub struct RankingService {
    db_client: Arc<DBClient>,
}

impl RankingService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Non-closed posts, nearest first when the caller has an origin, newest
    /// first otherwise. A radius without an origin is ignored.
    pub async fn rank_posts(
        &self,
        origin: Option<(f64, f64)>,
        radius_km: Option<f64>,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedPost>, ServiceError> {
        let posts = match origin {
            Some(origin) => {
                self.db_client
                    .get_posts_ranked(origin, radius_km, skill_ids, search)
                    .await?
            }
            None => {
                self.db_client
                    .get_posts_chronological(skill_ids, search)
                    .await?
            }
        };
        Ok(posts)
    }

    pub async fn rank_makers(
        &self,
        origin: Option<(f64, f64)>,
        radius_km: Option<f64>,
        skill_ids: Option<&[Uuid]>,
        search: Option<&str>,
    ) -> Result<Vec<RankedMaker>, ServiceError> {
        let makers = self.db_client.get_makers(skill_ids, search).await?;

        let mut ranked = rank_by_distance(makers, origin, radius_km, |m| m.coordinate());
        ranked.truncate(FEED_LIMIT as usize);

        let candidate_ids: Vec<Uuid> = ranked.iter().map(|(m, _)| m.id).collect();
        let stats: HashMap<Uuid, ReviewStats> = self
            .db_client
            .get_review_stats(&candidate_ids)
            .await?
            .into_iter()
            .map(|s| (s.target_user_id, s))
            .collect();
        let mut skills = self.db_client.get_batch_user_skills(&candidate_ids).await?;

        Ok(ranked
            .into_iter()
            .map(|(maker, distance_km)| {
                let stat = stats.get(&maker.id);
                let completed = stat.map(|s| s.completed_repairs).unwrap_or(0);
                RankedMaker {
                    id: maker.id,
                    name: maker.name,
                    image: maker.image,
                    bio: maker.bio,
                    maker_bio: maker.maker_bio,
                    lat: maker.lat,
                    long: maker.long,
                    distance_km,
                    completed_repairs: completed,
                    average_rating: stat.and_then(|s| s.average_rating),
                    level: MakerLevel::from_completed(completed),
                    skills: skills.remove(&maker.id).unwrap_or_default(),
                    created_at: maker.created_at,
                }
            })
            .collect())
    }
}

/// Orders items by distance from the origin, nearest first. Items without
/// coordinates keep their incoming relative order at the tail, and are cut
/// entirely when a radius is in play. Without an origin the input order
/// stands, radius or not.
///
/// Filtering and ordering both use the great-circle distance; the
/// squared-degree form only breaks exact distance ties.
pub fn rank_by_distance<T>(
    items: Vec<T>,
    origin: Option<(f64, f64)>,
    radius_km: Option<f64>,
    coordinate: impl Fn(&T) -> Option<(f64, f64)>,
) -> Vec<(T, Option<f64>)> {
    let Some(origin) = origin else {
        return items.into_iter().map(|item| (item, None)).collect();
    };

    let mut near: Vec<(T, f64, f64)> = Vec::new();
    let mut unlocated: Vec<(T, Option<f64>)> = Vec::new();

    for item in items {
        match coordinate(&item) {
            Some((lat, long)) => {
                let km = haversine_km(origin.0, origin.1, lat, long);
                if radius_km.map_or(true, |r| km <= r) {
                    near.push((item, km, squared_degree_distance(origin.0, origin.1, lat, long)));
                }
            }
            None => {
                if radius_km.is_none() {
                    unlocated.push((item, None));
                }
            }
        }
    }

    near.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

    near.into_iter()
        .map(|(item, km, _)| (item, Some(km)))
        .chain(unlocated)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Dutch cities, roughly west to east.
    const AMSTERDAM: (f64, f64) = (52.3676, 4.9041);
    const UTRECHT: (f64, f64) = (52.0907, 5.1214);
    const ARNHEM: (f64, f64) = (51.9851, 5.8987);

    struct Spot {
        name: &'static str,
        point: Option<(f64, f64)>,
    }

    fn spots() -> Vec<Spot> {
        vec![
            Spot { name: "arnhem", point: Some(ARNHEM) },
            Spot { name: "nowhere", point: None },
            Spot { name: "utrecht", point: Some(UTRECHT) },
        ]
    }

    #[test]
    fn nearest_first_unlocated_last() {
        let ranked = rank_by_distance(spots(), Some(AMSTERDAM), None, |s| s.point);
        let names: Vec<&str> = ranked.iter().map(|(s, _)| s.name).collect();
        assert_eq!(names, vec!["utrecht", "arnhem", "nowhere"]);

        assert!(ranked[0].1.unwrap() < ranked[1].1.unwrap());
        assert!(ranked[2].1.is_none());
    }

    #[test]
    fn sort_follows_great_circle_not_degree_space() {
        // One degree of longitude at 52N is ~68 km; one of latitude ~111 km.
        // The due-north spot is larger in kilometres but smaller in degree
        // space, so a degree-space sort would put it first.
        let spots = vec![
            Spot { name: "north", point: Some((52.9, 5.0)) },
            Spot { name: "east", point: Some((52.0, 6.0)) },
        ];
        let ranked = rank_by_distance(spots, Some((52.0, 5.0)), Some(150.0), |s| s.point);
        let names: Vec<&str> = ranked.iter().map(|(s, _)| s.name).collect();
        assert_eq!(names, vec!["east", "north"]);
        assert!(ranked[0].1.unwrap() < ranked[1].1.unwrap());
    }

    #[test]
    fn radius_drops_far_and_unlocated() {
        // Utrecht is ~35 km from Amsterdam, Arnhem ~90 km.
        let ranked = rank_by_distance(spots(), Some(AMSTERDAM), Some(50.0), |s| s.point);
        let names: Vec<&str> = ranked.iter().map(|(s, _)| s.name).collect();
        assert_eq!(names, vec!["utrecht"]);
    }

    #[test]
    fn widening_the_radius_never_loses_results() {
        let narrow = rank_by_distance(spots(), Some(AMSTERDAM), Some(50.0), |s| s.point);
        let wide = rank_by_distance(spots(), Some(AMSTERDAM), Some(200.0), |s| s.point);
        assert!(wide.len() >= narrow.len());

        let wide_names: Vec<&str> = wide.iter().map(|(s, _)| s.name).collect();
        for (spot, _) in &narrow {
            assert!(wide_names.contains(&spot.name));
        }
    }

    #[test]
    fn no_origin_keeps_input_order() {
        let ranked = rank_by_distance(spots(), None, Some(10.0), |s| s.point);
        let names: Vec<&str> = ranked.iter().map(|(s, _)| s.name).collect();
        assert_eq!(names, vec!["arnhem", "nowhere", "utrecht"]);
        assert!(ranked.iter().all(|(_, d)| d.is_none()));
    }
}
