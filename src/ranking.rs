//! Leaderboard aggregation
//!
//! There is no backend: the board is a fixed reference list of players with
//! the signed-in user merged in. Positions 1..=10 qualify for the reward.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::PODIUM_SIZE;
use crate::identity::{UserRecord, avatar_url};

/// How a player missing from the reference list gets a rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankPolicy {
    /// Uniform in the unranked range, drawn fresh on every view
    #[default]
    Random,
    /// Sorted position, stable across views. A position inside the qualified
    /// tier is kept as is, anything below it is clamped into the unranked range.
    ScoreDerived,
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub username: String,
    pub points: u64,
    /// 1-based position
    pub position: u32,
    pub avatar: String,
    #[serde(default)]
    pub qualified: bool,
}

impl Standing {
    pub fn new(username: &str, points: u64, position: u32) -> Self {
        Self {
            username: username.to_string(),
            points,
            position,
            avatar: avatar_url(username),
            qualified: false,
        }
    }
}

/// The fixed reference players shown on the board
pub fn reference_players() -> Vec<Standing> {
    [
        ("FireMaster", 15420),
        ("SnipersElite", 14890),
        ("ThunderBolt", 13650),
        ("NightHawk", 12340),
        ("PhoenixRise", 11890),
        ("ShadowBlade", 10560),
        ("DragonFury", 9870),
        ("StormBreaker", 8950),
        ("IceQueen", 8420),
        ("BlitzKing", 7890),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, points))| Standing::new(name, points, i as u32 + 1))
    .collect()
}

/// Merges the signed-in user into a reference list
#[derive(Debug, Clone)]
pub struct Aggregator {
    reference: Vec<Standing>,
    policy: RankPolicy,
    qualified_cutoff: u32,
    unranked: (u32, u32),
}

impl Aggregator {
    pub fn new(reference: Vec<Standing>, config: &GameConfig) -> Self {
        Self {
            reference,
            policy: config.rank_policy,
            qualified_cutoff: config.qualified_cutoff,
            unranked: (config.unranked_min, config.unranked_max),
        }
    }

    /// Aggregator over the built-in reference players
    pub fn with_reference_players(config: &GameConfig) -> Self {
        Self::new(reference_players(), config)
    }

    pub fn reference(&self) -> &[Standing] {
        &self.reference
    }

    /// Build the board for `user`. `rng` is only drawn from under
    /// `RankPolicy::Random` when the user is not a reference player.
    pub fn aggregate(&self, user: &UserRecord, rng: &mut impl Rng) -> Ranking {
        let mut standings = self.reference.clone();

        let card = match self.reference.iter().find(|p| p.username == user.username) {
            // The reference entry is canonical, local points are ignored
            Some(entry) => entry.clone(),
            None => {
                let mut entry = Standing {
                    username: user.username.clone(),
                    points: user.points,
                    position: 0,
                    avatar: user.avatar.clone(),
                    qualified: false,
                };
                standings.push(entry.clone());
                sort_standings(&mut standings);

                let (min, max) = self.unranked;
                entry.position = match self.policy {
                    RankPolicy::Random => rng.random_range(min..=max),
                    RankPolicy::ScoreDerived => {
                        let sorted = standings
                            .iter()
                            .position(|s| s.username == user.username)
                            .map_or(max, |i| i as u32 + 1);
                        if sorted <= self.qualified_cutoff {
                            sorted
                        } else {
                            sorted.clamp(min, max)
                        }
                    }
                };
                entry
            }
        };

        sort_standings(&mut standings);
        for (i, standing) in standings.iter_mut().enumerate() {
            standing.position = i as u32 + 1;
            standing.qualified = standing.position <= self.qualified_cutoff;
        }

        let mut user = card;
        user.qualified = user.position > 0 && user.position <= self.qualified_cutoff;
        log::debug!(
            "Ranked {} at {} with {} pts ({} players)",
            user.username,
            user.position,
            user.points,
            standings.len()
        );

        Ranking {
            standings,
            user,
            qualified_cutoff: self.qualified_cutoff,
        }
    }
}

/// Descending by points; ties keep list order
fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.points.cmp(&a.points));
}

/// Output of an aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    /// Every player, best first
    pub standings: Vec<Standing>,
    /// The signed-in user's card (reported rank and points)
    pub user: Standing,
    /// Last qualifying position this board was built with
    pub qualified_cutoff: u32,
}

impl Ranking {
    /// Top three standings
    pub fn podium(&self) -> &[Standing] {
        &self.standings[..self.standings.len().min(PODIUM_SIZE)]
    }

    /// Qualified standings
    pub fn qualified(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter().filter(|s| s.qualified)
    }

    /// Whether a row belongs to the signed-in user
    pub fn is_user(&self, standing: &Standing) -> bool {
        standing.username == self.user.username
    }

    /// Badge for the user's reported rank
    pub fn user_badge(&self) -> RankBadge {
        RankBadge::for_rank(self.user.position, self.qualified_cutoff)
    }
}

/// Rank tier used for the dashboard badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    /// Qualified, below the podium
    Qualified,
    Unqualified,
    /// Rank 0, not placed yet
    Unranked,
}

impl RankBadge {
    pub fn for_rank(rank: u32, qualified_cutoff: u32) -> Self {
        match rank {
            0 => RankBadge::Unranked,
            r if r > qualified_cutoff => RankBadge::Unqualified,
            1 => RankBadge::Gold,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            _ => RankBadge::Qualified,
        }
    }

    /// Whether this tier wins the reward
    pub fn is_qualified(&self) -> bool {
        !matches!(self, RankBadge::Unqualified | RankBadge::Unranked)
    }
}

/// Display label for a rank, e.g. "2nd place"
pub fn rank_label(rank: u32) -> String {
    if rank == 0 {
        return "Unranked".to_string();
    }
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} place", rank, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn user(name: &str, points: u64) -> UserRecord {
        let mut u = UserRecord::new(name);
        u.points = points;
        u
    }

    fn aggregator(policy: RankPolicy) -> Aggregator {
        let config = GameConfig {
            rank_policy: policy,
            ..Default::default()
        };
        Aggregator::with_reference_players(&config)
    }

    #[test]
    fn test_reference_user_adopts_reference_entry() {
        let mut rng = Pcg32::seed_from_u64(1);
        let ranking = aggregator(RankPolicy::Random).aggregate(&user("BlitzKing", 99_999), &mut rng);

        assert_eq!(ranking.user.points, 7890);
        assert_eq!(ranking.user.position, 10);
        assert!(ranking.user.qualified);
        assert_eq!(ranking.standings.len(), 10);
        assert_eq!(ranking.standings[9].username, "BlitzKing");
        assert_eq!(ranking.user_badge(), RankBadge::Qualified);
    }

    #[test]
    fn test_new_user_gets_unranked_position() {
        let agg = aggregator(RankPolicy::Random);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let ranking = agg.aggregate(&user("Newbie", 120), &mut rng);
            assert!((11..=30).contains(&ranking.user.position));
            assert!(!ranking.user.qualified);
            assert_eq!(ranking.user.points, 120);
            assert_eq!(ranking.standings.len(), 11);
            assert_eq!(ranking.standings.last().unwrap().username, "Newbie");
            assert_eq!(ranking.standings.last().unwrap().position, 11);
        }
    }

    #[test]
    fn test_high_scoring_new_user_sorts_to_top() {
        let mut rng = Pcg32::seed_from_u64(3);
        let ranking = aggregator(RankPolicy::Random).aggregate(&user("Ace", 20_000), &mut rng);
        assert_eq!(ranking.standings[0].username, "Ace");
        assert_eq!(ranking.standings[0].position, 1);
        assert_eq!(ranking.standings[1].username, "FireMaster");
        assert_eq!(ranking.standings[10].username, "BlitzKing");
        assert!(!ranking.standings[10].qualified);
    }

    #[test]
    fn test_score_derived_is_stable() {
        let agg = aggregator(RankPolicy::ScoreDerived);
        let mut rng = Pcg32::seed_from_u64(5);
        let a = agg.aggregate(&user("Steady", 8_000), &mut rng);
        let b = agg.aggregate(&user("Steady", 8_000), &mut rng);
        assert_eq!(a, b);
        // 10th by score, inside the qualified tier
        assert_eq!(a.user.position, 10);
        assert!(a.user.qualified);

        let low = agg.aggregate(&user("Steady", 0), &mut rng);
        assert_eq!(low.user.position, 11);
    }

    #[test]
    fn test_score_derived_top_scorer_keeps_sorted_position() {
        let mut rng = Pcg32::seed_from_u64(8);
        let ranking = aggregator(RankPolicy::ScoreDerived).aggregate(&user("Ace", 20_000), &mut rng);
        assert_eq!(ranking.standings[0].username, "Ace");
        assert_eq!(ranking.user.position, ranking.standings[0].position);
        assert_eq!(ranking.user.position, 1);
        assert!(ranking.user.qualified);
        assert_eq!(ranking.user_badge(), RankBadge::Gold);
    }

    #[test]
    fn test_badge_follows_configured_cutoff() {
        let config = GameConfig {
            qualified_cutoff: 5,
            ..Default::default()
        };
        let agg = Aggregator::with_reference_players(&config);
        let mut rng = Pcg32::seed_from_u64(2);

        let ranking = agg.aggregate(&user("DragonFury", 0), &mut rng);
        assert_eq!(ranking.user.position, 7);
        assert!(!ranking.user.qualified);
        assert_eq!(ranking.user_badge(), RankBadge::Unqualified);
        assert_eq!(ranking.user.qualified, ranking.user_badge().is_qualified());
        assert_eq!(ranking.qualified().count(), 5);

        let ranking = agg.aggregate(&user("NightHawk", 0), &mut rng);
        assert_eq!(ranking.user.qualified, ranking.user_badge().is_qualified());
        assert!(ranking.user.qualified);
    }

    #[test]
    fn test_ties_keep_list_order() {
        let config = GameConfig::default();
        let reference = vec![
            Standing::new("A", 100, 1),
            Standing::new("B", 50, 2),
            Standing::new("C", 50, 3),
        ];
        let mut rng = Pcg32::seed_from_u64(0);
        let ranking = Aggregator::new(reference, &config).aggregate(&user("D", 50), &mut rng);
        let order: Vec<&str> = ranking.standings.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        let positions: Vec<u32> = ranking.standings.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_podium_and_qualified() {
        let mut rng = Pcg32::seed_from_u64(11);
        let ranking = aggregator(RankPolicy::Random).aggregate(&user("Newbie", 0), &mut rng);
        let podium: Vec<&str> = ranking.podium().iter().map(|s| s.username.as_str()).collect();
        assert_eq!(podium, vec!["FireMaster", "SnipersElite", "ThunderBolt"]);
        assert_eq!(ranking.qualified().count(), 10);
        assert!(ranking.is_user(ranking.standings.last().unwrap()));

        let small = Aggregator::new(vec![Standing::new("Solo", 1, 1)], &GameConfig::default());
        let ranking = small.aggregate(&user("Solo", 0), &mut rng);
        assert_eq!(ranking.podium().len(), 1);
    }

    #[test]
    fn test_rank_badges() {
        assert_eq!(RankBadge::for_rank(0, 10), RankBadge::Unranked);
        assert_eq!(RankBadge::for_rank(1, 10), RankBadge::Gold);
        assert_eq!(RankBadge::for_rank(2, 10), RankBadge::Silver);
        assert_eq!(RankBadge::for_rank(3, 10), RankBadge::Bronze);
        assert_eq!(RankBadge::for_rank(10, 10), RankBadge::Qualified);
        assert_eq!(RankBadge::for_rank(11, 10), RankBadge::Unqualified);
        assert_eq!(RankBadge::for_rank(6, 5), RankBadge::Unqualified);
        assert_eq!(RankBadge::for_rank(5, 5), RankBadge::Qualified);
        assert_eq!(RankBadge::for_rank(3, 2), RankBadge::Unqualified);
        assert!(RankBadge::Bronze.is_qualified());
        assert!(!RankBadge::Unranked.is_qualified());
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(rank_label(0), "Unranked");
        assert_eq!(rank_label(1), "1st place");
        assert_eq!(rank_label(2), "2nd place");
        assert_eq!(rank_label(3), "3rd place");
        assert_eq!(rank_label(4), "4th place");
        assert_eq!(rank_label(11), "11th place");
        assert_eq!(rank_label(12), "12th place");
        assert_eq!(rank_label(21), "21st place");
        assert_eq!(rank_label(113), "113th place");
    }

    proptest! {
        #[test]
        fn output_sorted_and_reference_order_kept(
            mut points in proptest::collection::vec(0u64..20_000, 1..20),
            user_points in 0u64..25_000,
            seed in any::<u64>(),
        ) {
            points.sort_unstable_by(|a, b| b.cmp(a));
            let reference: Vec<Standing> = points
                .iter()
                .enumerate()
                .map(|(i, p)| Standing::new(&format!("P{i}"), *p, i as u32 + 1))
                .collect();
            let agg = Aggregator::new(reference.clone(), &GameConfig::default());
            let mut rng = Pcg32::seed_from_u64(seed);
            let ranking = agg.aggregate(&user("Outsider", user_points), &mut rng);

            prop_assert!(ranking.standings.windows(2).all(|w| w[0].points >= w[1].points));
            let kept: Vec<&str> = ranking
                .standings
                .iter()
                .filter(|s| s.username != "Outsider")
                .map(|s| s.username.as_str())
                .collect();
            let original: Vec<&str> = reference.iter().map(|s| s.username.as_str()).collect();
            prop_assert_eq!(kept, original);
            for (i, s) in ranking.standings.iter().enumerate() {
                prop_assert_eq!(s.position, i as u32 + 1);
            }
        }
    }
}
