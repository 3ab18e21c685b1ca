/// Pure selection logic for election rounds (Discord-agnostic)
use poise::serenity_prelude::UserId;
use rand::Rng;

/// Working copies of the role and user lists for one election
///
/// Drawing is uniform by index with removal from owned Vecs, so the guild's
/// configured lists are never mutated mid-iteration.
#[derive(Clone, Debug)]
pub struct ElectionPools {
    remaining_users: Vec<UserId>,
    remaining_roles: Vec<String>,
    used_roles: Vec<String>,
}

impl ElectionPools {
    pub fn new(users: Vec<UserId>, roles: Vec<String>) -> Self {
        Self {
            remaining_users: users,
            remaining_roles: roles,
            used_roles: Vec::new(),
        }
    }

    /// Whether every remaining user has been assigned a role
    pub fn is_finished(&self) -> bool {
        self.remaining_users.is_empty()
    }

    /// Draw one user and one role for a round
    ///
    /// Users are drawn without replacement. Roles are drawn without
    /// replacement until the fresh list runs out, after which rounds recycle
    /// uniformly from the already-assigned roles. Returns None when no users
    /// remain or no role was ever available.
    pub fn draw_round<R: Rng>(&mut self, rng: &mut R) -> Option<(UserId, String)> {
        if self.remaining_users.is_empty() {
            return None;
        }
        if self.remaining_roles.is_empty() && self.used_roles.is_empty() {
            return None;
        }

        let user_idx = rng.random_range(0..self.remaining_users.len());
        let user = self.remaining_users.remove(user_idx);

        let role = if self.remaining_roles.is_empty() {
            // Recycled roles stay in the pool so later rounds never run dry
            let role_idx = rng.random_range(0..self.used_roles.len());
            self.used_roles[role_idx].clone()
        } else {
            let role_idx = rng.random_range(0..self.remaining_roles.len());
            let role = self.remaining_roles.remove(role_idx);
            self.used_roles.push(role.clone());
            role
        };

        Some((user, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn users(ids: &[u64]) -> Vec<UserId> {
        ids.iter().map(|id| UserId::new(*id)).collect()
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_two_rounds_exhaust_both_lists() {
        let mut pools = ElectionPools::new(users(&[1, 2]), roles(&["R1", "R2"]));
        let mut rng = rng();

        let (u1, r1) = pools.draw_round(&mut rng).unwrap();
        assert!(!pools.is_finished());
        let (u2, r2) = pools.draw_round(&mut rng).unwrap();
        assert!(pools.is_finished());

        // one user and one role removed per round, no repeats
        assert_ne!(u1, u2);
        assert_ne!(r1, r2);
        assert!(pools.draw_round(&mut rng).is_none());
    }

    #[test]
    fn test_role_recycling_when_roles_exhausted() {
        let mut pools = ElectionPools::new(users(&[1, 2, 3]), roles(&["R1"]));
        let mut rng = rng();

        for _ in 0..3 {
            let (_, role) = pools
                .draw_round(&mut rng)
                .expect("rounds should recycle the used role instead of failing");
            assert_eq!(role, "R1");
        }
        assert!(pools.is_finished());
    }

    #[test]
    fn test_no_roles_configured() {
        let mut pools = ElectionPools::new(users(&[1, 2]), Vec::new());
        assert!(pools.draw_round(&mut rng()).is_none());
    }

    #[test]
    fn test_no_users_configured() {
        let mut pools = ElectionPools::new(Vec::new(), roles(&["R1"]));
        assert!(pools.is_finished());
        assert!(pools.draw_round(&mut rng()).is_none());
    }

    #[test]
    fn test_every_user_drawn_exactly_once() {
        let all = users(&[1, 2, 3, 4, 5]);
        let mut pools = ElectionPools::new(all.clone(), roles(&["R1", "R2"]));
        let mut rng = rng();

        let mut drawn = Vec::new();
        while let Some((user, _)) = pools.draw_round(&mut rng) {
            drawn.push(user);
        }

        drawn.sort();
        let mut expected = all;
        expected.sort();
        assert_eq!(drawn, expected);
    }
}
