// ============================================================================
// Robo Core - Group Assignment Engine
// File: crates/robo-core/src/engine/assignment.rs
// Description: Attendance-ranked round-robin distribution into sub-groups
// ============================================================================
//! Members are ranked by attendance (highest first) and dealt out cyclically,
//! so every sub-group gets a similar mix of high and low attendance and sizes
//! differ by at most one. The first member dealt into a bucket leads it.

use uuid::Uuid;

use robo_shared::constants::MAX_SUB_GROUPS;

use crate::domain::{EligibleMember, MemberSnapshot, SubGroup};
use crate::error::DomainError;

/// One partition slot before it is turned into a sub-group record.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub members: Vec<MemberSnapshot>,
}

impl Bucket {
    pub fn leader_id(&self) -> Option<Uuid> {
        self.members.first().map(|m| m.member_id)
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.member_id).collect()
    }
}

pub struct GroupAssignmentEngine;

impl GroupAssignmentEngine {
    pub fn validate_group_count(group_count: i64) -> Result<usize, DomainError> {
        usize::try_from(group_count)
            .ok()
            .filter(|count| (1..=MAX_SUB_GROUPS).contains(count))
            .ok_or(DomainError::InvalidGroupCount(group_count))
    }

    /// Split `members` into `group_count` buckets. Ties in attendance keep
    /// their input order.
    pub fn partition(members: &[EligibleMember], group_count: i64) -> Result<Vec<Bucket>, DomainError> {
        let group_count = Self::validate_group_count(group_count)?;
        if members.is_empty() {
            return Err(DomainError::NoEligibleMembers);
        }

        let mut ranked: Vec<&EligibleMember> = members.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.attendance_percentage.total_cmp(&a.attendance_percentage));

        let mut buckets = vec![Bucket { members: Vec::new() }; group_count];
        for (position, member) in ranked.into_iter().enumerate() {
            buckets[position % group_count].members.push(MemberSnapshot::from(member));
        }

        Ok(buckets)
    }

    /// Partition and build one sub-group record per bucket, named
    /// "Group 1".."Group N" in bucket order.
    pub fn generate(
        parent_id: Uuid,
        or_period: &str,
        members: &[EligibleMember],
        group_count: i64,
        created_by: Uuid,
    ) -> Result<Vec<SubGroup>, DomainError> {
        let buckets = Self::partition(members, group_count)?;

        Ok(buckets
            .into_iter()
            .enumerate()
            .map(|(index, bucket)| SubGroup::with_members(parent_id, or_period, index, bucket.members, created_by))
            .collect())
    }

    /// N empty sub-groups for manual assignment; no ranking involved.
    pub fn create_empty(
        parent_id: Uuid,
        or_period: &str,
        group_count: i64,
        created_by: Uuid,
    ) -> Result<Vec<SubGroup>, DomainError> {
        let group_count = Self::validate_group_count(group_count)?;
        Ok((0..group_count)
            .map(|index| SubGroup::empty(parent_id, or_period, index, created_by))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use rand::seq::SliceRandom;
    use rand::Rng;

    fn member(pct: f64) -> EligibleMember {
        EligibleMember {
            id: Uuid::new_v4(),
            full_name: Name().fake(),
            nim: (1_000_000_000u64..9_999_999_999u64).fake::<u64>().to_string(),
            attendance_percentage: pct,
        }
    }

    fn roster(percentages: &[f64]) -> Vec<EligibleMember> {
        percentages.iter().map(|p| member(*p)).collect()
    }

    fn random_roster(rng: &mut impl Rng, len: usize) -> Vec<EligibleMember> {
        (0..len)
            .map(|_| member(f64::from(rng.random_range(0..=400u32)) / 4.0))
            .collect()
    }

    #[test]
    fn test_scenario_ten_members_three_groups() {
        let members = roster(&[90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0]);
        let buckets = GroupAssignmentEngine::partition(&members, 3).unwrap();

        let sizes: Vec<usize> = buckets.iter().map(|b| b.members.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let first: Vec<f64> = buckets[0].members.iter().map(|m| m.attendance_percentage).collect();
        assert_eq!(first, vec![90.0, 60.0, 30.0, 0.0]);
        assert_eq!(buckets[0].leader_id(), Some(members[0].id));

        let second: Vec<f64> = buckets[1].members.iter().map(|m| m.attendance_percentage).collect();
        assert_eq!(second, vec![80.0, 50.0, 20.0]);
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert_eq!(
            GroupAssignmentEngine::partition(&[], 5),
            Err(DomainError::NoEligibleMembers)
        );
        let generated = GroupAssignmentEngine::generate(Uuid::new_v4(), "OR 21", &[], 5, Uuid::new_v4());
        assert!(matches!(generated, Err(DomainError::NoEligibleMembers)));
    }

    #[test]
    fn test_non_positive_group_count_rejected() {
        let members = roster(&[50.0]);
        assert_eq!(
            GroupAssignmentEngine::partition(&members, 0),
            Err(DomainError::InvalidGroupCount(0))
        );
        assert_eq!(
            GroupAssignmentEngine::partition(&members, -2),
            Err(DomainError::InvalidGroupCount(-2))
        );
        assert!(GroupAssignmentEngine::partition(&members, (MAX_SUB_GROUPS + 1) as i64).is_err());
    }

    #[test]
    fn test_single_member_three_groups() {
        let members = roster(&[42.0]);
        let groups = GroupAssignmentEngine::generate(Uuid::new_v4(), "OR 21", &members, 3, Uuid::new_v4()).unwrap();

        let sizes: Vec<usize> = groups.iter().map(|g| g.member_count()).collect();
        assert_eq!(sizes, vec![1, 0, 0]);
        assert_eq!(groups[0].leader_id, Some(members[0].id));
        assert!(groups[1].leader_id.is_none());
        assert!(groups[2].leader_id.is_none());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let members = roster(&[50.0, 70.0, 50.0, 50.0]);
        let buckets = GroupAssignmentEngine::partition(&members, 1).unwrap();
        let order = buckets[0].member_ids();
        assert_eq!(order, vec![members[1].id, members[0].id, members[2].id, members[3].id]);
    }

    #[test]
    fn test_generated_records_are_numbered() {
        let members = roster(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let parent = Uuid::new_v4();
        let groups = GroupAssignmentEngine::generate(parent, "OR 21", &members, 2, Uuid::new_v4()).unwrap();

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Group 1", "Group 2"]);
        assert!(groups.iter().all(|g| g.parent_id == parent && g.or_period == "OR 21" && g.is_active));
    }

    #[test]
    fn test_snapshots_flag_low_attendance() {
        let members = roster(&[24.0, 25.0, 100.0]);
        let buckets = GroupAssignmentEngine::partition(&members, 1).unwrap();
        let flags: Vec<(f64, bool)> = buckets[0]
            .members
            .iter()
            .map(|m| (m.attendance_percentage, m.is_low_attendance))
            .collect();
        assert_eq!(flags, vec![(100.0, false), (25.0, false), (24.0, true)]);
    }

    #[test]
    fn test_create_empty_groups() {
        let groups = GroupAssignmentEngine::create_empty(Uuid::new_v4(), "OR 21", 4, Uuid::new_v4()).unwrap();
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.members.is_empty() && g.leader_id.is_none()));
        assert_eq!(groups[3].name, "Group 4");
        assert!(GroupAssignmentEngine::create_empty(Uuid::new_v4(), "OR 21", 0, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_partition_properties_on_random_rosters() {
        let mut rng = rand::rng();

        for _ in 0..200 {
            let len = rng.random_range(1..=60);
            let group_count = rng.random_range(1..=12);
            let mut members = random_roster(&mut rng, len);
            members.shuffle(&mut rng);

            let buckets = GroupAssignmentEngine::partition(&members, group_count).unwrap();
            assert_eq!(buckets.len(), group_count as usize);

            // every member appears exactly once
            let mut assigned: Vec<Uuid> = buckets.iter().flat_map(|b| b.member_ids()).collect();
            assert_eq!(assigned.len(), members.len());
            assigned.sort();
            let mut expected: Vec<Uuid> = members.iter().map(|m| m.id).collect();
            expected.sort();
            assert_eq!(assigned, expected);

            // sizes differ by at most one
            let sizes: Vec<usize> = buckets.iter().map(|b| b.members.len()).collect();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);

            for bucket in &buckets {
                match bucket.leader_id() {
                    Some(leader) => {
                        assert!(bucket.member_ids().contains(&leader));
                        let top = bucket
                            .members
                            .iter()
                            .map(|m| m.attendance_percentage)
                            .fold(f64::MIN, f64::max);
                        assert_eq!(bucket.members[0].attendance_percentage, top);
                    }
                    None => assert!(bucket.members.is_empty()),
                }
            }

            // deterministic for identical input
            let again = GroupAssignmentEngine::partition(&members, group_count).unwrap();
            assert_eq!(buckets, again);
        }
    }
}
