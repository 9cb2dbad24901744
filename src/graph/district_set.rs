/// DistrictSet maintains the total assignment of precincts to districts,
/// with O(1) move/contains. District `num_districts` is the unassigned pool;
/// every precinct starts there.
#[derive(Debug, Clone)]
pub(crate) struct DistrictSet {
    buckets: Vec<Vec<u32>>, // buckets[k] = precincts currently in district k
    index: Vec<u32>,        // index[v] = k when v is in buckets[k]
    position: Vec<u32>,     // position[v] = i when buckets[k][i] is v
}

impl DistrictSet {
    /// Create a DistrictSet for `num_districts` districts over `num_precincts`
    /// precincts, all initially unassigned.
    pub(crate) fn new(num_districts: u32, num_precincts: usize) -> Self {
        assert!(num_districts > 0, "must have at least one district");
        let capacity = (num_precincts / num_districts as usize).isqrt().saturating_add(1);
        let mut buckets = (0..=num_districts)
            .map(|_| Vec::with_capacity(capacity))
            .collect::<Vec<_>>();
        buckets[num_districts as usize] = (0..num_precincts as u32).collect();

        Self {
            buckets,
            index: vec![num_districts; num_precincts],
            position: (0..num_precincts as u32).collect(),
        }
    }

    /// Number of districts (excluding the unassigned pool).
    #[inline] pub(crate) fn num_districts(&self) -> u32 { self.buckets.len() as u32 - 1 }

    /// Number of precincts addressable by index.
    #[inline] pub(crate) fn num_precincts(&self) -> usize { self.index.len() }

    /// Return the district `precinct` is currently in, or `None` if unassigned.
    #[inline]
    pub(crate) fn find(&self, precinct: u32) -> Option<u32> {
        debug_assert!((precinct as usize) < self.index.len(), "precinct out of range");
        let k = self.index[precinct as usize];
        (k < self.num_districts()).then_some(k)
    }

    /// Read-only view of the precincts currently in `district`.
    #[inline]
    pub(crate) fn members(&self, district: u32) -> &[u32] {
        debug_assert!(district < self.num_districts(), "district out of range");
        &self.buckets[district as usize]
    }

    /// Read-only view of the unassigned pool.
    #[inline]
    pub(crate) fn unassigned(&self) -> &[u32] {
        &self.buckets[self.num_districts() as usize]
    }

    /// Move `precinct` into `district`; `None` returns it to the unassigned pool.
    pub(crate) fn move_to(&mut self, precinct: u32, district: Option<u32>) {
        debug_assert!((precinct as usize) < self.index.len(), "precinct out of range");
        let dest = district.unwrap_or(self.num_districts());
        debug_assert!((dest as usize) < self.buckets.len(), "district out of range");

        let (prev, pos) = (self.index[precinct as usize], self.position[precinct as usize]);
        if prev == dest { return }

        // Remove from previous bucket by swapping with the last element.
        let last = self.buckets[prev as usize].pop().unwrap();
        if last != precinct {
            self.buckets[prev as usize][pos as usize] = last;
            self.position[last as usize] = pos;
        }

        // Add to the new bucket.
        self.index[precinct as usize] = dest;
        self.position[precinct as usize] = self.buckets[dest as usize].len() as u32;
        self.buckets[dest as usize].push(precinct);
    }

    /// Return every precinct to the unassigned pool.
    pub(crate) fn clear(&mut self) {
        let pool = self.num_districts();
        self.buckets.iter_mut().for_each(|v| v.clear());
        self.buckets[pool as usize] = (0..self.num_precincts() as u32).collect();
        self.index.fill(pool);
        self.position = (0..self.num_precincts() as u32).collect();
    }

    /// Rebuild the assignment from a complete slice of district labels.
    pub(crate) fn rebuild(&mut self, assignments: &[u32]) {
        assert!(assignments.len() == self.num_precincts(), "assignments length mismatch");

        self.buckets.iter_mut().for_each(|v| v.clear());
        for (v, &k) in assignments.iter().enumerate() {
            assert!(k < self.num_districts(), "district out of range");
            self.index[v] = k;
            self.position[v] = self.buckets[k as usize].len() as u32;
            self.buckets[k as usize].push(v as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DistrictSet;

    #[test]
    fn new_starts_unassigned() {
        let ds = DistrictSet::new(3, 5);
        assert_eq!(ds.num_districts(), 3);
        assert_eq!(ds.num_precincts(), 5);

        assert_eq!(ds.unassigned(), &[0, 1, 2, 3, 4]);
        for k in 0..3 {
            assert!(ds.members(k).is_empty());
        }
        for v in 0..5 {
            assert_eq!(ds.find(v), None);
        }
    }

    #[test]
    fn move_to_assigns_and_reassigns() {
        let mut ds = DistrictSet::new(3, 4);
        ds.move_to(2, Some(1));
        assert_eq!(ds.find(2), Some(1));
        assert!(ds.members(1).contains(&2));
        assert!(!ds.unassigned().contains(&2));

        ds.move_to(2, Some(0));
        assert_eq!(ds.find(2), Some(0));
        assert!(ds.members(1).is_empty());
        assert!(ds.members(0).contains(&2));
    }

    #[test]
    fn move_to_none_returns_to_pool() {
        let mut ds = DistrictSet::new(2, 3);
        ds.move_to(0, Some(1));
        ds.move_to(0, None);
        assert_eq!(ds.find(0), None);
        assert!(ds.unassigned().contains(&0));
        assert!(ds.members(1).is_empty());
    }

    #[test]
    fn move_to_same_district_is_noop() {
        let mut ds = DistrictSet::new(2, 3);
        ds.move_to(1, Some(0));
        ds.move_to(1, Some(0));
        assert_eq!(ds.members(0), &[1]);
    }

    #[test]
    fn swap_remove_keeps_positions_consistent() {
        let mut ds = DistrictSet::new(2, 5);
        for v in 0..5 {
            ds.move_to(v, Some(0));
        }
        // Remove from the middle; the swapped-in element must stay findable.
        ds.move_to(1, Some(1));

        assert_eq!(ds.find(1), Some(1));
        for v in [0, 2, 3, 4] {
            assert_eq!(ds.find(v), Some(0));
            assert!(ds.members(0).contains(&v));
        }
        assert_eq!(ds.members(0).len(), 4);
    }

    #[test]
    fn rebuild_installs_complete_assignment() {
        let mut ds = DistrictSet::new(3, 6);
        ds.rebuild(&[0, 1, 2, 0, 2, 1]);

        assert_eq!(ds.members(0), &[0, 3]);
        assert_eq!(ds.members(1), &[1, 5]);
        assert_eq!(ds.members(2), &[2, 4]);
        assert!(ds.unassigned().is_empty());
    }

    #[test]
    #[should_panic(expected = "assignments length mismatch")]
    fn rebuild_panics_on_len_mismatch() {
        let mut ds = DistrictSet::new(2, 4);
        ds.rebuild(&[0, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "district out of range")]
    fn rebuild_panics_on_district_oob() {
        let mut ds = DistrictSet::new(2, 3);
        ds.rebuild(&[0, 1, 2]);
    }

    #[test]
    fn clear_returns_everything_to_pool() {
        let mut ds = DistrictSet::new(3, 6);
        ds.rebuild(&[0, 1, 2, 0, 2, 1]);
        ds.clear();

        assert_eq!(ds.unassigned(), &[0, 1, 2, 3, 4, 5]);
        for k in 0..3 {
            assert!(ds.members(k).is_empty());
        }
    }
}
