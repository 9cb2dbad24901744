use std::collections::VecDeque;

use crate::graph::PrecinctGraph;

impl PrecinctGraph {
    /// Check whether reassigning `v` from its current district to `target`
    /// would leave both districts internally connected.
    ///
    /// Operates on the current assignment plus the proposed move of `v`
    /// alone; nothing is mutated. The caller is responsible for rejecting
    /// moves that would empty the old district before asking.
    pub fn would_stay_connected(&self, v: u32, target: u32) -> bool {
        assert!((v as usize) < self.num_precincts(), "precinct {} out of range", v);
        assert!(target < self.num_districts(), "district must be in range [0, {})", self.num_districts());

        let old = match self.district_of(v) {
            Some(k) => k,
            None => return self.joins_connected(v, target),
        };
        if old == target { return true }

        self.leaves_connected(v, old) && self.joins_connected(v, target)
    }

    /// Would removing `v` from `district` leave the remainder connected?
    fn leaves_connected(&self, v: u32, district: u32) -> bool {
        // Same-district neighbors of `v` are the only vertices whose mutual
        // reachability can change.
        let anchors = self.neighbors(v)
            .filter(|&w| self.district_of(w) == Some(district))
            .collect::<Vec<_>>();

        // With fewer than 2 same-district neighbors, removal cannot split.
        if anchors.len() <= 1 { return true }

        // Track which anchors have been reached.
        let mut targets = vec![false; self.num_precincts()];
        anchors.iter().for_each(|&w| targets[w as usize] = true);

        // BFS from one anchor within `district`, forbidding `v`.
        let mut visited = vec![false; self.num_precincts()];
        visited[v as usize] = true;
        visited[anchors[0] as usize] = true;

        let mut remaining = anchors.len() - 1;
        let mut queue = VecDeque::from([anchors[0]]);
        while let Some(u) = queue.pop_front() {
            for w in self.neighbors(u) {
                if w != v && !visited[w as usize] && self.district_of(w) == Some(district) {
                    visited[w as usize] = true;
                    queue.push_back(w);

                    // Early exit once every anchor has been reached.
                    if targets[w as usize] { remaining -= 1; if remaining == 0 { return true } }
                }
            }
        }

        remaining == 0
    }

    /// Would `target` plus `v` form a connected subgraph?
    ///
    /// Under the steady-state invariant that `target` is already connected,
    /// this reduces to `v` having a neighbor in `target`; the reachability
    /// sweep also covers callers probing a mid-rebuild overlay.
    fn joins_connected(&self, v: u32, target: u32) -> bool {
        let anchors = self.neighbors(v)
            .filter(|&w| self.district_of(w) == Some(target))
            .collect::<Vec<_>>();
        if anchors.is_empty() { return self.members(target).is_empty() }

        let mut targets = vec![false; self.num_precincts()];
        anchors.iter().for_each(|&w| targets[w as usize] = true);

        // BFS from `v` over `target`'s members plus `v` itself.
        let mut visited = vec![false; self.num_precincts()];
        visited[v as usize] = true;

        let mut remaining = anchors.len();
        let mut queue = VecDeque::from([v]);
        while let Some(u) = queue.pop_front() {
            for w in self.neighbors(u) {
                if !visited[w as usize] && self.district_of(w) == Some(target) {
                    visited[w as usize] = true;
                    queue.push_back(w);

                    if targets[w as usize] { remaining -= 1; if remaining == 0 { return true } }
                }
            }
        }

        remaining == 0
    }

    /// Find all connected components (as precinct lists) inside `district`.
    pub(crate) fn find_components(&self, district: u32) -> Vec<Vec<u32>> {
        let mut components = Vec::new();

        let mut visited = vec![false; self.num_precincts()];
        for &start in self.members(district) {
            if visited[start as usize] { continue }
            visited[start as usize] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                component.push(u);
                for w in self.neighbors(u) {
                    if self.district_of(w) == Some(district) && !visited[w as usize] {
                        visited[w as usize] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Returns true if `district` induces at most one connected component.
    pub(crate) fn is_district_connected(&self, district: u32) -> bool {
        self.find_components(district).len() <= 1
    }
}
