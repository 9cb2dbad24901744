use std::collections::VecDeque;

use rand::Rng;

use crate::error::{Error, Result};
use crate::graph::PrecinctGraph;

impl PrecinctGraph {
    /// Establish an initial partition: one uniformly chosen seed precinct per
    /// district, then round-robin growth until every precinct is assigned.
    ///
    /// Growth expands each district from the precinct it most recently
    /// claimed, searching only through its own members, so every claimed
    /// precinct is adjacent to the district and the finished partition is
    /// contiguous. A full pass in which no district can grow means the graph
    /// is disconnected for this district count.
    pub fn seed_districts(&mut self, rng: &mut impl Rng) -> Result<()> {
        self.clear_assignments();
        let num_districts = self.num_districts();

        // Distinct seeds, sampled without replacement.
        let seeds = rand::seq::index::sample(rng, self.num_precincts(), num_districts as usize);
        let mut last_found = Vec::with_capacity(num_districts as usize);
        for (district, seed) in seeds.iter().enumerate() {
            self.set_district(seed as u32, district as u32)?;
            last_found.push(seed as u32);
        }

        while !self.unassigned().is_empty() {
            let mut grew = false;
            for district in 0..num_districts {
                if self.unassigned().is_empty() { break }
                if let Some(found) = self.nearest_unassigned(last_found[district as usize], district) {
                    self.set_district(found, district)?;
                    last_found[district as usize] = found;
                    grew = true;
                }
            }
            if !grew {
                return Err(Error::SeedingFailed { num_districts });
            }
        }

        self.populate_derived_state();
        Ok(())
    }

    /// BFS from `start` through members of `district`, returning the first
    /// unassigned precinct on the district's frontier.
    fn nearest_unassigned(&self, start: u32, district: u32) -> Option<u32> {
        let mut visited = vec![false; self.num_precincts()];
        visited[start as usize] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for w in self.neighbors(u) {
                if visited[w as usize] { continue }
                match self.district_of(w) {
                    None => return Some(w),
                    Some(k) if k == district => {
                        visited[w as usize] = true;
                        queue.push_back(w);
                    }
                    _ => {}
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::graph::GraphBuilder;

    fn grid(side: u32, num_districts: u32) -> PrecinctGraph {
        let n = (side * side) as usize;
        let mut builder = GraphBuilder::new(n, num_districts, None).unwrap();
        for _ in 0..n {
            builder.add_precinct(0, 1, 1).unwrap();
        }
        for row in 0..side {
            for col in 0..side {
                let v = row * side + col;
                if col + 1 < side { builder.add_edge(v, v + 1).unwrap(); }
                if row + 1 < side { builder.add_edge(v, v + side).unwrap(); }
            }
        }
        builder.finish_loading().unwrap()
    }

    #[test]
    fn seeding_assigns_everything_contiguously() {
        let mut graph = grid(5, 4);
        let mut rng = StdRng::seed_from_u64(11);
        graph.seed_districts(&mut rng).unwrap();

        assert!(graph.unassigned().is_empty());
        for k in 0..4 {
            assert!(!graph.members(k).is_empty());
            assert!(graph.is_district_connected(k));
        }

        // Populations were accumulated along the way.
        let assigned: u64 = (0..4).map(|k| graph.total_pop(k)).sum();
        assert_eq!(assigned, graph.state_pop());
    }

    #[test]
    fn seeding_is_deterministic_per_rng_seed() {
        let mut first = grid(5, 3);
        let mut second = grid(5, 3);
        first.seed_districts(&mut StdRng::seed_from_u64(42)).unwrap();
        second.seed_districts(&mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(first.assignments(), second.assignments());

        let mut third = grid(5, 3);
        third.seed_districts(&mut StdRng::seed_from_u64(43)).unwrap();
        // Different streams almost surely differ on a 25-precinct grid.
        assert_ne!(first.assignments(), third.assignments());
    }

    #[test]
    fn disconnected_graph_fails_to_seed() {
        // Two precincts, no edge between them, one district: growth can
        // never reach the second precinct.
        let mut builder = GraphBuilder::new(2, 1, None).unwrap();
        builder.add_precinct(0, 1, 1).unwrap();
        builder.add_precinct(0, 1, 1).unwrap();
        let mut graph = builder.finish_loading().unwrap();

        let err = graph.seed_districts(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, Error::SeedingFailed { num_districts: 1 });
    }

    #[test]
    fn reseeding_replaces_the_previous_partition() {
        let mut graph = grid(4, 2);
        graph.seed_districts(&mut StdRng::seed_from_u64(1)).unwrap();
        graph.seed_districts(&mut StdRng::seed_from_u64(2)).unwrap();

        assert!(graph.unassigned().is_empty());
        let assigned: u64 = (0..2).map(|k| graph.total_pop(k)).sum();
        assert_eq!(assigned, graph.state_pop());
    }
}
