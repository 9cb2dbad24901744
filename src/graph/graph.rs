use crate::error::{Error, Result};
use crate::graph::{CrossingEdges, DistrictSet, PerimeterSet};

/// Returns true if an edge between territory assigned `a` and `b` crosses a
/// district boundary. Edges touching unassigned territory never cross.
#[inline]
fn crossing_pair(a: Option<u32>, b: Option<u32>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x != y)
}

/// Accumulates precinct records and adjacency before the graph is frozen.
///
/// Ids are handed out densely from 0. Edges may only reference precincts
/// already added, so a well-formed record stream (header, precincts, edges)
/// builds without lookahead.
#[derive(Debug)]
pub struct GraphBuilder {
    num_precincts: usize,
    num_districts: u32,
    declared_pop: Option<u64>,
    counties: Vec<u32>,
    minority: Vec<u32>,
    majority: Vec<u32>,
    adjacency: Vec<Vec<u32>>,
}

impl GraphBuilder {
    /// Start a graph of `num_precincts` precincts to be cut into
    /// `num_districts` districts. `declared_pop`, when given, must match the
    /// sum of precinct populations at `finish_loading`.
    pub fn new(num_precincts: usize, num_districts: u32, declared_pop: Option<u64>) -> Result<Self> {
        if num_precincts == 0 {
            return Err(Error::InvalidInput("graph must have at least one precinct".into()));
        }
        if num_districts == 0 {
            return Err(Error::InvalidInput("district count must be at least one".into()));
        }
        if num_districts as usize > num_precincts {
            return Err(Error::InvalidInput(format!(
                "cannot cut {num_precincts} precincts into {num_districts} districts"
            )));
        }

        Ok(Self {
            num_precincts,
            num_districts,
            declared_pop,
            counties: Vec::with_capacity(num_precincts),
            minority: Vec::with_capacity(num_precincts),
            majority: Vec::with_capacity(num_precincts),
            adjacency: Vec::with_capacity(num_precincts),
        })
    }

    /// Number of precincts added so far.
    #[inline] pub fn len(&self) -> usize { self.counties.len() }

    /// Returns true if no precinct has been added yet.
    #[inline] pub fn is_empty(&self) -> bool { self.counties.is_empty() }

    /// Add a precinct and return its id. Ids are dense from 0 upward.
    pub fn add_precinct(&mut self, county: u32, minority_pop: u32, majority_pop: u32) -> Result<u32> {
        if self.len() == self.num_precincts {
            return Err(Error::InvalidInput(format!(
                "more than the declared {} precincts", self.num_precincts
            )));
        }

        let id = self.len() as u32;
        self.counties.push(county);
        self.minority.push(minority_pop);
        self.majority.push(majority_pop);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Add an undirected adjacency edge between `u` and `v`. Idempotent.
    pub fn add_edge(&mut self, u: u32, v: u32) -> Result<()> {
        let count = self.len() as u32;
        if u >= count || v >= count {
            return Err(Error::InvalidInput(format!(
                "edge ({u}, {v}) references a precinct that does not exist yet"
            )));
        }
        if u == v {
            return Err(Error::InvalidInput(format!("self-loop on precinct {u}")));
        }

        if !self.adjacency[u as usize].contains(&v) {
            self.adjacency[u as usize].push(v);
            self.adjacency[v as usize].push(u);
        }
        Ok(())
    }

    /// Freeze the adjacency into compressed sparse row form and produce a
    /// graph with every precinct unassigned.
    pub fn finish_loading(mut self) -> Result<PrecinctGraph> {
        if self.len() != self.num_precincts {
            return Err(Error::InvalidInput(format!(
                "declared {} precincts but {} were added", self.num_precincts, self.len()
            )));
        }

        let state_pop = self.minority.iter().zip(&self.majority)
            .map(|(&m, &maj)| m as u64 + maj as u64)
            .sum::<u64>();
        if let Some(declared) = self.declared_pop {
            if declared != state_pop {
                return Err(Error::InvariantBroken(format!(
                    "declared state population {declared} but precinct records sum to {state_pop}"
                )));
            }
        }

        for row in &mut self.adjacency {
            row.sort_unstable();
        }

        let offsets = std::iter::once(0u32).chain(
            self.adjacency.iter()
                .map(|row| row.len() as u32)
                .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
        ).collect::<Vec<u32>>();
        let edges = self.adjacency.iter().flatten().copied().collect::<Vec<u32>>();

        // mirror[he] is the index of the opposite half-edge; rows are sorted,
        // so the reverse position is a binary search away.
        let mut mirror = vec![0u32; edges.len()];
        for u in 0..self.num_precincts {
            for he in offsets[u] as usize .. offsets[u + 1] as usize {
                let v = edges[he] as usize;
                let pos = self.adjacency[v].binary_search(&(u as u32))
                    .map_err(|_| Error::Internal(format!(
                        "adjacency of precinct {v} lost its edge back to {u}"
                    )))?;
                mirror[he] = offsets[v] + pos as u32;
            }
        }

        let num_half_edges = edges.len();
        Ok(PrecinctGraph {
            state_pop,
            counties: self.counties,
            minority: self.minority,
            majority: self.majority,
            offsets,
            edges,
            mirror,
            districts: DistrictSet::new(self.num_districts, self.num_precincts),
            total_pop: vec![0; self.num_districts as usize],
            minority_pop: vec![0; self.num_districts as usize],
            perimeter: PerimeterSet::new(self.num_districts, self.num_precincts),
            crossing: CrossingEdges::new(num_half_edges),
        })
    }
}

/// A contiguity graph of precincts with a mutable district overlay.
///
/// Vertex data and adjacency are immutable after construction; the overlay
/// (assignments, per-district populations, perimeter sets, crossing edges)
/// is maintained incrementally under single-precinct moves.
#[derive(Debug, Clone)]
pub struct PrecinctGraph {
    state_pop: u64,
    counties: Vec<u32>,
    minority: Vec<u32>,
    majority: Vec<u32>,

    // Adjacency in CSR form; mirror[he] is the opposite half-edge.
    offsets: Vec<u32>,
    edges: Vec<u32>,
    mirror: Vec<u32>,

    districts: DistrictSet,
    total_pop: Vec<u64>,
    minority_pop: Vec<u64>,
    perimeter: PerimeterSet,
    crossing: CrossingEdges,
}

impl PrecinctGraph {
    /// Number of precincts.
    #[inline] pub fn num_precincts(&self) -> usize { self.counties.len() }

    /// Number of districts.
    #[inline] pub fn num_districts(&self) -> u32 { self.districts.num_districts() }

    /// Total state population (sum over all precincts).
    #[inline] pub fn state_pop(&self) -> u64 { self.state_pop }

    /// County label of a precinct.
    #[inline] pub fn county(&self, v: u32) -> u32 { self.counties[v as usize] }

    /// Minority population of a precinct.
    #[inline] pub fn minority(&self, v: u32) -> u32 { self.minority[v as usize] }

    /// Majority population of a precinct.
    #[inline] pub fn majority(&self, v: u32) -> u32 { self.majority[v as usize] }

    /// Total population of a precinct.
    #[inline]
    pub fn population(&self, v: u32) -> u64 {
        self.minority[v as usize] as u64 + self.majority[v as usize] as u64
    }

    /// Range of half-edge ids owned by `v`.
    #[inline]
    pub(crate) fn half_edges(&self, v: u32) -> std::ops::Range<usize> {
        self.offsets[v as usize] as usize .. self.offsets[v as usize + 1] as usize
    }

    /// Degree (number of neighbors) of `v`.
    #[inline] pub fn degree(&self, v: u32) -> usize { self.half_edges(v).len() }

    /// Iterator over the neighbors of `v`, ascending.
    #[inline]
    pub fn neighbors(&self, v: u32) -> impl Iterator<Item = u32> + '_ {
        self.half_edges(v).map(move |he| self.edges[he])
    }

    /// Head (pointed-to precinct) of a half-edge.
    #[inline] pub(crate) fn edge_head(&self, he: u32) -> u32 { self.edges[he as usize] }

    /// Tail (owning precinct) of a half-edge.
    #[inline]
    pub(crate) fn edge_tail(&self, he: u32) -> u32 {
        self.offsets.partition_point(|&o| o <= he) as u32 - 1
    }

    /// Returns true if `u` and `v` are adjacent.
    pub fn contains_edge(&self, u: u32, v: u32) -> bool {
        if u as usize >= self.num_precincts() || v as usize >= self.num_precincts() {
            return false;
        }
        let range = self.half_edges(u);
        self.edges[range].binary_search(&v).is_ok()
    }

    /// District of `v`, or `None` while unassigned.
    #[inline] pub fn district_of(&self, v: u32) -> Option<u32> { self.districts.find(v) }

    /// Complete district assignment, one entry per precinct.
    ///
    /// Panics if any precinct is unassigned; only meaningful once seeding has
    /// completed.
    pub fn assignments(&self) -> Vec<u32> {
        assert!(self.districts.unassigned().is_empty(), "graph has unassigned precincts");
        (0..self.num_precincts() as u32)
            .map(|v| self.districts.find(v).unwrap())
            .collect()
    }

    /// Precincts currently in `district`, in no particular order.
    #[inline] pub fn members(&self, district: u32) -> &[u32] { self.districts.members(district) }

    /// Precincts not yet assigned to any district.
    #[inline] pub(crate) fn unassigned(&self) -> &[u32] { self.districts.unassigned() }

    /// Total population of `district`.
    #[inline] pub fn total_pop(&self, district: u32) -> u64 { self.total_pop[district as usize] }

    /// Minority population of `district`.
    #[inline] pub fn minority_pop(&self, district: u32) -> u64 { self.minority_pop[district as usize] }

    /// Perimeter precincts of `district`: members with at least one neighbor
    /// assigned to a different district.
    #[inline] pub fn perimeter(&self, district: u32) -> &[u32] { self.perimeter.get(district) }

    /// Neighbors of `v` assigned to a district other than `district`.
    pub fn foreign_neighbors(&self, district: u32, v: u32) -> impl Iterator<Item = u32> + '_ {
        self.neighbors(v)
            .filter(move |&w| matches!(self.district_of(w), Some(k) if k != district))
    }

    /// Returns true if `v` currently sits on its district's perimeter.
    #[inline] pub fn on_perimeter(&self, v: u32) -> bool { self.perimeter.contains(v) }

    /// Returns true if the edge {u, v} exists and its endpoints lie in
    /// different districts.
    pub fn is_crossing(&self, u: u32, v: u32) -> bool {
        if u as usize >= self.num_precincts() || v as usize >= self.num_precincts() {
            return false;
        }
        let range = self.half_edges(u);
        match self.edges[range.clone()].binary_search(&v) {
            Ok(pos) => self.crossing.contains((range.start + pos) as u32),
            Err(_) => false,
        }
    }

    /// Number of edges whose endpoints lie in different districts.
    #[inline] pub fn crossing_edge_count(&self) -> usize { self.crossing.edge_count() }

    /// The crossing half-edge set, for proposal sampling.
    #[inline] pub(crate) fn crossing(&self) -> &CrossingEdges { &self.crossing }

    /// Assign or reassign `v` to `district`, updating populations, perimeter
    /// membership, and crossing edges for `v` and its neighborhood.
    pub fn set_district(&mut self, v: u32, district: u32) -> Result<()> {
        if v as usize >= self.num_precincts() {
            return Err(Error::InvalidInput(format!("precinct {v} out of range")));
        }
        if district >= self.num_districts() {
            return Err(Error::InvalidInput(format!(
                "district {district} out of range [0, {})", self.num_districts()
            )));
        }

        let old = self.district_of(v);
        if old == Some(district) { return Ok(()) }

        // Population counters.
        if let Some(k) = old {
            self.total_pop[k as usize] -= self.population(v);
            self.minority_pop[k as usize] -= self.minority(v) as u64;
        }
        self.total_pop[district as usize] += self.population(v);
        self.minority_pop[district as usize] += self.minority(v) as u64;

        self.districts.move_to(v, Some(district));

        // Crossing status of every incident edge, both directions at once.
        for he in self.half_edges(v) {
            let w = self.edges[he];
            let rev = self.mirror[he];
            if crossing_pair(Some(district), self.district_of(w)) {
                self.crossing.insert(he as u32);
                self.crossing.insert(rev);
            } else {
                self.crossing.remove(he as u32);
                self.crossing.remove(rev);
            }
        }

        // Perimeter membership of `v` and of each neighbor.
        self.refresh_perimeter(v);
        for he in self.half_edges(v) {
            self.refresh_perimeter(self.edges[he]);
        }

        Ok(())
    }

    /// Recompute whether `v` belongs on its district's perimeter.
    fn refresh_perimeter(&mut self, v: u32) {
        match self.district_of(v) {
            Some(k) => {
                if self.foreign_neighbors(k, v).next().is_some() {
                    self.perimeter.insert(v, k);
                } else {
                    self.perimeter.remove(v);
                }
            }
            None => self.perimeter.remove(v),
        }
    }

    /// Recompute perimeter and crossing structures from scratch in one sweep
    /// over all edges. Idempotent; the incremental path in `set_district`
    /// maintains the same state.
    pub fn populate_derived_state(&mut self) {
        self.perimeter.clear();
        self.crossing.clear();

        for v in 0..self.num_precincts() as u32 {
            let district = self.district_of(v);
            let mut on_perimeter = false;
            for he in self.half_edges(v) {
                let w = self.edges[he];
                if crossing_pair(district, self.district_of(w)) {
                    self.crossing.insert(he as u32);
                    on_perimeter = true;
                }
            }
            if let (Some(k), true) = (district, on_perimeter) {
                self.perimeter.insert(v, k);
            }
        }
    }

    /// Install a complete externally supplied assignment. Validates length
    /// and range, rebuilds all derived state, and verifies that every
    /// district is non-empty and connected.
    pub fn set_districts(&mut self, assignments: &[u32]) -> Result<()> {
        if assignments.len() != self.num_precincts() {
            return Err(Error::InvalidInput(format!(
                "assignment vector has length {} but the graph has {} precincts",
                assignments.len(), self.num_precincts()
            )));
        }
        if let Some(&k) = assignments.iter().find(|&&k| k >= self.num_districts()) {
            return Err(Error::InvalidInput(format!(
                "district {k} out of range [0, {})", self.num_districts()
            )));
        }

        self.districts.rebuild(assignments);

        self.total_pop.fill(0);
        self.minority_pop.fill(0);
        for (v, &k) in assignments.iter().enumerate() {
            self.total_pop[k as usize] += self.population(v as u32);
            self.minority_pop[k as usize] += self.minority(v as u32) as u64;
        }

        self.populate_derived_state();

        for k in 0..self.num_districts() {
            if self.members(k).is_empty() {
                return Err(Error::InvariantBroken(format!("district {k} is empty")));
            }
            if !self.is_district_connected(k) {
                return Err(Error::InvariantBroken(format!("district {k} is not connected")));
            }
        }
        Ok(())
    }

    /// Return every precinct to the unassigned pool and zero the overlay.
    pub(crate) fn clear_assignments(&mut self) {
        self.districts.clear();
        self.total_pop.fill(0);
        self.minority_pop.fill(0);
        self.perimeter.clear();
        self.crossing.clear();
    }

    /// Canonical snapshot of the partition overlay, for equality checks.
    /// Bucket orders are normalized so that two overlays describing the same
    /// partition compare equal regardless of move history.
    pub fn snapshot(&self) -> PartitionSnapshot {
        let sorted = |slice: &[u32]| {
            let mut v = slice.to_vec();
            v.sort_unstable();
            v
        };

        let mut crossing = self.crossing.iter()
            .map(|he| {
                let (u, w) = (self.edge_tail(he), self.edge_head(he));
                (u.min(w), u.max(w))
            })
            .collect::<Vec<_>>();
        crossing.sort_unstable();
        crossing.dedup();

        PartitionSnapshot {
            assignments: (0..self.num_precincts() as u32).map(|v| self.district_of(v)).collect(),
            members: (0..self.num_districts()).map(|k| sorted(self.members(k))).collect(),
            total_pop: self.total_pop.clone(),
            minority_pop: self.minority_pop.clone(),
            perimeter: (0..self.num_districts()).map(|k| sorted(self.perimeter(k))).collect(),
            crossing,
        }
    }
}

/// Order-normalized image of the partition overlay. Two graphs with the same
/// assignments, populations, perimeters, and crossing edges produce equal
/// snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSnapshot {
    pub assignments: Vec<Option<u32>>,
    pub members: Vec<Vec<u32>>,
    pub total_pop: Vec<u64>,
    pub minority_pop: Vec<u64>,
    pub perimeter: Vec<Vec<u32>>,
    pub crossing: Vec<(u32, u32)>,
}
