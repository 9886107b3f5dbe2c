use crate::subset_sum::subset_sum;
use crate::types::Action;

/// Mutable solve state threaded through the pipeline stages. Supply and
/// demands are multisets of positive lengths; `cuts` counts every physical
/// split of one supply piece into two. Trials clone the whole state, so no
/// two stages or trials ever alias the same collections.
#[derive(Debug, Clone)]
pub struct State {
    pub supply: Vec<u64>,
    pub demands: Vec<u64>,
    pub cuts: u64,
    pub actions: Vec<Action>,
}

impl State {
    pub fn new(supply: Vec<u64>, demands: Vec<u64>) -> Self {
        Self {
            supply,
            demands,
            cuts: 0,
            actions: Vec::new(),
        }
    }

    pub fn total_supply(&self) -> u64 {
        self.supply.iter().sum()
    }

    pub fn total_demand(&self) -> u64 {
        self.demands.iter().sum()
    }

    fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    fn take_supply(&mut self, length: u64) {
        let pos = self
            .supply
            .iter()
            .position(|&p| p == length)
            .expect("piece missing from supply");
        self.supply.swap_remove(pos);
    }

    /// Satisfies every demand that has an identical-length piece available,
    /// one-for-one in input order. Zero cuts.
    pub fn match_exact(&mut self) {
        let demands = std::mem::take(&mut self.demands);
        let mut remaining = Vec::new();
        for d in demands {
            if self.supply.contains(&d) {
                self.take_supply(d);
                self.record(Action::Assign {
                    pieces: vec![d],
                    demand: d,
                });
            } else {
                remaining.push(d);
            }
        }
        self.demands = remaining;
    }

    /// Attempts each remaining demand against the full supply via exact
    /// subset-sum; on a hit the witness pieces and the demand are removed
    /// at zero cost.
    pub fn settle_combinations(&mut self) {
        let demands = std::mem::take(&mut self.demands);
        let mut remaining = Vec::new();
        for d in demands {
            match subset_sum(&self.supply, d) {
                Some(witness) => {
                    for &piece in &witness {
                        self.take_supply(piece);
                    }
                    self.record(Action::Assign {
                        pieces: witness,
                        demand: d,
                    });
                }
                None => remaining.push(d),
            }
        }
        self.demands = remaining;
    }

    /// Greedy merge: supply and demands sorted ascending, pieces accumulated
    /// per demand until it is met exactly (no cut) or the next piece would
    /// overshoot (one cut, remainder stays in supply). A first candidate
    /// that already exceeds the demand defers it and every later demand.
    /// Pieces accumulated toward a demand that cannot be finished go back
    /// to supply.
    pub fn assemble(&mut self) {
        self.supply.sort_unstable();
        self.demands.sort_unstable();

        let demands = std::mem::take(&mut self.demands);
        let mut deferred = Vec::new();
        let mut early_stop = false;
        for &d in &demands {
            if early_stop {
                deferred.push(d);
                continue;
            }

            let mut acc = 0u64;
            let mut used: Vec<u64> = Vec::new();
            let mut satisfied = false;
            let mut i = 0;
            while i < self.supply.len() {
                let candidate = self.supply[i];
                if acc == 0 && candidate > d {
                    early_stop = true;
                    break;
                }
                if acc + candidate <= d {
                    acc += candidate;
                    used.push(candidate);
                    self.supply.remove(i);
                } else {
                    let take = d - acc;
                    let rest = candidate - take;
                    self.supply[i] = rest;
                    self.cuts += 1;
                    self.record(Action::Cut {
                        piece: candidate,
                        take,
                        rest,
                    });
                    used.push(take);
                    acc = d;
                }
                if acc == d {
                    satisfied = true;
                    self.record(Action::Assign {
                        pieces: used,
                        demand: d,
                    });
                    used = Vec::new();
                    break;
                }
            }

            if !satisfied {
                // Supply ran dry (or the demand was deferred before any
                // accumulation); whole pieces must not leak.
                self.supply.append(&mut used);
                deferred.push(d);
            }
        }
        self.demands = deferred;
    }

    /// Greedy cut-to-size over the given demand values: the first supply
    /// piece strictly greater than a demand is split into the demand and
    /// its surplus, exactly one cut. Demands with no larger piece are left
    /// in place.
    pub fn trim_to_size(&mut self, targets: &[u64]) {
        for &d in targets {
            let Some(pos) = self.supply.iter().position(|&p| p > d) else {
                continue;
            };
            let piece = self.supply[pos];
            let rest = piece - d;
            self.supply[pos] = rest;
            self.cuts += 1;
            self.record(Action::Cut {
                piece,
                take: d,
                rest,
            });
            self.record(Action::Assign {
                pieces: vec![d],
                demand: d,
            });
            let dpos = self
                .demands
                .iter()
                .position(|&x| x == d)
                .expect("trim target missing from demands");
            self.demands.swap_remove(dpos);
        }
    }
}
