use crate::agent::Agent;
use crate::error::{Error, Result};

/// Square board of agents with 8-connected neighborhoods.
///
/// Cells are stored densely with `x` as the outer index, matching the order
/// in which the engine scans the board. Neighbor lists are computed once at
/// construction since the shape never changes.
#[derive(Debug, Clone)]
pub struct Grid {
    dimension: usize,
    agents: Vec<Agent>,
    neighbors: Vec<Vec<usize>>,
}

/// Outcome of delivering one signal to every neighbor of a cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Broadcast {
    pub n_heard: usize,
    pub n_understood: usize,
}

impl Grid {
    /// Create a grid of side `dimension`, building each cell's agent with `make_agent(x, y)`.
    pub fn from_fn<F>(dimension: usize, mut make_agent: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<Agent>,
    {
        let mut agents = Vec::with_capacity(dimension * dimension);
        let mut neighbors = Vec::with_capacity(dimension * dimension);
        for x in 0..dimension {
            for y in 0..dimension {
                agents.push(make_agent(x, y)?);
                neighbors.push(moore_neighborhood(dimension, x, y));
            }
        }
        Ok(Self {
            dimension,
            agents,
            neighbors,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Result<&Agent> {
        let i_cell = self.index(x, y)?;
        Ok(&self.agents[i_cell])
    }

    pub fn cell_at_mut(&mut self, x: usize, y: usize) -> Result<&mut Agent> {
        let i_cell = self.index(x, y)?;
        Ok(&mut self.agents[i_cell])
    }

    /// Put `agent` into cell `(x, y)`, returning the agent it displaces.
    pub fn replace(&mut self, x: usize, y: usize, agent: Agent) -> Result<Agent> {
        let i_cell = self.index(x, y)?;
        Ok(std::mem::replace(&mut self.agents[i_cell], agent))
    }

    /// Coordinates of the cells adjacent to `(x, y)`.
    pub fn neighbor_coords(&self, x: usize, y: usize) -> Result<Vec<(usize, usize)>> {
        let i_cell = self.index(x, y)?;
        let coords = self.neighbors[i_cell]
            .iter()
            .map(|&i_nbr| (i_nbr / self.dimension, i_nbr % self.dimension))
            .collect();
        Ok(coords)
    }

    /// Agents in the cells adjacent to `(x, y)`.
    pub fn neighbors_of(&self, x: usize, y: usize) -> Result<Vec<&Agent>> {
        let i_cell = self.index(x, y)?;
        let agents = self.neighbors[i_cell]
            .iter()
            .map(|&i_nbr| &self.agents[i_nbr])
            .collect();
        Ok(agents)
    }

    /// Deliver `(event, signal)` to every neighbor of `(x, y)`, in place.
    ///
    /// Each neighbor learns immediately, so later hearers and later speakers
    /// of the same round see the updated tables.
    pub fn broadcast(
        &mut self,
        x: usize,
        y: usize,
        event: usize,
        signal: usize,
    ) -> Result<Broadcast> {
        let i_cell = self.index(x, y)?;
        let mut outcome = Broadcast::default();
        for &i_nbr in &self.neighbors[i_cell] {
            if self.agents[i_nbr].hear(event, signal)? {
                outcome.n_understood += 1;
            }
            outcome.n_heard += 1;
        }
        Ok(outcome)
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        let dimension = self.dimension;
        if x >= dimension || y >= dimension {
            return Err(Error::InvalidCoordinate { x, y, dimension });
        }
        Ok(x * dimension + y)
    }
}

fn moore_neighborhood(dimension: usize, x: usize, y: usize) -> Vec<usize> {
    let mut i_nbrs = Vec::with_capacity(8);
    for nx in x.saturating_sub(1)..=(x + 1).min(dimension - 1) {
        for ny in y.saturating_sub(1)..=(y + 1).min(dimension - 1) {
            if (nx, ny) != (x, y) {
                i_nbrs.push(nx * dimension + ny);
            }
        }
    }
    i_nbrs
}
