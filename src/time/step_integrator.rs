//! One explicit time step of the shallow water model.
//!
//! A step is five stages in a fixed order; each one reads the output of the
//! previous stage, so they cannot be reordered or fused:
//!
//! 1. [`StepIntegrator::momentum_predictor`]: forward-time, centred-space
//!    pressure gradient update of u and v
//! 2. [`StepIntegrator::coriolis_corrector`]: add f·v to u and subtract
//!    f·u from v, using the *pre-step* velocities
//! 3. [`StepIntegrator::enforce_boundaries`]: rigid walls, u = 0 on the
//!    eastern line and v = 0 on the northern line
//! 4. [`StepIntegrator::upwind_fluxes`]: donor-cell depths chosen by the
//!    sign of the *new* velocity, net volume fluxes from the *old* η
//! 5. [`StepIntegrator::continuity_update`]: η update plus source/sink
//!
//! The Coriolis corrector reads the velocities of the current time level,
//! not the predictor output. This keeps the scheme fully explicit.
//!
//! # Execution
//!
//! Every stage is written as a kernel over x-lines (fixed `i`). Serial
//! execution walks the lines in order; with the `parallel` feature the same
//! kernels run on rayon's pool. Each output value is computed by the same
//! expression either way, so both paths give bit-identical results.

use crate::config::ModelSetup;
use crate::equations::ShallowWater2D;
use crate::mesh::Grid2D;
use crate::solver::{Field2D, FluxWorkspace, GridState};
use crate::source::{CoriolisField, ForcingField};
use crate::types::Depth;

/// How the per-line kernels of a stage are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// One line after another on the calling thread.
    #[default]
    Serial,
    /// Lines distributed over the rayon thread pool.
    #[cfg(feature = "parallel")]
    Parallel,
}

/// Apply `kernel(i, line)` to every x-line of `field`.
#[inline]
fn for_each_line<F>(execution: Execution, field: &mut Field2D, kernel: F)
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    match execution {
        Execution::Serial => {
            for (i, line) in field.rows_mut().enumerate() {
                kernel(i, line);
            }
        }
        #[cfg(feature = "parallel")]
        Execution::Parallel => {
            use rayon::prelude::*;

            let ny = field.ny();
            field
                .as_mut_slice()
                .par_chunks_mut(ny)
                .enumerate()
                .for_each(|(i, line)| kernel(i, line));
        }
    }
}

/// Forward-time momentum / upwind continuity stepper.
///
/// Stateless apart from its execution mode: all storage is passed in.
///
/// # Example
///
/// ```
/// use swe_fd::config::ModelSetup;
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::mesh::Grid2D;
/// use swe_fd::solver::{FluxWorkspace, GridState};
/// use swe_fd::time::StepIntegrator;
/// use swe_fd::types::{Depth, Resolution2D};
///
/// let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
/// let grid = Grid2D::new(Resolution2D::new(4, 4), 3.0, 3.0, 0.03, &swe).unwrap();
/// let model = ModelSetup::new(grid, swe).unwrap();
///
/// let mut current = GridState::zeros(model.grid().resolution());
/// current.eta[(1, 1)] = 1.0;
/// let mut next = GridState::zeros(model.grid().resolution());
/// let mut workspace = FluxWorkspace::new(model.grid().resolution());
///
/// StepIntegrator::serial().advance(&model, &current, &mut next, &mut workspace);
///
/// assert!((next.u[(0, 1)] - (-0.3)).abs() < 1e-12);
/// assert!((next.total_mass() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepIntegrator {
    execution: Execution,
}

impl StepIntegrator {
    /// Integrator running on the calling thread.
    pub fn serial() -> Self {
        Self {
            execution: Execution::Serial,
        }
    }

    /// Integrator running each stage on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn parallel() -> Self {
        Self {
            execution: Execution::Parallel,
        }
    }

    /// Integrator with an explicit execution mode.
    pub fn with_execution(execution: Execution) -> Self {
        Self { execution }
    }

    /// Execution mode.
    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Human-readable scheme name for logs.
    pub fn name(&self) -> &'static str {
        "FTCS momentum + upwind continuity"
    }

    /// Advance `current` by one time step, writing the result into `next`.
    ///
    /// `current` is never modified. Every value of `next` and of
    /// `workspace` is overwritten, so both may hold stale data on entry.
    pub fn advance(
        &self,
        model: &ModelSetup,
        current: &GridState,
        next: &mut GridState,
        workspace: &mut FluxWorkspace,
    ) {
        let grid = model.grid();
        debug_assert_eq!(current.resolution(), grid.resolution());
        debug_assert_eq!(next.resolution(), grid.resolution());
        debug_assert_eq!(workspace.resolution(), grid.resolution());

        self.momentum_predictor(grid, model.equation(), current, next);
        if let Some(coriolis) = model.coriolis() {
            self.coriolis_corrector(coriolis, current, next);
        }
        self.enforce_boundaries(next);
        self.upwind_fluxes(model.equation().depth, current, next, workspace);
        self.continuity_update(grid, current, workspace, model.forcing(), next);
    }

    /// Stage 1: pressure-gradient predictor.
    ///
    /// u_next[i,j] = u[i,j] - g·dt/dx·(η[i+1,j] - η[i,j])   for i ≤ N_x-2
    /// v_next[i,j] = v[i,j] - g·dt/dy·(η[i,j+1] - η[i,j])   for j ≤ N_y-2
    ///
    /// The wall lines (u at i = N_x-1, v at j = N_y-1) have no forward
    /// neighbour and are left to [`Self::enforce_boundaries`].
    pub fn momentum_predictor(
        &self,
        grid: &Grid2D,
        equation: &ShallowWater2D,
        current: &GridState,
        next: &mut GridState,
    ) {
        let nx = grid.nx();
        let cx = equation.g * grid.dt() / grid.dx();
        let cy = equation.g * grid.dt() / grid.dy();
        let (u, v, eta) = (&current.u, &current.v, &current.eta);

        for_each_line(self.execution, &mut next.u, |i, u_next| {
            if i + 1 == nx {
                return;
            }
            let (u_i, eta_i, eta_east) = (u.row(i), eta.row(i), eta.row(i + 1));
            for j in 0..u_next.len() {
                u_next[j] = u_i[j] - cx * (eta_east[j] - eta_i[j]);
            }
        });

        for_each_line(self.execution, &mut next.v, |i, v_next| {
            let (v_i, eta_i) = (v.row(i), eta.row(i));
            for j in 0..v_next.len() - 1 {
                v_next[j] = v_i[j] - cy * (eta_i[j + 1] - eta_i[j]);
            }
        });
    }

    /// Stage 2: Coriolis corrector.
    ///
    /// u_next += f[j]·v[i,j],  v_next -= f[j]·u[i,j]  on every point, with
    /// u and v taken from `current`.
    pub fn coriolis_corrector(
        &self,
        coriolis: &CoriolisField,
        current: &GridState,
        next: &mut GridState,
    ) {
        let f = coriolis.values();
        let (u, v) = (&current.u, &current.v);

        for_each_line(self.execution, &mut next.u, |i, u_next| {
            for ((out, &v_old), &f_j) in u_next.iter_mut().zip(v.row(i)).zip(f) {
                *out += f_j * v_old;
            }
        });

        for_each_line(self.execution, &mut next.v, |i, v_next| {
            for ((out, &u_old), &f_j) in v_next.iter_mut().zip(u.row(i)).zip(f) {
                *out -= f_j * u_old;
            }
        });
    }

    /// Stage 3: no normal flow through the eastern and northern walls.
    ///
    /// Sets u_next[N_x-1, :] and v_next[:, N_y-1] to exactly zero.
    pub fn enforce_boundaries(&self, next: &mut GridState) {
        next.apply_wall_conditions();
    }

    /// Stage 4: donor-cell face depths and net volume fluxes.
    ///
    /// Depth on a face is η + H taken from the cell the flow comes from,
    /// judged by the sign of the freshly updated velocity on that face. The
    /// west face of cell i is the east face of cell i-1, so neighbouring
    /// cells exchange exactly the same flux and Σ η is conserved.
    pub fn upwind_fluxes(
        &self,
        depth: Depth,
        current: &GridState,
        next: &GridState,
        workspace: &mut FluxWorkspace,
    ) {
        let nx = current.eta.nx();
        let eta = &current.eta;
        let (u, v) = (&next.u, &next.v);

        for_each_line(self.execution, &mut workspace.h_e, |i, h_e| {
            let eta_i = eta.row(i);
            if i + 1 == nx {
                for (h, &e) in h_e.iter_mut().zip(eta_i) {
                    *h = depth.total_depth(e);
                }
                return;
            }
            let (u_i, eta_east) = (u.row(i), eta.row(i + 1));
            for j in 0..h_e.len() {
                h_e[j] = if u_i[j] > 0.0 {
                    depth.total_depth(eta_i[j])
                } else {
                    depth.total_depth(eta_east[j])
                };
            }
        });

        for_each_line(self.execution, &mut workspace.h_w, |i, h_w| {
            let eta_i = eta.row(i);
            if i == 0 {
                for (h, &e) in h_w.iter_mut().zip(eta_i) {
                    *h = depth.total_depth(e);
                }
                return;
            }
            let (u_west, eta_west) = (u.row(i - 1), eta.row(i - 1));
            for j in 0..h_w.len() {
                h_w[j] = if u_west[j] > 0.0 {
                    depth.total_depth(eta_west[j])
                } else {
                    depth.total_depth(eta_i[j])
                };
            }
        });

        for_each_line(self.execution, &mut workspace.h_n, |i, h_n| {
            let (v_i, eta_i) = (v.row(i), eta.row(i));
            let last = h_n.len() - 1;
            for j in 0..last {
                h_n[j] = if v_i[j] > 0.0 {
                    depth.total_depth(eta_i[j])
                } else {
                    depth.total_depth(eta_i[j + 1])
                };
            }
            h_n[last] = depth.total_depth(eta_i[last]);
        });

        for_each_line(self.execution, &mut workspace.h_s, |i, h_s| {
            let (v_i, eta_i) = (v.row(i), eta.row(i));
            h_s[0] = depth.total_depth(eta_i[0]);
            for j in 1..h_s.len() {
                h_s[j] = if v_i[j - 1] > 0.0 {
                    depth.total_depth(eta_i[j - 1])
                } else {
                    depth.total_depth(eta_i[j])
                };
            }
        });

        let (h_e, h_w) = (&workspace.h_e, &workspace.h_w);
        for_each_line(self.execution, &mut workspace.uhwe, |i, uhwe| {
            let (u_i, h_e_i) = (u.row(i), h_e.row(i));
            if i == 0 {
                for j in 0..uhwe.len() {
                    uhwe[j] = u_i[j] * h_e_i[j];
                }
                return;
            }
            let (u_west, h_w_i) = (u.row(i - 1), h_w.row(i));
            for j in 0..uhwe.len() {
                uhwe[j] = u_i[j] * h_e_i[j] - u_west[j] * h_w_i[j];
            }
        });

        let (h_n, h_s) = (&workspace.h_n, &workspace.h_s);
        for_each_line(self.execution, &mut workspace.vhns, |i, vhns| {
            let (v_i, h_n_i, h_s_i) = (v.row(i), h_n.row(i), h_s.row(i));
            vhns[0] = v_i[0] * h_n_i[0];
            for j in 1..vhns.len() {
                vhns[j] = v_i[j] * h_n_i[j] - v_i[j - 1] * h_s_i[j];
            }
        });
    }

    /// Stage 5: continuity update with optional mass forcing.
    ///
    /// η_next = η - dt·(uhwe/dx + vhns/dy) + dt·source - dt·sink
    pub fn continuity_update(
        &self,
        grid: &Grid2D,
        current: &GridState,
        workspace: &FluxWorkspace,
        forcing: Option<&ForcingField>,
        next: &mut GridState,
    ) {
        let (dt, dx, dy) = (grid.dt(), grid.dx(), grid.dy());
        let eta = &current.eta;
        let (uhwe, vhns) = (&workspace.uhwe, &workspace.vhns);

        for_each_line(self.execution, &mut next.eta, |i, eta_next| {
            let (eta_i, fx, fy) = (eta.row(i), uhwe.row(i), vhns.row(i));
            for j in 0..eta_next.len() {
                eta_next[j] = eta_i[j] - dt * (fx[j] / dx + fy[j] / dy);
            }
        });

        let Some(forcing) = forcing else {
            return;
        };
        if let Some(source) = forcing.source() {
            for_each_line(self.execution, &mut next.eta, |i, eta_next| {
                for (out, &s) in eta_next.iter_mut().zip(source.row(i)) {
                    *out += dt * s;
                }
            });
        }
        if let Some(sink) = forcing.sink() {
            for_each_line(self.execution, &mut next.eta, |i, eta_next| {
                for (out, &s) in eta_next.iter_mut().zip(sink.row(i)) {
                    *out -= dt * s;
                }
            });
        }
    }
}

/// Advance one step on the calling thread.
///
/// Shorthand for `StepIntegrator::serial().advance(..)`.
pub fn advance(
    model: &ModelSetup,
    current: &GridState,
    next: &mut GridState,
    workspace: &mut FluxWorkspace,
) {
    StepIntegrator::serial().advance(model, current, next, workspace);
}
