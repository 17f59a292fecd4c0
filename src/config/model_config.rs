//! Run configuration.
//!
//! [`ModelConfig`] is plain data: it can be built in code with the `with_*`
//! methods or deserialized with any serde format. [`ModelConfig::build`]
//! validates it and produces the [`ModelSetup`] the integrator runs on.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModelSetup;
use crate::equations::{G_STANDARD, ShallowWater2D};
use crate::error::{SetupError, ensure_finite, ensure_positive};
use crate::mesh::Grid2D;
use crate::source::{CoriolisField, F0_HALF_DAY, ForcingField};
use crate::types::{Depth, Resolution2D};

/// Grid shape and domain size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of grid points in x
    pub nx: usize,
    /// Number of grid points in y
    pub ny: usize,
    /// Domain length in x (m)
    pub lx: f64,
    /// Domain length in y (m)
    pub ly: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: 150,
            ny: 150,
            lx: 1.0e6,
            ly: 1.0e6,
        }
    }
}

/// Physical constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Resting depth H (m)
    pub depth: f64,
    /// Coriolis frequency scale f₀ (rad/s)
    pub f0: f64,
    /// Latitude (rad), in [-π/2, π/2]; f = f₀·sin(latitude) on an f-plane
    pub latitude: f64,
    /// β = ∂f/∂y (1/(m·s)); when set, f(y) = f₀ + β·y replaces the f-plane
    pub beta: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            g: G_STANDARD,
            depth: 100.0,
            f0: F0_HALF_DAY,
            latitude: FRAC_PI_4,
            beta: None,
        }
    }
}

/// Time step and run length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Fixed time step (s); when `None` it is derived from `cfl_fraction`
    pub dt: Option<f64>,
    /// dt = cfl_fraction · min(dx, dy) / √(gH) when `dt` is not given
    pub cfl_fraction: f64,
    /// Number of steps the simulation loop performs
    pub max_steps: usize,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            dt: None,
            cfl_fraction: 0.1,
            max_steps: 500,
        }
    }
}

/// Which optional terms are switched on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsConfig {
    /// Coriolis corrector
    pub use_coriolis: bool,
    /// Gaussian mass source in the north-east corner
    pub use_source: bool,
    /// Uniform sink balancing the source
    pub use_sink: bool,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            use_coriolis: true,
            use_source: false,
            use_sink: false,
        }
    }
}

/// Complete run configuration.
///
/// The default is the reference basin: a 1000 km square, 100 m deep,
/// 150×150 points, dt at a tenth of the CFL limit, 500 steps, Coriolis on
/// at 45° with a half-day rotation period, no mass forcing.
///
/// # Example
///
/// ```
/// use swe_fd::config::ModelConfig;
///
/// let config = ModelConfig::reference()
///     .with_resolution(64, 64)
///     .with_max_steps(100)
///     .with_coriolis(false);
///
/// let model = config.build().unwrap();
/// assert_eq!(model.grid().nx(), 64);
/// assert!(model.coriolis().is_none());
/// assert!((model.courant_number() - 0.1).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Grid shape and domain size
    pub grid: GridConfig,
    /// Physical constants
    pub physics: PhysicsConfig,
    /// Time stepping
    pub time: TimeConfig,
    /// Optional terms
    pub terms: TermsConfig,
}

impl ModelConfig {
    /// The reference configuration.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Set the number of grid points.
    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        self.grid.nx = nx;
        self.grid.ny = ny;
        self
    }

    /// Set the domain lengths (m).
    pub fn with_domain(mut self, lx: f64, ly: f64) -> Self {
        self.grid.lx = lx;
        self.grid.ly = ly;
        self
    }

    /// Set the gravitational acceleration.
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.physics.g = g;
        self
    }

    /// Set the resting depth H.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.physics.depth = depth;
        self
    }

    /// Use a fixed time step instead of the CFL fraction.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.time.dt = Some(dt);
        self
    }

    /// Derive dt as this fraction of the CFL limit.
    pub fn with_cfl_fraction(mut self, fraction: f64) -> Self {
        self.time.dt = None;
        self.time.cfl_fraction = fraction;
        self
    }

    /// Set the number of steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.time.max_steps = max_steps;
        self
    }

    /// Switch the Coriolis term.
    pub fn with_coriolis(mut self, enabled: bool) -> Self {
        self.terms.use_coriolis = enabled;
        self
    }

    /// Set f₀ and latitude for an f-plane.
    pub fn with_f_plane(mut self, f0: f64, latitude: f64) -> Self {
        self.physics.f0 = f0;
        self.physics.latitude = latitude;
        self.physics.beta = None;
        self
    }

    /// Use a β-plane f(y) = f₀ + β·y.
    pub fn with_beta_plane(mut self, f0: f64, beta: f64) -> Self {
        self.physics.f0 = f0;
        self.physics.beta = Some(beta);
        self
    }

    /// Switch the mass source.
    pub fn with_source(mut self, enabled: bool) -> Self {
        self.terms.use_source = enabled;
        self
    }

    /// Switch the mass sink.
    pub fn with_sink(mut self, enabled: bool) -> Self {
        self.terms.use_sink = enabled;
        self
    }

    /// Grid resolution.
    ///
    /// # Panics
    ///
    /// Panics on a zero point count; call [`Self::validate`] first.
    pub fn resolution(&self) -> Resolution2D {
        Resolution2D::new(self.grid.nx, self.grid.ny)
    }

    /// Check every value without building anything.
    pub fn validate(&self) -> Result<(), SetupError> {
        let GridConfig { nx, ny, lx, ly } = self.grid;
        if nx < 2 || ny < 2 {
            return Err(SetupError::GridTooSmall { nx, ny });
        }
        ensure_positive("L_x", lx)?;
        ensure_positive("L_y", ly)?;
        ensure_positive("g", self.physics.g)?;
        ensure_positive("H", self.physics.depth)?;
        match self.time.dt {
            Some(dt) => ensure_positive("dt", dt)?,
            None => ensure_positive("cfl_fraction", self.time.cfl_fraction)?,
        };

        if self.terms.use_coriolis {
            ensure_finite("f0", self.physics.f0)?;
            match self.physics.beta {
                // The β-plane does not use the latitude
                Some(beta) => {
                    ensure_finite("beta", beta)?;
                }
                None => {
                    let latitude = self.physics.latitude;
                    if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
                        return Err(SetupError::OutOfRange {
                            name: "latitude",
                            value: latitude,
                            min: -FRAC_PI_2,
                            max: FRAC_PI_2,
                        });
                    }
                }
            }
        }

        if self.terms.use_sink && !self.terms.use_source {
            return Err(SetupError::MissingForcing(
                "use_sink balances the source, enable use_source as well",
            ));
        }
        Ok(())
    }

    /// Validated equation constants.
    pub fn equation(&self) -> Result<ShallowWater2D, SetupError> {
        ShallowWater2D::new(self.physics.g, Depth::new_unchecked(self.physics.depth))
    }

    /// Validated grid, including the CFL check.
    pub fn build_grid(&self) -> Result<Grid2D, SetupError> {
        self.validate()?;
        let equation = self.equation()?;
        let resolution = self.resolution();
        let GridConfig { lx, ly, .. } = self.grid;
        match self.time.dt {
            Some(dt) => Grid2D::new(resolution, lx, ly, dt, &equation),
            None => Grid2D::with_cfl_fraction(resolution, lx, ly, self.time.cfl_fraction, &equation),
        }
    }

    /// Validate and assemble the model.
    pub fn build(&self) -> Result<ModelSetup, SetupError> {
        let grid = self.build_grid()?;
        let equation = self.equation()?;

        let coriolis = self.terms.use_coriolis.then(|| match self.physics.beta {
            Some(beta) => CoriolisField::beta_plane(self.physics.f0, beta, &grid),
            None => CoriolisField::from_latitude(self.physics.f0, self.physics.latitude, &grid),
        });

        let forcing = if self.terms.use_source {
            let source = ForcingField::reference_source(&grid);
            let sink = self
                .terms
                .use_sink
                .then(|| ForcingField::balancing_sink(&source));
            Some(ForcingField::new(Some(source), sink, &grid)?)
        } else {
            None
        };

        log::info!("Model configuration:\n{}", self);

        let mut model = ModelSetup::new(grid, equation)?;
        if let Some(coriolis) = coriolis {
            model = model.with_coriolis(coriolis)?;
        }
        if let Some(forcing) = forcing {
            model = model.with_forcing(forcing)?;
        }
        Ok(model)
    }

    fn spacing(&self) -> (f64, f64) {
        let dx = self.grid.lx / self.grid.nx.saturating_sub(1) as f64;
        let dy = self.grid.ly / self.grid.ny.saturating_sub(1) as f64;
        (dx, dy)
    }

    /// Time step this configuration resolves to (before validation).
    pub fn effective_dt(&self) -> f64 {
        self.time.dt.unwrap_or_else(|| {
            let (dx, dy) = self.spacing();
            self.time.cfl_fraction * dx.min(dy) / (self.physics.g * self.physics.depth).sqrt()
        })
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "================================================================";
        let (dx, dy) = self.spacing();

        writeln!(f, "{RULE}")?;
        writeln!(f, "use_source = {}", self.terms.use_source)?;
        writeln!(f, "use_sink = {}", self.terms.use_sink)?;
        writeln!(f, "g = {}", self.physics.g)?;
        writeln!(f, "H = {}", self.physics.depth)?;
        writeln!(f, "dx = {:.2} km", dx / 1000.0)?;
        writeln!(f, "dy = {:.2} km", dy / 1000.0)?;
        writeln!(f, "dt = {:.2} s", self.effective_dt())?;
        if self.terms.use_coriolis {
            writeln!(f, "f_0 = {}", self.physics.f0)?;
            if let Some(beta) = self.physics.beta {
                writeln!(f, "beta = {}", beta)?;
            }
        }
        write!(f, "{RULE}")
    }
}
