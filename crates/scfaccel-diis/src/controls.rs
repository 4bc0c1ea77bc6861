//! SCF convergence acceleration controls.
//!
//! These are the knobs an outer SCF driver reads to decide whether and how to
//! extrapolate. Parsing them from an input file is left to the driver; after
//! setting them, call [`ScfControls::resolve_equivalences`] once.

/// Extrapolation algorithm applied to the residual history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiisAlg {
    /// No DIIS; damping (if enabled) is the only acceleration
    None,
    /// Commutator DIIS over the stored residuals
    #[default]
    CDiis,
}

/// Controls of the SCF acceleration loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScfControls {
    /// Master switch for any extrapolation (DIIS or damping).
    /// Default: true
    pub do_extrap: bool,
    /// DIIS variant.
    /// Default: CDiis
    pub diis_alg: DiisAlg,
    /// Number of history slots kept for DIIS.
    /// Default: 10
    pub n_keep: usize,
    /// Enable static damping of the early iterations.
    /// Default: true
    pub do_damp: bool,
    /// Damping parameter for the first iterations. 0 disables damping.
    /// Default: 0.7
    pub damp_start_param: f64,
    /// Residual norm below which damping is switched off.
    /// Default: 1e-3
    pub damp_error: f64,
    /// Maximum number of SCF iterations.
    /// Default: 128
    pub max_scf_iter: usize,
    /// Energy convergence tolerance.
    /// Default: 1e-10
    pub ene_conv_tol: f64,
    /// Density convergence tolerance.
    /// Default: 1e-8
    pub den_conv_tol: f64,
}

impl Default for ScfControls {
    fn default() -> Self {
        Self {
            do_extrap: true,
            diis_alg: DiisAlg::CDiis,
            n_keep: 10,
            do_damp: true,
            damp_start_param: 0.7,
            damp_error: 1e-3,
            max_scf_iter: 128,
            ene_conv_tol: 1e-10,
            den_conv_tol: 1e-8,
        }
    }
}

impl ScfControls {
    /// Set the extrapolation master switch.
    pub fn with_extrap(mut self, do_extrap: bool) -> Self {
        self.do_extrap = do_extrap;
        self
    }

    /// Set the DIIS algorithm.
    pub fn with_diis_alg(mut self, diis_alg: DiisAlg) -> Self {
        self.diis_alg = diis_alg;
        self
    }

    /// Set the DIIS history depth.
    pub fn with_n_keep(mut self, n_keep: usize) -> Self {
        self.n_keep = n_keep;
        self
    }

    /// Set the damping switch.
    pub fn with_damp(mut self, do_damp: bool) -> Self {
        self.do_damp = do_damp;
        self
    }

    /// Set the initial damping parameter.
    pub fn with_damp_start_param(mut self, damp_start_param: f64) -> Self {
        self.damp_start_param = damp_start_param;
        self
    }

    /// Set the residual norm that ends damping.
    pub fn with_damp_error(mut self, damp_error: f64) -> Self {
        self.damp_error = damp_error;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_scf_iter(mut self, max_scf_iter: usize) -> Self {
        self.max_scf_iter = max_scf_iter;
        self
    }

    /// Set the energy convergence tolerance.
    pub fn with_ene_conv_tol(mut self, ene_conv_tol: f64) -> Self {
        self.ene_conv_tol = ene_conv_tol;
        self
    }

    /// Set the density convergence tolerance.
    pub fn with_den_conv_tol(mut self, den_conv_tol: f64) -> Self {
        self.den_conv_tol = den_conv_tol;
        self
    }

    /// Turn DIIS on (`CDiis`) or off (`None`).
    pub fn set_diis(&mut self, enabled: bool) {
        self.diis_alg = if enabled {
            DiisAlg::CDiis
        } else {
            DiisAlg::None
        };
    }

    /// Apply the equivalences between toggles.
    ///
    /// A zero damping parameter turns damping off. With both damping and
    /// DIIS off, extrapolation is off altogether.
    pub fn resolve_equivalences(&mut self) {
        if self.do_damp && self.damp_start_param == 0.0 {
            log::debug!("damp_start_param is 0: disabling damping");
            self.do_damp = false;
        }
        if self.do_extrap && !self.do_damp && self.diis_alg == DiisAlg::None {
            log::debug!("damping and DIIS both off: disabling extrapolation");
            self.do_extrap = false;
        }
    }

    /// Whether the driver should run DIIS extrapolations.
    pub fn diis_enabled(&self) -> bool {
        self.do_extrap && self.diis_alg != DiisAlg::None && self.n_keep >= 1
    }
}
