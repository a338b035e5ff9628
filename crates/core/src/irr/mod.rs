//! IRR module - dated-flow model and the root-finding solver.

mod irr_model;
mod irr_solver;

pub use irr_model::{DatedFlow, IrrBasis, IrrError, IrrResult};
pub use irr_solver::{solve_irr, xnpv, year_fraction, MAX_ITERATIONS, RESIDUAL_TOLERANCE};
