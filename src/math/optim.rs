//! Bounded Nelder–Mead simplex minimizer.
//!
//! Points are projected back into the box after every move, and ties are
//! broken by vertex order, so a given objective and start point always
//! produce the same trajectory.

#[derive(Debug, Clone, Copy)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Relative tolerance on the spread of objective values across the simplex.
    pub ftol: f64,
    /// Absolute tolerance on the simplex extent in every coordinate.
    pub xtol: f64,
    /// Initial edge length along each axis.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            ftol: 1e-10,
            xtol: 1e-6,
            initial_step: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

pub fn nelder_mead<F>(
    objective: F,
    start: &[f64],
    bounds: &[(f64, f64)],
    config: &NelderMeadConfig,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = start.len();
    debug_assert_eq!(dim, bounds.len());
    let eval = |p: &[f64]| {
        let v = objective(p);
        if v.is_nan() { f64::INFINITY } else { v }
    };

    let origin = project(start.to_vec(), bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(origin.clone());
    for axis in 0..dim {
        let mut vertex = origin.clone();
        let (lo, hi) = bounds[axis];
        vertex[axis] = if vertex[axis] + config.initial_step <= hi {
            vertex[axis] + config.initial_step
        } else {
            (vertex[axis] - config.initial_step).max(lo)
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|p| eval(p)).collect();

    let mut iterations = 0usize;
    let mut converged = false;
    while iterations < config.max_iter {
        order(&mut simplex, &mut values);
        if has_converged(&simplex, &values, config) {
            converged = true;
            break;
        }
        iterations += 1;

        let worst = dim;
        let centroid = centroid(&simplex[..worst]);

        let reflected = project(blend(&centroid, &simplex[worst], -REFLECT), bounds);
        let f_reflected = eval(&reflected);

        if f_reflected < values[0] {
            let expanded = project(blend(&centroid, &simplex[worst], -EXPAND), bounds);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[worst - 1] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < values[worst] {
            let p = project(blend(&centroid, &reflected, CONTRACT), bounds);
            let f = eval(&p);
            (p, f)
        } else {
            let p = project(blend(&centroid, &simplex[worst], CONTRACT), bounds);
            let f = eval(&p);
            (p, f)
        };
        if f_contracted < values[worst].min(f_reflected) {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=dim {
            let shrunk = project(blend(&best, &simplex[i], SHRINK), bounds);
            values[i] = eval(&shrunk);
            simplex[i] = shrunk;
        }
    }

    order(&mut simplex, &mut values);
    if !converged {
        converged = has_converged(&simplex, &values, config);
    }
    Minimum {
        point: simplex.swap_remove(0),
        value: values[0],
        iterations,
        converged,
    }
}

/// `from + t * (to - from)`.
fn blend(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter()
        .zip(to.iter())
        .map(|(&a, &b)| a + t * (b - a))
        .collect()
}

fn centroid(points: &[Vec<f64>]) -> Vec<f64> {
    let dim = points[0].len();
    let mut c = vec![0.0; dim];
    for p in points {
        for (acc, v) in c.iter_mut().zip(p.iter()) {
            *acc += v;
        }
    }
    let n = points.len() as f64;
    for v in &mut c {
        *v /= n;
    }
    c
}

fn project(mut p: Vec<f64>, bounds: &[(f64, f64)]) -> Vec<f64> {
    for (v, &(lo, hi)) in p.iter_mut().zip(bounds.iter()) {
        *v = v.clamp(lo, hi);
    }
    p
}

// Stable sort keeps earlier vertices first on ties.
fn order(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = idx.iter().map(|&i| simplex[i].clone()).collect();
    *values = idx.iter().map(|&i| values[i]).collect();
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], config: &NelderMeadConfig) -> bool {
    let best = values[0];
    let worst = values[values.len() - 1];
    if !best.is_finite() || !worst.is_finite() {
        return false;
    }
    let f_spread = worst - best;
    if f_spread <= f64::EPSILON * (1.0 + best.abs()) {
        return true;
    }
    let x_spread = simplex[1..]
        .iter()
        .flat_map(|p| p.iter().zip(simplex[0].iter()).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max);
    f_spread <= config.ftol * (1.0 + best.abs()) && x_spread <= config.xtol
}
